//! Answer Store
//!
//! 퀴즈/서술형 답안 기록. 답안 기록과 레슨 완료 체크포인트는 하나의 트랜잭션으로 커밋됩니다.

use rusqlite::OptionalExtension;

use super::{now_millis, Database};
use crate::context::CallContext;
use crate::error::ProgressError;
use crate::models::{QuestionAnswerRecord, QuestionStatus, QuizAnswerRecord, QuizOption};

impl Database {
    /// 사용자의 퀴즈 답안 조회 (첫 제출)
    pub fn get_quiz_answer(&self, user_id: i64, question_id: i64) -> Result<Option<QuizAnswerRecord>, ProgressError> {
        let record = self
            .conn
            .query_row(
                "SELECT user_id, question_id, answer_id, is_correct, created_at FROM quiz_answers
                 WHERE user_id = ?1 AND question_id = ?2
                 ORDER BY id ASC LIMIT 1",
                [user_id, question_id],
                |row| {
                    Ok(QuizAnswerRecord {
                        user_id: row.get(0)?,
                        question_id: row.get(1)?,
                        answer_id: row.get(2)?,
                        is_correct: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// 퀴즈 답안 기록 + 레슨 완료 처리
    ///
    /// 같은 (user, question) 답안이 이미 있으면 `AlreadyAnswered` 이며 아무것도 쓰지 않습니다.
    /// 커밋 직전에 `ctx` 를 다시 확인하므로 취소된 호출은 롤백됩니다.
    pub fn record_quiz_answer(
        &self,
        ctx: &CallContext,
        user_id: i64,
        option: &QuizOption,
        course_id: i64,
    ) -> Result<QuizAnswerRecord, ProgressError> {
        let tx = self.conn.unchecked_transaction()?;
        let now = now_millis();

        let inserted = tx.execute(
            "INSERT INTO quiz_answers (user_id, question_id, answer_id, is_correct, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (user_id, question_id) DO NOTHING",
            (user_id, option.question_id, option.id, option.is_correct, now),
        )?;
        if inserted == 0 {
            return Err(ProgressError::AlreadyAnswered {
                user_id,
                question_id: option.question_id,
            });
        }

        tx.execute(
            "INSERT INTO checkpoints (user_id, lesson_id, course_id, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, lesson_id) DO NOTHING",
            (user_id, option.question_id, course_id, now),
        )?;

        ctx.check()?;
        tx.commit()?;

        Ok(QuizAnswerRecord {
            user_id,
            question_id: option.question_id,
            answer_id: option.id,
            is_correct: option.is_correct,
            created_at: now,
        })
    }

    /// 사용자의 서술형 답안 조회
    pub fn get_question_answer(
        &self,
        user_id: i64,
        question_id: i64,
    ) -> Result<Option<QuestionAnswerRecord>, ProgressError> {
        let row = self
            .conn
            .query_row(
                "SELECT user_id, question_id, answer, status, created_at FROM question_answers
                 WHERE user_id = ?1 AND question_id = ?2
                 ORDER BY id ASC LIMIT 1",
                [user_id, question_id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        Ok(row.map(|(user_id, question_id, answer, status, created_at)| QuestionAnswerRecord {
            user_id,
            question_id,
            answer,
            status: if status == QuestionStatus::Answered.as_str() {
                QuestionStatus::Answered
            } else {
                QuestionStatus::NotPassed
            },
            created_at,
        }))
    }

    /// 서술형 답안 기록 + 레슨 완료 처리 (채점 없음)
    pub fn record_question_answer(
        &self,
        ctx: &CallContext,
        user_id: i64,
        question_id: i64,
        answer: &str,
        course_id: i64,
    ) -> Result<QuestionAnswerRecord, ProgressError> {
        let tx = self.conn.unchecked_transaction()?;
        let now = now_millis();

        let inserted = tx.execute(
            "INSERT INTO question_answers (user_id, question_id, answer, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (user_id, question_id) DO NOTHING",
            (user_id, question_id, answer, QuestionStatus::Answered.as_str(), now),
        )?;
        if inserted == 0 {
            return Err(ProgressError::AlreadyAnswered { user_id, question_id });
        }

        tx.execute(
            "INSERT INTO checkpoints (user_id, lesson_id, course_id, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, lesson_id) DO NOTHING",
            (user_id, question_id, course_id, now),
        )?;

        ctx.check()?;
        tx.commit()?;

        Ok(QuestionAnswerRecord {
            user_id,
            question_id,
            answer: answer.to_string(),
            status: QuestionStatus::Answered,
            created_at: now,
        })
    }
}
