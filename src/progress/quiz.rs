//! Quiz/Question Engine
//!
//! 단일 선택 퀴즈는 정답표로 채점하고, 서술형 문항은 채점 없이 답안만 기록합니다.
//! 두 경우 모두 첫 제출만 유효하며 재제출은 `AlreadyAnswered` 입니다.

use tracing::{debug, info};

use crate::context::CallContext;
use crate::db::Database;
use crate::error::ProgressError;
use crate::models::{LessonPoint, LessonType, QuestionState, QuestionView, QuizOptionView, QuizView};

/// 레슨이 기대한 유형인지 확인
fn expect_type(lesson: &LessonPoint, expected: LessonType) -> Result<(), ProgressError> {
    if lesson.lesson_type != expected {
        return Err(ProgressError::InvalidOperation(format!(
            "lesson {} is a {} lesson, not a {}",
            lesson.id,
            lesson.lesson_type.as_str(),
            expected.as_str()
        )));
    }
    Ok(())
}

fn prompt_of(lesson: &LessonPoint) -> String {
    lesson.content.prompt().unwrap_or_default().to_string()
}

/// 퀴즈 답안 제출
///
/// 채점 결과를 기록하고 레슨을 완료 처리한 뒤 정답 여부를 돌려줍니다.
/// 오답이어도 레슨은 완료로 기록됩니다.
pub fn answer_quiz(
    db: &Database,
    ctx: &CallContext,
    question_lesson_id: i64,
    answer_id: i64,
    user_id: i64,
    course_id: i64,
) -> Result<bool, ProgressError> {
    ctx.check()?;
    let lesson = db.get_lesson_by_id(question_lesson_id)?;
    expect_type(&lesson, LessonType::Quiz)?;

    if db.course_of_lesson(lesson.id)? != course_id {
        return Err(ProgressError::LessonNotFound(format!(
            "{} in course {}",
            lesson.id, course_id
        )));
    }

    ctx.check()?;
    let option = db.get_quiz_option(lesson.id, answer_id)?;
    let record = db.record_quiz_answer(ctx, user_id, &option, course_id)?;

    info!(
        user_id,
        course_id,
        lesson_id = lesson.id,
        is_correct = record.is_correct,
        "quiz answered"
    );
    Ok(record.is_correct)
}

/// 퀴즈 표시용 조회 (선택지와 이전 답안)
pub fn get_quiz(
    db: &Database,
    ctx: &CallContext,
    lesson_id: i64,
    user_id: i64,
) -> Result<QuizView, ProgressError> {
    ctx.check()?;
    let lesson = db.get_lesson_by_id(lesson_id)?;
    expect_type(&lesson, LessonType::Quiz)?;

    let options = db
        .get_quiz_options(lesson.id)?
        .into_iter()
        .map(QuizOptionView::from)
        .collect();
    let prior_answer = db.get_quiz_answer(user_id, lesson.id)?;

    Ok(QuizView {
        lesson_id: lesson.id,
        prompt: prompt_of(&lesson),
        title: lesson.title,
        options,
        prior_answer,
    })
}

/// 서술형 답안 제출 (채점 없음)
pub fn answer_question(
    db: &Database,
    ctx: &CallContext,
    question_id: i64,
    user_id: i64,
    answer: &str,
) -> Result<QuestionState, ProgressError> {
    ctx.check()?;
    let lesson = db.get_lesson_by_id(question_id)?;
    expect_type(&lesson, LessonType::Question)?;
    let course_id = db.course_of_lesson(lesson.id)?;

    ctx.check()?;
    let record = db.record_question_answer(ctx, user_id, lesson.id, answer, course_id)?;
    debug!(user_id, course_id, lesson_id = lesson.id, "question answered");
    Ok(record.into())
}

/// 서술형 문항 상태. 답안이 없으면 `not passed`.
pub fn question_state(
    db: &Database,
    ctx: &CallContext,
    question_id: i64,
    user_id: i64,
) -> Result<QuestionState, ProgressError> {
    ctx.check()?;
    let lesson = db.get_lesson_by_id(question_id)?;
    expect_type(&lesson, LessonType::Question)?;

    Ok(db
        .get_question_answer(user_id, lesson.id)?
        .map(QuestionState::from)
        .unwrap_or_else(QuestionState::not_passed))
}

/// 서술형 문항 표시용 조회
pub fn get_question(
    db: &Database,
    ctx: &CallContext,
    question_id: i64,
    user_id: i64,
) -> Result<QuestionView, ProgressError> {
    let state = question_state(db, ctx, question_id, user_id)?;
    let lesson = db.get_lesson_by_id(question_id)?;

    Ok(QuestionView {
        lesson_id: lesson.id,
        prompt: prompt_of(&lesson),
        title: lesson.title,
        state,
    })
}
