//! Assessment Commands
//!
//! 퀴즈/서술형 답안 제출과 표시용 조회

use super::{check_halfway, ProgressState};
use crate::context::CallContext;
use crate::error::CommandResult;
use crate::models::{QuestionState, QuestionView, QuizView};
use crate::progress;

/// 퀴즈 답안 제출 (`SubmitQuizAnswer`). 정답 여부를 돌려줍니다.
pub fn submit_quiz_answer(
    state: &ProgressState,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
    question_lesson_id: i64,
    answer_id: i64,
) -> CommandResult<bool> {
    let (is_correct, halfway) = state.run(ctx, |db, ctx| {
        let is_correct = progress::answer_quiz(db, ctx, question_lesson_id, answer_id, user_id, course_id)?;
        Ok((is_correct, check_halfway(db, ctx, user_id, course_id)))
    })?;

    state.announce_halfway(user_id, course_id, halfway);
    Ok(is_correct)
}

/// 서술형 답안 제출 (`SubmitQuestionAnswer`)
pub fn submit_question_answer(
    state: &ProgressState,
    ctx: &CallContext,
    user_id: i64,
    question_id: i64,
    answer: &str,
) -> CommandResult<QuestionState> {
    let (result, course_id, halfway) = state.run(ctx, |db, ctx| {
        let result = progress::answer_question(db, ctx, question_id, user_id, answer)?;
        let course_id = db.course_of_lesson(question_id)?;
        Ok((result, course_id, check_halfway(db, ctx, user_id, course_id)))
    })?;

    state.announce_halfway(user_id, course_id, halfway);
    Ok(result)
}

pub fn get_quiz(state: &ProgressState, ctx: &CallContext, user_id: i64, lesson_id: i64) -> CommandResult<QuizView> {
    state.run(ctx, |db, ctx| progress::get_quiz(db, ctx, lesson_id, user_id))
}

pub fn get_question(
    state: &ProgressState,
    ctx: &CallContext,
    user_id: i64,
    question_id: i64,
) -> CommandResult<QuestionView> {
    state.run(ctx, |db, ctx| progress::get_question(db, ctx, question_id, user_id))
}

/// 서술형 문항 상태 (답안이 없으면 `not passed`)
pub fn get_question_state(
    state: &ProgressState,
    ctx: &CallContext,
    user_id: i64,
    question_id: i64,
) -> CommandResult<QuestionState> {
    state.run(ctx, |db, ctx| progress::question_state(db, ctx, question_id, user_id))
}
