//! Completion Commands
//!
//! 레슨 완료/완료 취소. 둘 다 멱등입니다.

use tracing::debug;

use super::{check_halfway, ProgressState};
use crate::context::CallContext;
use crate::error::CommandResult;

/// 레슨 완료 (`MarkCompleted`)
///
/// 새로 기록된 경우 `true`, 이미 완료된 레슨이면 `false` (에러 아님).
pub fn mark_completed(state: &ProgressState, ctx: &CallContext, user_id: i64, lesson_id: i64) -> CommandResult<bool> {
    let (inserted, course_id, halfway) = state.run(ctx, |db, ctx| {
        ctx.check()?;
        let course_id = db.course_of_lesson(lesson_id)?;

        ctx.check()?;
        let inserted = db.insert_checkpoint(user_id, lesson_id, course_id)?;
        debug!(user_id, course_id, lesson_id, inserted, "mark completed");

        let halfway = if inserted { check_halfway(db, ctx, user_id, course_id) } else { None };
        Ok((inserted, course_id, halfway))
    })?;

    state.announce_halfway(user_id, course_id, halfway);
    Ok(inserted)
}

/// 레슨 완료 취소 (`MarkNotCompleted`)
///
/// 실제로 삭제된 경우 `true`, 원래 없었으면 `false` (에러 아님).
pub fn mark_not_completed(
    state: &ProgressState,
    ctx: &CallContext,
    user_id: i64,
    lesson_id: i64,
) -> CommandResult<bool> {
    state.run(ctx, |db, ctx| {
        ctx.check()?;
        db.get_lesson_by_id(lesson_id)?;

        ctx.check()?;
        let deleted = db.delete_checkpoint(user_id, lesson_id)?;
        debug!(user_id, lesson_id, deleted, "mark not completed");
        Ok(deleted)
    })
}
