//! Milestone Detector
//!
//! 진행률 기반 1회성 신호. 플래그 행의 유일성 제약이 "한 번만" 을 보장합니다.

use tracing::debug;

use crate::context::CallContext;
use crate::db::Database;
use crate::error::ProgressError;
use crate::models::MilestoneKind;

/// 절반 이상 완료 여부 (순수 계산)
pub fn crossed_halfway(completed: i64, total: i64) -> bool {
    total > 0 && 2 * completed >= total
}

/// 절반 달성 마일스톤
///
/// 진행률이 50% 선을 넘었고 플래그가 아직 없을 때만 플래그를 기록하고 `true`.
/// 이후 호출은 모두 `false` 입니다.
pub fn is_halfway_milestone_reached(
    db: &Database,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
) -> Result<bool, ProgressError> {
    ctx.check()?;
    if db.milestone_flag_exists(user_id, course_id, MilestoneKind::Halfway)? {
        return Ok(false);
    }

    let completed = db.count_checkpoints(user_id, course_id)?;
    let total = db.count_lessons_in_course(course_id)?;
    if !crossed_halfway(completed, total) {
        return Ok(false);
    }

    ctx.check()?;
    let fired = db.try_set_milestone_flag(user_id, course_id, MilestoneKind::Halfway)?;
    debug!(user_id, course_id, completed, total, fired, "halfway milestone check");
    Ok(fired)
}

/// 수강 시작 마일스톤 (신규 수강 첫 방문 시 1회)
pub fn mark_course_started(
    db: &Database,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
) -> Result<bool, ProgressError> {
    ctx.check()?;
    db.try_set_milestone_flag(user_id, course_id, MilestoneKind::CourseStarted)
}
