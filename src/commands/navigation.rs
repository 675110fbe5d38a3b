//! Navigation Commands
//!
//! 현재 레슨, 이전/다음 레슨, 로드맵 조회

use tracing::info;

use super::{check_halfway, ProgressState};
use crate::context::CallContext;
use crate::error::CommandResult;
use crate::models::{CourseProgress, CurrentLesson, Footer, LessonPoint, MilestoneKind, Roadmap};
use crate::progress::{self, PositionOptions};

/// 현재 레슨 조회 (`GetCurrentLesson`)
///
/// 신규 수강이면 수강 시작 알림을 (user, course) 당 한 번 보냅니다.
/// 첫 레슨 자동 체크포인트가 켜져 있으면 그 기록으로 절반 달성도 확인합니다.
pub fn get_current_lesson(
    state: &ProgressState,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
) -> CommandResult<CurrentLesson> {
    let options = PositionOptions {
        checkpoint_first_lesson: state.config.auto_checkpoint_first_lesson,
    };

    let (current, started, halfway) = state.run(ctx, |db, ctx| {
        let current = progress::resolve_position(db, ctx, user_id, course_id, options)?;
        let started = current.is_new_enrollment && progress::mark_course_started(db, ctx, user_id, course_id)?;
        let halfway = if current.is_new_enrollment && options.checkpoint_first_lesson {
            check_halfway(db, ctx, user_id, course_id)
        } else {
            None
        };
        Ok((current, started, halfway))
    })?;

    if started {
        info!(user_id, course_id, "course started");
        state.notifications.fire(
            MilestoneKind::CourseStarted,
            user_id,
            course_id,
            current.header.course_title.clone(),
        );
    }
    state.announce_halfway(user_id, course_id, halfway);
    Ok(current)
}

/// 이전/현재/다음 레슨 (`GetAdjacentLessons`)
pub fn get_adjacent_lessons(state: &ProgressState, ctx: &CallContext, lesson_id: i64) -> CommandResult<Footer> {
    state.run(ctx, |db, ctx| progress::resolve_footer(db, ctx, lesson_id))
}

/// 완료 표시가 포함된 전체 트리 (`GetRoadmap`)
pub fn get_roadmap(
    state: &ProgressState,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
) -> CommandResult<Roadmap> {
    state.run(ctx, |db, ctx| progress::build_roadmap(db, ctx, user_id, course_id))
}

pub fn get_course_progress(
    state: &ProgressState,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
) -> CommandResult<CourseProgress> {
    state.run(ctx, |db, ctx| progress::course_progress(db, ctx, user_id, course_id))
}

/// 레슨 콘텐츠 조회
pub fn get_lesson(state: &ProgressState, ctx: &CallContext, lesson_id: i64) -> CommandResult<LessonPoint> {
    state.run(ctx, |db, ctx| {
        ctx.check()?;
        db.get_lesson_by_id(lesson_id)
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::commands::completion::mark_completed;
    use crate::commands::{test_state, test_state_with};
    use crate::db::fixtures;
    use crate::models::NO_LESSON;
    use crate::notify::testing::RecordingNotifier;

    #[test]
    fn test_go_basics_scenario() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (state, created) = test_state(notifier.clone());
        let ctx = CallContext::background();
        let [l1, l2, l3] = [created.lesson_ids[0], created.lesson_ids[1], created.lesson_ids[2]];
        let course = created.course_id;

        let current = get_current_lesson(&state, &ctx, 1, course).unwrap();
        assert_eq!(current.lesson_id, l1);
        assert!(current.is_new_enrollment);

        assert_eq!(
            get_adjacent_lessons(&state, &ctx, l1).unwrap(),
            Footer { previous: NO_LESSON, current: l1, next: l2 }
        );

        mark_completed(&state, &ctx, 1, l1).unwrap();
        assert_eq!(
            get_adjacent_lessons(&state, &ctx, l2).unwrap(),
            Footer { previous: l1, current: l2, next: l3 }
        );

        let current = get_current_lesson(&state, &ctx, 1, course).unwrap();
        assert_eq!(current.lesson_id, l1);
        assert!(!current.is_new_enrollment);

        mark_completed(&state, &ctx, 1, l3).unwrap();
        let current = get_current_lesson(&state, &ctx, 1, course).unwrap();
        assert_eq!(current.lesson_id, l3);
        assert_eq!(current.header.part_order, 2);
    }

    #[test]
    fn test_course_started_notified_once() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (state, created) = test_state(notifier.clone());
        let ctx = CallContext::background();

        for _ in 0..3 {
            get_current_lesson(&state, &ctx, 1, created.course_id).unwrap();
        }

        let started: Vec<_> = notifier
            .wait_for(1)
            .into_iter()
            .filter(|n| n.kind == MilestoneKind::CourseStarted)
            .collect();
        assert_eq!(started.len(), 1);
        assert_eq!(started[0].course_title, "Go Basics");
    }

    #[test]
    fn test_not_found_maps_to_not_found_code() {
        let (state, _) = test_state(Arc::new(RecordingNotifier::default()));
        let err = get_adjacent_lessons(&state, &CallContext::background(), 9999).unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
    }

    #[test]
    fn test_roadmap_and_progress() {
        let (state, created) = test_state(Arc::new(RecordingNotifier::default()));
        let ctx = CallContext::background();
        mark_completed(&state, &ctx, 1, created.lesson_ids[0]).unwrap();

        let roadmap = get_roadmap(&state, &ctx, 1, created.course_id).unwrap();
        assert!(roadmap.parts[0].buckets[0].lessons[0].is_done);

        let summary = get_course_progress(&state, &ctx, 1, created.course_id).unwrap();
        assert_eq!(summary.completed_lessons, 1);
        assert_eq!(summary.total_lessons, 3);

        let lesson = get_lesson(&state, &ctx, created.lesson_ids[1]).unwrap();
        assert_eq!(lesson.title, "L2");
    }

    #[test]
    fn test_bootstrap_checkpoint_can_reach_halfway() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (mut state, created) = test_state_with(fixtures::synthetic(1, 1, 2), notifier.clone());
        state.config.auto_checkpoint_first_lesson = true;
        let ctx = CallContext::background();

        let current = get_current_lesson(&state, &ctx, 1, created.course_id).unwrap();
        assert!(current.is_new_enrollment);

        // 2개 중 1개가 자동 기록되어 바로 절반에 도달
        let sent = notifier.wait_for(2);
        assert_eq!(sent.iter().filter(|n| n.kind == MilestoneKind::Halfway).count(), 1);
        assert_eq!(sent.iter().filter(|n| n.kind == MilestoneKind::CourseStarted).count(), 1);
    }

    #[test]
    fn test_bootstrap_without_checkpoint_does_not_reach_halfway() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (state, created) = test_state_with(fixtures::synthetic(1, 1, 2), notifier.clone());
        let ctx = CallContext::background();

        get_current_lesson(&state, &ctx, 1, created.course_id).unwrap();
        let sent = notifier.wait_for(1);
        assert!(sent.iter().all(|n| n.kind == MilestoneKind::CourseStarted));

        let db = state.db.lock().unwrap();
        assert!(!db
            .milestone_flag_exists(1, created.course_id, MilestoneKind::Halfway)
            .unwrap());
    }
}
