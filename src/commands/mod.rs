//! Progress Commands Module
//!
//! 전송 계층(RPC/HTTP)에서 호출하는 진입점. 각 명령은 공유 DB 잠금을 잡고
//! 계산기를 실행하고, 잠금을 놓은 뒤 필요하면 마일스톤 알림을 fire-and-forget 으로 보냅니다.

pub mod assessment;
pub mod completion;
pub mod navigation;

use tracing::{info, warn};

use crate::config::ProgressConfig;
use crate::context::CallContext;
use crate::db::{Database, DbState};
use crate::error::{CommandError, CommandResult, ProgressError};
use crate::models::MilestoneKind;
use crate::notify::NotificationDispatcher;
use crate::progress;

/// 명령 처리에 필요한 공유 상태
pub struct ProgressState {
    pub db: DbState,
    pub notifications: NotificationDispatcher,
    pub config: ProgressConfig,
}

impl ProgressState {
    pub fn new(db: Database, notifications: NotificationDispatcher, config: ProgressConfig) -> Self {
        Self {
            db: DbState::new(db),
            notifications,
            config,
        }
    }

    /// DB 잠금을 잡고 `f` 실행. 설정된 기본 기한을 적용하고 에러를 응답용으로 변환합니다.
    fn run<T>(
        &self,
        ctx: &CallContext,
        f: impl FnOnce(&Database, &CallContext) -> Result<T, ProgressError>,
    ) -> CommandResult<T> {
        let ctx = ctx.or_timeout(self.config.request_timeout);
        let db = self.db.lock().map_err(CommandError::from)?;
        f(&*db, &ctx).map_err(|e| {
            if !e.is_not_found() {
                warn!(error = %e, "command failed");
            }
            CommandError::from(e)
        })
    }

    /// 잠금을 놓은 뒤 호출. `halfway` 가 있으면 절반 달성 알림을 보냅니다.
    fn announce_halfway(&self, user_id: i64, course_id: i64, halfway: Option<String>) {
        if let Some(course_title) = halfway {
            info!(user_id, course_id, "halfway milestone reached");
            self.notifications
                .fire(MilestoneKind::Halfway, user_id, course_id, course_title);
        }
    }
}

/// 마일스톤 플래그를 기록하고, 처음 기록된 경우에만 알림에 쓸 코스 제목을 반환
///
/// 진행 상태는 이미 커밋된 뒤이므로 여기서의 실패는 로그만 남깁니다.
fn check_halfway(db: &Database, ctx: &CallContext, user_id: i64, course_id: i64) -> Option<String> {
    let reached = progress::is_halfway_milestone_reached(db, ctx, user_id, course_id)
        .and_then(|fired| if fired { db.get_course(course_id).map(Some) } else { Ok(None) });

    match reached {
        Ok(course) => course.map(|c| c.title),
        Err(e) => {
            warn!(user_id, course_id, error = %e, "halfway milestone check failed");
            None
        }
    }
}

#[cfg(test)]
pub(crate) fn test_state_with(
    course: crate::models::NewCourse,
    notifier: std::sync::Arc<dyn crate::notify::Notifier>,
) -> (ProgressState, crate::models::CreatedCourse) {
    use std::sync::Arc;

    use crate::notify::testing::StaticIdentity;

    let (db, created) = crate::db::fixtures::seeded(course);
    let identity = StaticIdentity::default().with_user(1, false).with_user(2, false);
    let dispatcher = NotificationDispatcher::new(Arc::new(identity), notifier);
    (ProgressState::new(db, dispatcher, ProgressConfig::default()), created)
}

#[cfg(test)]
pub(crate) fn test_state(
    notifier: std::sync::Arc<dyn crate::notify::Notifier>,
) -> (ProgressState, crate::models::CreatedCourse) {
    test_state_with(crate::db::fixtures::go_basics(), notifier)
}
