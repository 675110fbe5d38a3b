//! Notification Collaborators
//!
//! 외부 알림/사용자 정보 서비스와의 경계. 알림은 fire-and-forget 이며
//! 실패해도 진행 상태는 되돌리지 않습니다.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::MilestoneKind;

/// 알림 발송에 필요한 사용자 표시 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub notify_opt_out: bool,
}

/// 알림 경계 에러
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// 사용자 정보 조회 (`GetUserById`)
pub trait IdentityProvider: Send + Sync {
    fn get_user_by_id(&self, user_id: i64) -> Result<UserProfile, NotifyError>;
}

/// 외부 알림 발송기에 전달되는 내용
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneNotice {
    pub kind: MilestoneKind,
    pub user_id: i64,
    pub course_id: i64,
    pub course_title: String,
    pub recipient: UserProfile,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &MilestoneNotice) -> Result<(), NotifyError>;
}

/// 로그만 남기는 기본 발송기
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, notice: &MilestoneNotice) -> Result<(), NotifyError> {
        info!(
            kind = notice.kind.as_str(),
            user_id = notice.user_id,
            course_id = notice.course_id,
            "milestone notice"
        );
        Ok(())
    }
}

/// 사용자 정보를 붙여 알림을 보내는 디스패처
#[derive(Clone)]
pub struct NotificationDispatcher {
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(identity: Arc<dyn IdentityProvider>, notifier: Arc<dyn Notifier>) -> Self {
        Self { identity, notifier }
    }

    /// 동기 발송. 수신 거부 사용자면 `Ok(false)`.
    pub fn deliver(
        &self,
        kind: MilestoneKind,
        user_id: i64,
        course_id: i64,
        course_title: &str,
    ) -> Result<bool, NotifyError> {
        let recipient = self.identity.get_user_by_id(user_id)?;
        if recipient.notify_opt_out {
            return Ok(false);
        }

        self.notifier.notify(&MilestoneNotice {
            kind,
            user_id,
            course_id,
            course_title: course_title.to_string(),
            recipient,
        })?;
        Ok(true)
    }

    /// fire-and-forget 발송
    ///
    /// tokio 런타임 안이면 blocking 풀에서 실행하고 핸들을 돌려주며,
    /// 런타임 밖이면 별도 스레드로 넘기고 `None` 을 돌려줍니다.
    /// 어느 쪽이든 호출자는 발송을 기다리지 않고, 실패는 로그로만 남습니다.
    pub fn fire(
        &self,
        kind: MilestoneKind,
        user_id: i64,
        course_id: i64,
        course_title: String,
    ) -> Option<tokio::task::JoinHandle<()>> {
        let dispatcher = self.clone();
        let run = move || match dispatcher.deliver(kind, user_id, course_id, &course_title) {
            Ok(true) => debug!(kind = kind.as_str(), user_id, course_id, "notification delivered"),
            Ok(false) => debug!(kind = kind.as_str(), user_id, course_id, "user opted out"),
            Err(e) => warn!(kind = kind.as_str(), user_id, course_id, error = %e, "notification failed"),
        };

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            return Some(handle.spawn_blocking(run));
        }

        if let Err(e) = std::thread::Builder::new()
            .name("milestone-notify".to_string())
            .spawn(run)
        {
            warn!(kind = kind.as_str(), user_id, course_id, error = %e, "failed to spawn notification thread");
        }
        None
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::testing::*;
    use super::*;

    #[test]
    fn test_deliver_skips_opted_out_users() {
        let notifier = Arc::new(RecordingNotifier::default());
        let identity = StaticIdentity::default().with_user(1, false).with_user(2, true);
        let dispatcher = NotificationDispatcher::new(Arc::new(identity), notifier.clone());

        assert!(dispatcher.deliver(MilestoneKind::Halfway, 1, 10, "Go Basics").unwrap());
        assert!(!dispatcher.deliver(MilestoneKind::Halfway, 2, 10, "Go Basics").unwrap());

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient.email, "user1@example.com");
        assert_eq!(sent[0].course_title, "Go Basics");
    }

    #[test]
    fn test_fire_outside_runtime_swallows_errors() {
        let dispatcher = NotificationDispatcher::new(
            Arc::new(StaticIdentity::default().with_user(1, false)),
            Arc::new(FailingNotifier),
        );
        assert!(dispatcher
            .fire(MilestoneKind::CourseStarted, 1, 10, "Go Basics".to_string())
            .is_none());
        // 알 수 없는 사용자도 호출자에게 에러를 돌려주지 않는다
        assert!(dispatcher
            .fire(MilestoneKind::CourseStarted, 99, 10, "Go Basics".to_string())
            .is_none());
    }

    #[test]
    fn test_fire_outside_runtime_does_not_wait_for_delivery() {
        let notifier = Arc::new(SlowNotifier::new(Duration::from_millis(600)));
        let dispatcher = NotificationDispatcher::new(
            Arc::new(StaticIdentity::default().with_user(1, false)),
            notifier.clone(),
        );

        let started = std::time::Instant::now();
        dispatcher.fire(MilestoneKind::Halfway, 1, 10, "Go Basics".to_string());
        assert!(started.elapsed() < Duration::from_millis(300));

        let sent = notifier.inner.wait_for(1);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, MilestoneKind::Halfway);
    }

    #[tokio::test]
    async fn test_fire_inside_runtime_uses_blocking_pool() {
        let notifier = Arc::new(RecordingNotifier::default());
        let dispatcher = NotificationDispatcher::new(
            Arc::new(StaticIdentity::default().with_user(1, false)),
            notifier.clone(),
        );

        let handle = dispatcher
            .fire(MilestoneKind::Halfway, 1, 10, "Go Basics".to_string())
            .expect("runtime handle");
        handle.await.unwrap();

        assert_eq!(notifier.sent()[0].kind, MilestoneKind::Halfway);
    }
}
