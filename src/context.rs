//! Call Context
//!
//! 호출자가 넘기는 취소 신호와 기한. 저장소 호출 사이마다 `check()` 로 확인합니다.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::error::ProgressError;

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl CallContext {
    /// 기한/취소 없는 컨텍스트
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: CancellationToken::new(),
        }
    }

    /// 상위 작업(요청 핸들러, 종료 신호 등)의 토큰에 묶인 컨텍스트
    ///
    /// 부모가 취소되면 이 호출도 취소되지만, 이 호출의 취소는 부모로 번지지 않습니다.
    pub fn with_parent(parent: &CancellationToken) -> Self {
        Self {
            deadline: None,
            cancel: parent.child_token(),
        }
    }

    /// 기한이 없을 때만 `timeout` 을 기한으로 적용한 복사본 (취소 토큰은 공유)
    pub fn or_timeout(&self, timeout: Option<Duration>) -> Self {
        match (self.deadline, timeout) {
            (None, Some(timeout)) => Self {
                deadline: Some(Instant::now() + timeout),
                cancel: self.cancel.clone(),
            },
            _ => self.clone(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 다른 스레드/태스크에서 이 호출을 취소할 때 쓰는 토큰
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// 취소됐거나 기한이 지났으면 에러
    pub fn check(&self) -> Result<(), ProgressError> {
        if self.cancel.is_cancelled() {
            return Err(ProgressError::Canceled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(ProgressError::DeadlineExceeded);
            }
        }
        Ok(())
    }
}
