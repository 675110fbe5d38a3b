//! Course Progress - 커리큘럼 진행 상태 계산 라이브러리
//!
//! 코스 → 파트 → 버킷 → 레슨 트리와 체크포인트 로그를 바탕으로 현재 레슨,
//! 이전/다음 레슨, 로드맵, 퀴즈 채점, 진행률 마일스톤을 계산합니다.

pub mod commands;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod progress;
pub mod telemetry;

use std::sync::Arc;

pub use commands::ProgressState;
pub use config::ProgressConfig;
pub use context::CallContext;
pub use error::{CommandError, CommandResult, ProgressError};

use notify::{IdentityProvider, NotificationDispatcher, Notifier};

/// 설정으로부터 공유 상태 구성
///
/// 로그 구독자를 설치하고, DB 파일을 열어 스키마를 초기화합니다.
pub fn open(
    config: ProgressConfig,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
) -> Result<ProgressState, ProgressError> {
    telemetry::init_tracing(&config.log_filter);

    let db = db::Database::new(&config.database_path, config.busy_timeout)?;
    db.initialize()?;

    tracing::info!(path = %config.database_path.display(), "course progress store ready");
    Ok(ProgressState::new(
        db,
        NotificationDispatcher::new(identity, notifier),
        config,
    ))
}

/// 환경 변수(`.env.local` / `.env` 포함)에서 설정을 읽어 공유 상태 구성
pub fn open_from_env(
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
) -> Result<ProgressState, ProgressError> {
    let config = ProgressConfig::from_env()?;
    open(config, identity, notifier)
}
