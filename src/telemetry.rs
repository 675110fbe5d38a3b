//! Logging
//!
//! `tracing-subscriber` fmt 구독자 설치. `RUST_LOG` 이 있으면 우선합니다.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// 전역 구독자 설치 (여러 번 호출해도 한 번만 설치)
///
/// 다른 구독자가 이미 설치돼 있으면 그대로 둡니다.
pub fn init_tracing(default_filter: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        if let Err(e) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
        {
            tracing::debug!(error = %e, "global subscriber already installed, keeping it");
        }
    });
}
