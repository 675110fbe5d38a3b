//! Configuration
//!
//! 환경 변수 기반 설정. 개발 환경에서는 `.env.local` / `.env` 를 먼저 로드합니다.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const ENV_DB_PATH: &str = "COURSE_PROGRESS_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "COURSE_PROGRESS_BUSY_TIMEOUT_MS";
pub const ENV_AUTO_CHECKPOINT: &str = "COURSE_PROGRESS_AUTO_CHECKPOINT_FIRST_LESSON";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "COURSE_PROGRESS_REQUEST_TIMEOUT_MS";
pub const ENV_LOG: &str = "COURSE_PROGRESS_LOG";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressConfig {
    pub database_path: PathBuf,
    pub busy_timeout: Duration,
    /// 신규 수강 시 첫 레슨을 자동 체크포인트할지 여부
    pub auto_checkpoint_first_lesson: bool,
    /// 호출자가 기한을 주지 않을 때 적용할 기본 기한
    pub request_timeout: Option<Duration>,
    /// `RUST_LOG` 가 없을 때 쓰는 로그 필터
    pub log_filter: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("course_progress.db"),
            busy_timeout: Duration::from_millis(5000),
            auto_checkpoint_first_lesson: false,
            request_timeout: None,
            log_filter: "info".to_string(),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// env 파일 로드 결과 기록. 파일이 없는 것은 정상이라 debug 로만 남깁니다.
fn env_file_loaded(file: &str, result: dotenvy::Result<PathBuf>) -> bool {
    match result {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded env file");
            true
        }
        Err(e) if e.not_found() => {
            tracing::debug!(file, "env file not found");
            false
        }
        Err(e) => {
            tracing::warn!(file, error = %e, "failed to load env file");
            false
        }
    }
}

impl ProgressConfig {
    /// 임의의 조회 함수로 설정 구성 (테스트에서 프로세스 환경을 건드리지 않기 위함)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        // 빈 문자열은 설정되지 않은 것으로 취급
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DB_PATH) {
            config.database_path = PathBuf::from(path.trim());
        }
        if let Some(value) = get(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout = parse_millis(ENV_BUSY_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = get(ENV_AUTO_CHECKPOINT) {
            config.auto_checkpoint_first_lesson = parse_bool(ENV_AUTO_CHECKPOINT, &value)?;
        }
        if let Some(value) = get(ENV_REQUEST_TIMEOUT_MS) {
            config.request_timeout = Some(parse_millis(ENV_REQUEST_TIMEOUT_MS, &value)?);
        }
        if let Some(value) = get(ENV_LOG) {
            config.log_filter = value.trim().to_string();
        }
        Ok(config)
    }

    /// 프로세스 환경에서 설정 로드
    ///
    /// `.env.local` 이 있으면 먼저 로드하고, 이어서 `.env` 를 로드합니다.
    /// 이미 설정된 환경 변수는 덮어쓰지 않으며, 파일이 없어도 실패하지 않습니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        for file in [".env.local", ".env"] {
            env_file_loaded(file, dotenvy::from_filename(file));
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ProgressConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ProgressConfig::default());
        assert!(!config.auto_checkpoint_first_lesson);
    }

    #[test]
    fn test_overrides() {
        let config = ProgressConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/tmp/progress.db"),
            (ENV_BUSY_TIMEOUT_MS, "250"),
            (ENV_AUTO_CHECKPOINT, "yes"),
            (ENV_REQUEST_TIMEOUT_MS, "1500"),
            (ENV_LOG, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/progress.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(config.auto_checkpoint_first_lesson);
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = ProgressConfig::from_lookup(lookup(&[(ENV_DB_PATH, "  ")])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("course_progress.db"));
    }

    #[test]
    fn test_invalid_value_names_the_key() {
        let err = ProgressConfig::from_lookup(lookup(&[(ENV_AUTO_CHECKPOINT, "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_AUTO_CHECKPOINT.to_string(),
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn test_env_file_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(".env.missing");
        assert!(!env_file_loaded(".env.missing", dotenvy::from_path(&missing).map(|_| missing.clone())));

        let present = dir.path().join(".env");
        std::fs::write(&present, "COURSE_PROGRESS_TEST_ENV_FILE=loaded\n").unwrap();
        assert!(env_file_loaded(".env", dotenvy::from_path(&present).map(|_| present.clone())));
        assert_eq!(std::env::var("COURSE_PROGRESS_TEST_ENV_FILE").unwrap(), "loaded");
    }
}
