//! Database Module
//!
//! SQLite 기반 커리큘럼/체크포인트 저장소

mod answers;
mod authoring;
mod checkpoint;
mod curriculum;
mod milestone;
mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::Connection;

use crate::error::ProgressError;

/// 공유 데이터베이스 상태 (요청 처리 워커 간 공유)
pub struct DbState(pub Mutex<Database>);

impl DbState {
    pub fn new(db: Database) -> Self {
        Self(Mutex::new(db))
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, Database>, ProgressError> {
        self.0
            .lock()
            .map_err(|e| ProgressError::LockPoisoned(e.to_string()))
    }
}

/// 데이터베이스 래퍼
pub struct Database {
    conn: Connection,
}

impl Database {
    /// 파일 데이터베이스 연결 생성
    ///
    /// 여러 프로세스가 같은 파일을 공유할 수 있도록 WAL 모드와 busy timeout을 설정합니다.
    pub fn new(path: &Path, busy_timeout: Duration) -> Result<Self, ProgressError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(path = %path.display(), journal_mode = %mode, "database opened");
        Ok(Self { conn })
    }

    /// 메모리 데이터베이스 (테스트/임베디드 용도)
    pub fn open_in_memory() -> Result<Self, ProgressError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 데이터베이스 스키마 초기화
    pub fn initialize(&self) -> Result<(), ProgressError> {
        self.conn.execute_batch(schema::CREATE_SCHEMA)?;
        Ok(())
    }
}

/// 체크포인트/답안 타임스탬프 (밀리초)
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_initialize_is_repeatable() {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db.initialize().unwrap();
    }

    #[test]
    fn test_file_database_persists_checkpoints() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.db");

        let lesson_id = {
            let db = Database::new(&path, Duration::from_millis(500)).unwrap();
            db.initialize().unwrap();
            let created = db.create_course(&fixtures::go_basics()).unwrap();
            let l1 = created.lesson_ids[0];
            db.insert_checkpoint(1, l1, created.course_id).unwrap();
            l1
        };

        let db = Database::new(&path, Duration::from_millis(500)).unwrap();
        db.initialize().unwrap();
        assert!(db.checkpoint_exists(1, lesson_id).unwrap());
    }

    #[test]
    fn test_unique_constraint_across_connections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shared.db");

        let first = Database::new(&path, Duration::from_secs(2)).unwrap();
        first.initialize().unwrap();
        let created = first.create_course(&fixtures::go_basics()).unwrap();
        let second = Database::new(&path, Duration::from_secs(2)).unwrap();

        let lesson = created.lesson_ids[1];
        let a = first.insert_checkpoint(3, lesson, created.course_id).unwrap();
        let b = second.insert_checkpoint(3, lesson, created.course_id).unwrap();
        assert!(a ^ b);
        assert_eq!(second.count_checkpoints(3, created.course_id).unwrap(), 1);
    }
}
