//! Milestone Flags
//!
//! (user, course, kind) 당 한 번만 기록되는 알림 플래그

use rusqlite::OptionalExtension;

use super::{now_millis, Database};
use crate::error::ProgressError;
use crate::models::MilestoneKind;

impl Database {
    pub fn milestone_flag_exists(
        &self,
        user_id: i64,
        course_id: i64,
        kind: MilestoneKind,
    ) -> Result<bool, ProgressError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM milestone_flags WHERE user_id = ?1 AND course_id = ?2 AND kind = ?3",
                (user_id, course_id, kind.as_str()),
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// 플래그 설정 시도
    ///
    /// 이번 호출이 플래그를 처음 기록했을 때만 `true`. 동시 호출 중 하나만 `true` 를 받습니다.
    pub fn try_set_milestone_flag(
        &self,
        user_id: i64,
        course_id: i64,
        kind: MilestoneKind,
    ) -> Result<bool, ProgressError> {
        let changed = self.conn.execute(
            "INSERT INTO milestone_flags (user_id, course_id, kind, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, course_id, kind) DO NOTHING",
            (user_id, course_id, kind.as_str(), now_millis()),
        )?;
        Ok(changed == 1)
    }
}
