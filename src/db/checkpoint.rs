//! Checkpoint Store
//!
//! (user, lesson) 당 1행의 완료 기록. 삽입/삭제는 모두 멱등입니다.

use rusqlite::OptionalExtension;

use super::{now_millis, Database};
use crate::error::ProgressError;
use crate::models::{Checkpoint, CheckpointEntry, LessonType};

impl Database {
    /// 체크포인트 존재 여부
    pub fn checkpoint_exists(&self, user_id: i64, lesson_id: i64) -> Result<bool, ProgressError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM checkpoints WHERE user_id = ?1 AND lesson_id = ?2",
                [user_id, lesson_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// 체크포인트 삽입
    ///
    /// 이미 있으면 아무것도 하지 않습니다. 새로 기록된 경우 `true`.
    /// 중복 방지는 UNIQUE(user_id, lesson_id) 제약에 맡깁니다.
    pub fn insert_checkpoint(
        &self,
        user_id: i64,
        lesson_id: i64,
        course_id: i64,
    ) -> Result<bool, ProgressError> {
        let changed = self.conn.execute(
            "INSERT INTO checkpoints (user_id, lesson_id, course_id, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, lesson_id) DO NOTHING",
            (user_id, lesson_id, course_id, now_millis()),
        )?;
        Ok(changed == 1)
    }

    /// 체크포인트 삭제 (없으면 no-op). 실제로 삭제된 경우 `true`.
    pub fn delete_checkpoint(&self, user_id: i64, lesson_id: i64) -> Result<bool, ProgressError> {
        let changed = self.conn.execute(
            "DELETE FROM checkpoints WHERE user_id = ?1 AND lesson_id = ?2",
            [user_id, lesson_id],
        )?;
        Ok(changed > 0)
    }

    /// 체크포인트 단건 조회
    pub fn get_checkpoint(&self, user_id: i64, lesson_id: i64) -> Result<Option<Checkpoint>, ProgressError> {
        let checkpoint = self
            .conn
            .query_row(
                "SELECT user_id, lesson_id, course_id, updated_at FROM checkpoints
                 WHERE user_id = ?1 AND lesson_id = ?2",
                [user_id, lesson_id],
                |row| {
                    Ok(Checkpoint {
                        user_id: row.get(0)?,
                        lesson_id: row.get(1)?,
                        course_id: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(checkpoint)
    }

    /// 코스 내 사용자 체크포인트 목록 (최신순)
    ///
    /// 같은 밀리초에 기록된 행은 삽입 순서(id)로 최신을 가립니다.
    pub fn list_checkpoints(&self, user_id: i64, course_id: i64) -> Result<Vec<CheckpointEntry>, ProgressError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.lesson_id, l.lesson_type FROM checkpoints c
             JOIN lesson_points l ON l.id = c.lesson_id
             WHERE c.user_id = ?1 AND c.course_id = ?2
             ORDER BY c.updated_at DESC, c.id DESC",
        )?;
        let iter = stmt.query_map([user_id, course_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in iter {
            let (lesson_id, lesson_type) = row?;
            let lesson_type = LessonType::parse(&lesson_type).ok_or_else(|| {
                ProgressError::StructuralInconsistency(format!(
                    "lesson {} has unknown type '{}'",
                    lesson_id, lesson_type
                ))
            })?;
            entries.push(CheckpointEntry {
                lesson_id,
                lesson_type,
            });
        }
        Ok(entries)
    }

    /// 코스 내 사용자 체크포인트 수
    pub fn count_checkpoints(&self, user_id: i64, course_id: i64) -> Result<i64, ProgressError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM checkpoints WHERE user_id = ?1 AND course_id = ?2",
            [user_id, course_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 코스의 전체 레슨 수
    pub fn count_lessons_in_course(&self, course_id: i64) -> Result<i64, ProgressError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM lesson_points l
             JOIN lesson_buckets b ON b.id = l.bucket_id
             JOIN parts p ON p.id = b.part_id
             WHERE p.course_id = ?1",
            [course_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::fixtures;
    use crate::models::LessonType;

    #[test]
    fn test_insert_is_idempotent() {
        let (db, created) = fixtures::seeded(fixtures::go_basics());
        let l1 = created.lesson_ids[0];

        assert!(db.insert_checkpoint(7, l1, created.course_id).unwrap());
        let first = db.get_checkpoint(7, l1).unwrap().unwrap();
        assert!(!db.insert_checkpoint(7, l1, created.course_id).unwrap());

        assert_eq!(db.count_checkpoints(7, created.course_id).unwrap(), 1);
        // 두 번째 방문은 타임스탬프도 바꾸지 않는다
        assert_eq!(db.get_checkpoint(7, l1).unwrap().unwrap(), first);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let (db, created) = fixtures::seeded(fixtures::go_basics());
        let l2 = created.lesson_ids[1];

        assert!(!db.delete_checkpoint(7, l2).unwrap());
        db.insert_checkpoint(7, l2, created.course_id).unwrap();
        assert!(db.delete_checkpoint(7, l2).unwrap());
        assert!(!db.checkpoint_exists(7, l2).unwrap());
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let (db, created) = fixtures::seeded(fixtures::go_basics());
        let ids = &created.lesson_ids;
        db.insert_checkpoint(7, ids[2], created.course_id).unwrap();
        db.insert_checkpoint(7, ids[0], created.course_id).unwrap();
        // 다른 사용자는 섞이지 않는다
        db.insert_checkpoint(8, ids[1], created.course_id).unwrap();

        let entries = db.list_checkpoints(7, created.course_id).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].lesson_id, ids[0]);
        assert_eq!(entries[0].lesson_type, LessonType::Text);
        assert_eq!(entries[1].lesson_id, ids[2]);
        assert_eq!(entries[1].lesson_type, LessonType::Quiz);
    }

    #[test]
    fn test_counts() {
        let (db, created) = fixtures::seeded(fixtures::go_basics());
        assert_eq!(db.count_lessons_in_course(created.course_id).unwrap(), 3);
        assert_eq!(db.count_checkpoints(7, created.course_id).unwrap(), 0);
        db.insert_checkpoint(7, created.lesson_ids[1], created.course_id).unwrap();
        assert_eq!(db.count_checkpoints(7, created.course_id).unwrap(), 1);
    }
}
