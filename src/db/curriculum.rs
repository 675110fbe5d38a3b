//! Curriculum Store
//!
//! 코스 → 파트 → 버킷 → 레슨 트리 조회 (읽기 전용)

use rusqlite::OptionalExtension;

use super::Database;
use crate::error::ProgressError;
use crate::models::{Course, LessonBucket, LessonContent, LessonPoint, LessonType, Part, QuizOption};

/// lesson_points 테이블 원시 행
struct LessonRow {
    id: i64,
    bucket_id: i64,
    order: i64,
    title: String,
    lesson_type: String,
    content_json: String,
}

impl LessonRow {
    const COLUMNS: &'static str = "id, bucket_id, lesson_order, title, lesson_type, content_json";

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            bucket_id: row.get(1)?,
            order: row.get(2)?,
            title: row.get(3)?,
            lesson_type: row.get(4)?,
            content_json: row.get(5)?,
        })
    }

    fn into_lesson(self) -> Result<LessonPoint, ProgressError> {
        let lesson_type = LessonType::parse(&self.lesson_type).ok_or_else(|| {
            ProgressError::StructuralInconsistency(format!(
                "lesson {} has unknown type '{}'",
                self.id, self.lesson_type
            ))
        })?;
        let content: LessonContent = serde_json::from_str(&self.content_json)?;

        Ok(LessonPoint {
            id: self.id,
            bucket_id: self.bucket_id,
            order: self.order,
            title: self.title,
            lesson_type,
            content,
        })
    }
}

fn part_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Part> {
    Ok(Part {
        id: row.get(0)?,
        course_id: row.get(1)?,
        order: row.get(2)?,
        title: row.get(3)?,
    })
}

fn bucket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LessonBucket> {
    Ok(LessonBucket {
        id: row.get(0)?,
        part_id: row.get(1)?,
        order: row.get(2)?,
        title: row.get(3)?,
    })
}

impl Database {
    /// 코스 조회
    pub fn get_course(&self, course_id: i64) -> Result<Course, ProgressError> {
        self.conn
            .query_row(
                "SELECT id, title, description, price, duration_minutes FROM courses WHERE id = ?1",
                [course_id],
                |row| {
                    Ok(Course {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                        price: row.get(3)?,
                        duration_minutes: row.get(4)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| ProgressError::CourseNotFound(course_id.to_string()))
    }

    /// 코스의 파트 목록 (order 오름차순)
    pub fn get_parts(&self, course_id: i64) -> Result<Vec<Part>, ProgressError> {
        // 존재하지 않는 코스는 빈 목록이 아니라 NotFound
        self.get_course(course_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, course_id, part_order, title FROM parts
             WHERE course_id = ?1 ORDER BY part_order ASC",
        )?;
        let iter = stmt.query_map([course_id], part_from_row)?;
        let mut parts = Vec::new();
        for part in iter {
            parts.push(part?);
        }
        Ok(parts)
    }

    /// 파트 조회
    pub fn get_part(&self, part_id: i64) -> Result<Part, ProgressError> {
        self.conn
            .query_row(
                "SELECT id, course_id, part_order, title FROM parts WHERE id = ?1",
                [part_id],
                part_from_row,
            )
            .optional()?
            .ok_or_else(|| ProgressError::PartNotFound(part_id.to_string()))
    }

    /// 파트의 버킷 목록 (order 오름차순)
    pub fn get_buckets(&self, part_id: i64) -> Result<Vec<LessonBucket>, ProgressError> {
        self.get_part(part_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, part_id, bucket_order, title FROM lesson_buckets
             WHERE part_id = ?1 ORDER BY bucket_order ASC",
        )?;
        let iter = stmt.query_map([part_id], bucket_from_row)?;
        let mut buckets = Vec::new();
        for bucket in iter {
            buckets.push(bucket?);
        }
        Ok(buckets)
    }

    /// 버킷 조회
    pub fn get_bucket(&self, bucket_id: i64) -> Result<LessonBucket, ProgressError> {
        self.conn
            .query_row(
                "SELECT id, part_id, bucket_order, title FROM lesson_buckets WHERE id = ?1",
                [bucket_id],
                bucket_from_row,
            )
            .optional()?
            .ok_or_else(|| ProgressError::BucketNotFound(bucket_id.to_string()))
    }

    /// 버킷의 레슨 목록 (order 오름차순)
    pub fn get_lessons(&self, bucket_id: i64) -> Result<Vec<LessonPoint>, ProgressError> {
        self.get_bucket(bucket_id)?;

        let sql = format!(
            "SELECT {} FROM lesson_points WHERE bucket_id = ?1 ORDER BY lesson_order ASC",
            LessonRow::COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let iter = stmt.query_map([bucket_id], LessonRow::from_row)?;

        let mut lessons = Vec::new();
        for row in iter {
            lessons.push(row?.into_lesson()?);
        }
        Ok(lessons)
    }

    /// 레슨 조회 (콘텐츠 포함)
    pub fn get_lesson_by_id(&self, lesson_id: i64) -> Result<LessonPoint, ProgressError> {
        let sql = format!("SELECT {} FROM lesson_points WHERE id = ?1", LessonRow::COLUMNS);
        self.conn
            .query_row(&sql, [lesson_id], LessonRow::from_row)
            .optional()?
            .ok_or_else(|| ProgressError::LessonNotFound(lesson_id.to_string()))?
            .into_lesson()
    }

    /// 레슨이 속한 버킷
    pub fn get_bucket_of(&self, lesson_id: i64) -> Result<LessonBucket, ProgressError> {
        let lesson = self.get_lesson_by_id(lesson_id)?;
        self.get_bucket(lesson.bucket_id)
    }

    /// 레슨이 속한 (파트, 버킷)
    pub fn get_part_bucket_chain(&self, lesson_id: i64) -> Result<(Part, LessonBucket), ProgressError> {
        let bucket = self.get_bucket_of(lesson_id)?;
        let part = self.get_part(bucket.part_id)?;
        Ok((part, bucket))
    }

    /// 레슨이 속한 코스 id
    pub fn course_of_lesson(&self, lesson_id: i64) -> Result<i64, ProgressError> {
        self.conn
            .query_row(
                "SELECT p.course_id FROM lesson_points l
                 JOIN lesson_buckets b ON b.id = l.bucket_id
                 JOIN parts p ON p.id = b.part_id
                 WHERE l.id = ?1",
                [lesson_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| ProgressError::LessonNotFound(lesson_id.to_string()))
    }

    /// 퀴즈 문항의 선택지 목록 (등록 순서)
    pub fn get_quiz_options(&self, question_id: i64) -> Result<Vec<QuizOption>, ProgressError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, question_id, text, is_correct FROM quiz_options
             WHERE question_id = ?1 ORDER BY id ASC",
        )?;
        let iter = stmt.query_map([question_id], |row| {
            Ok(QuizOption {
                id: row.get(0)?,
                question_id: row.get(1)?,
                text: row.get(2)?,
                is_correct: row.get(3)?,
            })
        })?;

        let mut options = Vec::new();
        for option in iter {
            options.push(option?);
        }
        Ok(options)
    }

    /// 특정 문항에 속한 선택지 조회 (다른 문항의 선택지 id는 NotFound)
    pub fn get_quiz_option(&self, question_id: i64, answer_id: i64) -> Result<QuizOption, ProgressError> {
        self.conn
            .query_row(
                "SELECT id, question_id, text, is_correct FROM quiz_options
                 WHERE id = ?1 AND question_id = ?2",
                [answer_id, question_id],
                |row| {
                    Ok(QuizOption {
                        id: row.get(0)?,
                        question_id: row.get(1)?,
                        text: row.get(2)?,
                        is_correct: row.get(3)?,
                    })
                },
            )
            .optional()?
            .ok_or(ProgressError::AnswerNotFound {
                question_id,
                answer_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::fixtures;
    use crate::error::ProgressError;
    use crate::models::LessonType;

    #[test]
    fn test_listings_are_sorted_by_order() {
        let (db, created) = fixtures::seeded(fixtures::shuffled_orders());
        let parts = db.get_parts(created.course_id).unwrap();
        let orders: Vec<i64> = parts.iter().map(|p| p.order).collect();
        assert_eq!(orders, vec![1, 2]);

        let buckets = db.get_buckets(parts[0].id).unwrap();
        assert_eq!(buckets.iter().map(|b| b.order).collect::<Vec<_>>(), vec![1, 2]);

        let lessons = db.get_lessons(buckets[0].id).unwrap();
        assert_eq!(lessons.iter().map(|l| l.order).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_chain_resolves_part_and_bucket() {
        let (db, created) = fixtures::seeded(fixtures::go_basics());
        let l3 = created.lesson_ids[2];
        let (part, bucket) = db.get_part_bucket_chain(l3).unwrap();
        assert_eq!(part.order, 2);
        assert_eq!(bucket.title, "Bucket2");
        assert_eq!(db.course_of_lesson(l3).unwrap(), created.course_id);
        assert_eq!(db.get_lesson_by_id(l3).unwrap().lesson_type, LessonType::Quiz);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let (db, _) = fixtures::seeded(fixtures::go_basics());
        assert!(matches!(db.get_course(999), Err(ProgressError::CourseNotFound(ref id)) if id == "999"));
        assert!(db.get_parts(999).unwrap_err().is_not_found());
        assert!(db.get_buckets(999).unwrap_err().is_not_found());
        assert!(db.get_lessons(999).unwrap_err().is_not_found());
        assert!(db.get_lesson_by_id(999).unwrap_err().is_not_found());
        assert!(db.get_part_bucket_chain(999).unwrap_err().is_not_found());
    }

    #[test]
    fn test_quiz_option_is_scoped_to_question() {
        let (db, created) = fixtures::seeded(fixtures::go_basics());
        let l3 = created.lesson_ids[2];
        let options = &created.option_ids[&l3];

        let correct = db.get_quiz_option(l3, options[0]).unwrap();
        assert!(correct.is_correct);

        let foreign = db.get_quiz_option(created.lesson_ids[0], options[0]);
        assert!(matches!(foreign, Err(ProgressError::AnswerNotFound { .. })));
    }
}
