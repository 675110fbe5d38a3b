//! Curriculum Authoring
//!
//! 코스 트리 전체를 하나의 트랜잭션으로 저장합니다. 커리큘럼에 대한 유일한 쓰기 경로입니다.

use std::collections::HashSet;

use super::Database;
use crate::error::ProgressError;
use crate::models::{CreatedCourse, LessonType, NewCourse, NewLesson};

fn check_orders<'a>(kind: &str, orders: impl Iterator<Item = &'a i64>) -> Result<(), ProgressError> {
    let mut seen = HashSet::new();
    for order in orders {
        if *order < 1 {
            return Err(ProgressError::InvalidOperation(format!(
                "{} order must be 1-based, got {}",
                kind, order
            )));
        }
        if !seen.insert(*order) {
            return Err(ProgressError::InvalidOperation(format!(
                "duplicate {} order {}",
                kind, order
            )));
        }
    }
    Ok(())
}

fn check_options(lesson: &NewLesson) -> Result<(), ProgressError> {
    let is_quiz = lesson.content.lesson_type() == LessonType::Quiz;
    if !is_quiz {
        if !lesson.options.is_empty() {
            return Err(ProgressError::InvalidOperation(format!(
                "lesson '{}' is not a quiz but has answer options",
                lesson.title
            )));
        }
        return Ok(());
    }

    // 단일 선택형: 정답은 정확히 하나
    let correct = lesson.options.iter().filter(|o| o.is_correct).count();
    if correct != 1 {
        return Err(ProgressError::InvalidOperation(format!(
            "quiz '{}' must have exactly one correct option, found {}",
            lesson.title, correct
        )));
    }
    Ok(())
}

/// 저장 전 트리 검증
fn validate(course: &NewCourse) -> Result<(), ProgressError> {
    check_orders("part", course.parts.iter().map(|p| &p.order))?;
    for part in &course.parts {
        check_orders("bucket", part.buckets.iter().map(|b| &b.order))?;
        for bucket in &part.buckets {
            check_orders("lesson", bucket.lessons.iter().map(|l| &l.order))?;
            for lesson in &bucket.lessons {
                check_options(lesson)?;
            }
        }
    }
    Ok(())
}

impl Database {
    /// 코스 트리 저장
    ///
    /// 반환되는 `lesson_ids` 는 파트/버킷/레슨 order 순으로 정렬된 커리큘럼 순서입니다.
    pub fn create_course(&self, course: &NewCourse) -> Result<CreatedCourse, ProgressError> {
        validate(course)?;

        let tx = self.conn.unchecked_transaction()?;
        let mut created = CreatedCourse::default();

        tx.execute(
            "INSERT INTO courses (title, description, price, duration_minutes)
             VALUES (?1, ?2, ?3, ?4)",
            (&course.title, &course.description, course.price, course.duration_minutes),
        )?;
        created.course_id = tx.last_insert_rowid();

        let mut parts: Vec<_> = course.parts.iter().collect();
        parts.sort_by_key(|p| p.order);
        for part in parts {
            tx.execute(
                "INSERT INTO parts (course_id, part_order, title) VALUES (?1, ?2, ?3)",
                (created.course_id, part.order, &part.title),
            )?;
            let part_id = tx.last_insert_rowid();
            created.part_ids.push(part_id);

            let mut buckets: Vec<_> = part.buckets.iter().collect();
            buckets.sort_by_key(|b| b.order);
            for bucket in buckets {
                tx.execute(
                    "INSERT INTO lesson_buckets (part_id, bucket_order, title) VALUES (?1, ?2, ?3)",
                    (part_id, bucket.order, &bucket.title),
                )?;
                let bucket_id = tx.last_insert_rowid();
                created.bucket_ids.push(bucket_id);

                let mut lessons: Vec<_> = bucket.lessons.iter().collect();
                lessons.sort_by_key(|l| l.order);
                for lesson in lessons {
                    tx.execute(
                        "INSERT INTO lesson_points (bucket_id, lesson_order, title, lesson_type, content_json)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                        (
                            bucket_id,
                            lesson.order,
                            &lesson.title,
                            lesson.content.lesson_type().as_str(),
                            serde_json::to_string(&lesson.content)?,
                        ),
                    )?;
                    let lesson_id = tx.last_insert_rowid();
                    created.lesson_ids.push(lesson_id);

                    if lesson.options.is_empty() {
                        continue;
                    }
                    let mut option_ids = Vec::with_capacity(lesson.options.len());
                    for option in &lesson.options {
                        tx.execute(
                            "INSERT INTO quiz_options (question_id, text, is_correct) VALUES (?1, ?2, ?3)",
                            (lesson_id, &option.text, option.is_correct),
                        )?;
                        option_ids.push(tx.last_insert_rowid());
                    }
                    created.option_ids.insert(lesson_id, option_ids);
                }
            }
        }

        tx.commit()?;
        tracing::info!(
            course_id = created.course_id,
            lessons = created.lesson_ids.len(),
            "course created"
        );
        Ok(created)
    }
}
