//! Roadmap
//!
//! 완료 표시가 포함된 전체 커리큘럼 트리와 진행률 요약

use std::collections::HashSet;

use crate::context::CallContext;
use crate::db::Database;
use crate::error::ProgressError;
use crate::models::{CourseProgress, Roadmap, RoadmapBucket, RoadmapLesson, RoadmapPart};

pub fn build_roadmap(
    db: &Database,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
) -> Result<Roadmap, ProgressError> {
    ctx.check()?;
    let course = db.get_course(course_id)?;
    let done: HashSet<i64> = db
        .list_checkpoints(user_id, course_id)?
        .into_iter()
        .map(|c| c.lesson_id)
        .collect();

    let mut parts = Vec::new();
    for part in db.get_parts(course_id)? {
        ctx.check()?;
        let mut buckets = Vec::new();
        for bucket in db.get_buckets(part.id)? {
            let lessons = db
                .get_lessons(bucket.id)?
                .into_iter()
                .map(|l| RoadmapLesson {
                    is_done: done.contains(&l.id),
                    id: l.id,
                    order: l.order,
                    title: l.title,
                    lesson_type: l.lesson_type,
                })
                .collect();
            buckets.push(RoadmapBucket {
                id: bucket.id,
                order: bucket.order,
                title: bucket.title,
                lessons,
            });
        }
        parts.push(RoadmapPart {
            id: part.id,
            order: part.order,
            title: part.title,
            buckets,
        });
    }

    Ok(Roadmap {
        course_id: course.id,
        title: course.title,
        parts,
    })
}

pub fn course_progress(
    db: &Database,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
) -> Result<CourseProgress, ProgressError> {
    ctx.check()?;
    db.get_course(course_id)?;
    let completed = db.count_checkpoints(user_id, course_id)?;
    let total = db.count_lessons_in_course(course_id)?;

    let percent = if total == 0 {
        0.0
    } else {
        (completed as f64 * 100.0 / total as f64).min(100.0)
    };

    Ok(CourseProgress {
        completed_lessons: completed,
        total_lessons: total,
        percent,
    })
}
