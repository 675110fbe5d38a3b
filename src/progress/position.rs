//! Position Resolver
//!
//! (user, course) 의 현재 레슨과 헤더를 계산합니다.
//! - 체크포인트가 없으면 첫 파트/첫 버킷/첫 레슨 (신규 수강)
//! - 있으면 가장 최근 체크포인트의 레슨 (이어 보기)

use std::collections::HashSet;

use tracing::debug;

use crate::context::CallContext;
use crate::db::Database;
use crate::error::ProgressError;
use crate::models::{Course, CurrentLesson, LessonBucket, LessonHeader, LessonPoint, LessonPointStatus, Part};

/// 위치 계산 옵션
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionOptions {
    /// 신규 수강 시 첫 레슨에 체크포인트를 기록할지 여부 (기본: 기록하지 않음)
    pub checkpoint_first_lesson: bool,
}

fn build_header(
    course: &Course,
    part: &Part,
    bucket: &LessonBucket,
    lessons: &[LessonPoint],
    done: &HashSet<i64>,
) -> LessonHeader {
    LessonHeader {
        course_id: course.id,
        course_title: course.title.clone(),
        part_order: part.order,
        part_title: part.title.clone(),
        bucket_order: bucket.order,
        bucket_title: bucket.title.clone(),
        lessons: lessons
            .iter()
            .map(|l| LessonPointStatus {
                lesson_id: l.id,
                lesson_type: l.lesson_type,
                is_done: done.contains(&l.id),
            })
            .collect(),
    }
}

/// 코스의 첫 파트, 첫 버킷, 그 버킷의 레슨 목록
fn first_position(
    db: &Database,
    ctx: &CallContext,
    course: &Course,
) -> Result<(Part, LessonBucket, Vec<LessonPoint>), ProgressError> {
    let part = db.get_parts(course.id)?.into_iter().next().ok_or_else(|| {
        ProgressError::StructuralInconsistency(format!("course {} has no parts", course.id))
    })?;

    ctx.check()?;
    let bucket = db.get_buckets(part.id)?.into_iter().next().ok_or_else(|| {
        ProgressError::StructuralInconsistency(format!("part {} has no buckets", part.id))
    })?;

    ctx.check()?;
    let lessons = db.get_lessons(bucket.id)?;
    Ok((part, bucket, lessons))
}

/// 현재 레슨 계산
pub fn resolve_position(
    db: &Database,
    ctx: &CallContext,
    user_id: i64,
    course_id: i64,
    options: PositionOptions,
) -> Result<CurrentLesson, ProgressError> {
    ctx.check()?;
    let course = db.get_course(course_id)?;
    let checkpoints = db.list_checkpoints(user_id, course_id)?;

    ctx.check()?;
    let Some(latest) = checkpoints.first() else {
        let (part, bucket, lessons) = first_position(db, ctx, &course)?;
        let first = lessons.first().ok_or_else(|| {
            ProgressError::StructuralInconsistency(format!("bucket {} has no lessons", bucket.id))
        })?;

        let mut done = HashSet::new();
        if options.checkpoint_first_lesson {
            ctx.check()?;
            db.insert_checkpoint(user_id, first.id, course_id)?;
            done.insert(first.id);
        }

        debug!(user_id, course_id, lesson_id = first.id, "bootstrap position");
        return Ok(CurrentLesson {
            header: build_header(&course, &part, &bucket, &lessons, &done),
            lesson_id: first.id,
            lesson_type: first.lesson_type,
            is_new_enrollment: true,
        });
    };

    let (part, bucket) = db.get_part_bucket_chain(latest.lesson_id)?;
    ctx.check()?;
    let lessons = db.get_lessons(bucket.id)?;
    if lessons.is_empty() {
        return Err(ProgressError::StructuralInconsistency(format!(
            "bucket {} has no lessons",
            bucket.id
        )));
    }

    // 최근 1건이 아니라 코스 내 전체 체크포인트 기준
    let done: HashSet<i64> = checkpoints.iter().map(|c| c.lesson_id).collect();

    debug!(user_id, course_id, lesson_id = latest.lesson_id, "resume position");
    Ok(CurrentLesson {
        header: build_header(&course, &part, &bucket, &lessons, &done),
        lesson_id: latest.lesson_id,
        lesson_type: latest.lesson_type,
        is_new_enrollment: false,
    })
}
