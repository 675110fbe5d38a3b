//! Footer Resolver
//!
//! 레슨 id 하나로 이전/현재/다음 레슨을 계산합니다. 버킷 끝에서는 옆 버킷으로,
//! 파트의 마지막 버킷 끝에서는 옆 파트로 넘어가며, 탐색 범위는 항상 레슨이 속한 코스입니다.

use crate::context::CallContext;
use crate::db::Database;
use crate::error::ProgressError;
use crate::models::{Footer, LessonBucket, Part, NO_LESSON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

impl Direction {
    /// order 오름차순 목록에서 `anchor` 바로 옆 항목
    fn adjacent<T>(self, sorted: &[T], anchor: i64, order: impl Fn(&T) -> i64) -> Option<&T> {
        match self {
            Direction::Backward => sorted.iter().rev().find(|&item| order(item) < anchor),
            Direction::Forward => sorted.iter().find(|&item| order(item) > anchor),
        }
    }

    /// 넘어간 컨테이너에서 진입할 쪽 끝 항목 (뒤로 가면 마지막, 앞으로 가면 첫 번째)
    fn entry<T>(self, sorted: &[T]) -> Option<&T> {
        match self {
            Direction::Backward => sorted.last(),
            Direction::Forward => sorted.first(),
        }
    }
}

/// 버킷 진입 레슨. 빈 버킷은 저작 데이터 손상입니다.
fn entry_lesson(db: &Database, bucket: &LessonBucket, dir: Direction) -> Result<i64, ProgressError> {
    let lessons = db.get_lessons(bucket.id)?;
    dir.entry(&lessons).map(|l| l.id).ok_or_else(|| {
        ProgressError::StructuralInconsistency(format!("bucket {} has no lessons", bucket.id))
    })
}

/// 현재 버킷 밖의 이웃 레슨: 같은 파트의 옆 버킷, 없으면 같은 코스의 옆 파트
fn across_boundary(
    db: &Database,
    ctx: &CallContext,
    part: &Part,
    bucket: &LessonBucket,
    dir: Direction,
) -> Result<Option<i64>, ProgressError> {
    ctx.check()?;
    let buckets = db.get_buckets(part.id)?;
    if let Some(target) = dir.adjacent(&buckets, bucket.order, |b| b.order) {
        return entry_lesson(db, target, dir).map(Some);
    }

    ctx.check()?;
    let parts = db.get_parts(part.course_id)?;
    let Some(target_part) = dir.adjacent(&parts, part.order, |p| p.order) else {
        // 코스의 처음/끝
        return Ok(None);
    };

    ctx.check()?;
    let target_buckets = db.get_buckets(target_part.id)?;
    let target_bucket = dir.entry(&target_buckets).ok_or_else(|| {
        ProgressError::StructuralInconsistency(format!("part {} has no buckets", target_part.id))
    })?;
    entry_lesson(db, target_bucket, dir).map(Some)
}

/// 이전/현재/다음 레슨 계산
///
/// 기준 레슨 조회 실패는 그대로 전파하고, 이웃이 없으면 [`NO_LESSON`] 을 돌려줍니다.
pub fn resolve_footer(db: &Database, ctx: &CallContext, lesson_id: i64) -> Result<Footer, ProgressError> {
    ctx.check()?;
    let lesson = db.get_lesson_by_id(lesson_id)?;
    let bucket = db.get_bucket(lesson.bucket_id)?;
    let part = db.get_part(bucket.part_id)?;

    ctx.check()?;
    let siblings = db.get_lessons(bucket.id)?;
    let mut previous = Direction::Backward
        .adjacent(&siblings, lesson.order, |l| l.order)
        .map(|l| l.id);
    let mut next = Direction::Forward
        .adjacent(&siblings, lesson.order, |l| l.order)
        .map(|l| l.id);

    if previous.is_none() {
        previous = across_boundary(db, ctx, &part, &bucket, Direction::Backward)?;
    }
    if next.is_none() {
        next = across_boundary(db, ctx, &part, &bucket, Direction::Forward)?;
    }

    Ok(Footer {
        previous: previous.unwrap_or(NO_LESSON),
        current: lesson.id,
        next: next.unwrap_or(NO_LESSON),
    })
}
