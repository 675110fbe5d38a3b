//! 테스트용 코스 픽스처

use super::Database;
use crate::models::{CreatedCourse, LessonContent, NewBucket, NewCourse, NewLesson, NewPart, NewQuizOption};

pub(crate) fn empty_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.initialize().unwrap();
    db
}

pub(crate) fn seeded(course: NewCourse) -> (Database, CreatedCourse) {
    let db = empty_db();
    let created = db.create_course(&course).unwrap();
    (db, created)
}

fn text(order: i64, title: &str) -> NewLesson {
    NewLesson {
        order,
        title: title.to_string(),
        content: LessonContent::Text {
            blocks: vec![format!("{} body", title)],
        },
        options: Vec::new(),
    }
}

fn bucket(order: i64, title: &str, lessons: Vec<NewLesson>) -> NewBucket {
    NewBucket {
        order,
        title: title.to_string(),
        lessons,
    }
}

fn part(order: i64, title: &str, buckets: Vec<NewBucket>) -> NewPart {
    NewPart {
        order,
        title: title.to_string(),
        buckets,
    }
}

fn course(title: &str, parts: Vec<NewPart>) -> NewCourse {
    NewCourse {
        title: title.to_string(),
        description: format!("{} description", title),
        price: 1900,
        duration_minutes: 90,
        parts,
    }
}

/// Part1{Bucket1{L1 text, L2 video}}, Part2{Bucket2{L3 quiz: A(정답), B, C}}
pub(crate) fn go_basics() -> NewCourse {
    let video = NewLesson {
        order: 2,
        title: "L2".to_string(),
        content: LessonContent::Video {
            url: "https://cdn.example.com/go/l2.mp4".to_string(),
            duration_secs: 420,
        },
        options: Vec::new(),
    };
    let quiz = NewLesson {
        order: 1,
        title: "L3".to_string(),
        content: LessonContent::Quiz {
            prompt: "Which keyword starts a goroutine?".to_string(),
        },
        options: vec![
            NewQuizOption {
                text: "go".to_string(),
                is_correct: true,
            },
            NewQuizOption {
                text: "spawn".to_string(),
                is_correct: false,
            },
            NewQuizOption {
                text: "async".to_string(),
                is_correct: false,
            },
        ],
    };

    course(
        "Go Basics",
        vec![
            part(1, "Part1", vec![bucket(1, "Bucket1", vec![text(1, "L1"), video])]),
            part(2, "Part2", vec![bucket(1, "Bucket2", vec![quiz])]),
        ],
    )
}

/// go_basics 뒤에 서술형 문항 파트 추가
pub(crate) fn with_question() -> NewCourse {
    let mut base = go_basics();
    let question = NewLesson {
        order: 1,
        title: "L4".to_string(),
        content: LessonContent::Question {
            prompt: "Explain ownership in your own words.".to_string(),
        },
        options: Vec::new(),
    };
    base.parts.push(part(3, "Part3", vec![bucket(1, "Bucket3", vec![question])]));
    base
}

/// 입력 순서가 order 와 다른 코스
pub(crate) fn shuffled_orders() -> NewCourse {
    course(
        "Shuffled",
        vec![
            part(2, "Second", vec![bucket(1, "S1", vec![text(1, "s1")])]),
            part(
                1,
                "First",
                vec![
                    bucket(2, "F2", vec![text(1, "f2")]),
                    bucket(1, "F1", vec![text(3, "c"), text(1, "a"), text(2, "b")]),
                ],
            ),
        ],
    )
}

/// parts × buckets × lessons 개의 텍스트 레슨으로 된 코스
pub(crate) fn synthetic(parts: i64, buckets: i64, lessons: i64) -> NewCourse {
    let parts = (1..=parts)
        .map(|p| {
            let buckets = (1..=buckets)
                .map(|b| {
                    let lessons = (1..=lessons)
                        .map(|l| text(l, &format!("p{}b{}l{}", p, b, l)))
                        .collect();
                    bucket(b, &format!("p{}b{}", p, b), lessons)
                })
                .collect();
            part(p, &format!("p{}", p), buckets)
        })
        .collect();
    course("Synthetic", parts)
}

/// 파트마다 버킷/레슨 수가 다른 코스 (경계 이동 테스트용)
pub(crate) fn uneven() -> NewCourse {
    course(
        "Uneven",
        vec![
            part(
                1,
                "U1",
                vec![
                    bucket(1, "U1a", vec![text(1, "a1")]),
                    bucket(2, "U1b", vec![text(1, "b1"), text(2, "b2"), text(3, "b3")]),
                ],
            ),
            part(2, "U2", vec![bucket(1, "U2a", vec![text(1, "c1")])]),
            part(
                3,
                "U3",
                vec![
                    bucket(1, "U3a", vec![text(1, "d1"), text(2, "d2")]),
                    bucket(2, "U3b", vec![text(1, "e1")]),
                    bucket(3, "U3c", vec![text(1, "f1"), text(2, "f2")]),
                ],
            ),
        ],
    )
}
