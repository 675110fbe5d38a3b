//! Database Schema
//!
//! SQLite 테이블 스키마 정의

/// 데이터베이스 스키마 생성 SQL
pub const CREATE_SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- 코스 테이블
CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    price INTEGER NOT NULL DEFAULT 0,
    duration_minutes INTEGER NOT NULL DEFAULT 0
);

-- 파트 테이블
CREATE TABLE IF NOT EXISTS parts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    course_id INTEGER NOT NULL,
    part_order INTEGER NOT NULL CHECK (part_order >= 1),
    title TEXT NOT NULL,
    UNIQUE (course_id, part_order),
    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
);

-- 버킷 테이블
CREATE TABLE IF NOT EXISTS lesson_buckets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    part_id INTEGER NOT NULL,
    bucket_order INTEGER NOT NULL CHECK (bucket_order >= 1),
    title TEXT NOT NULL,
    UNIQUE (part_id, bucket_order),
    FOREIGN KEY (part_id) REFERENCES parts(id) ON DELETE CASCADE
);

-- 레슨 테이블
CREATE TABLE IF NOT EXISTS lesson_points (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    bucket_id INTEGER NOT NULL,
    lesson_order INTEGER NOT NULL CHECK (lesson_order >= 1),
    title TEXT NOT NULL,
    lesson_type TEXT NOT NULL CHECK (lesson_type IN ('text', 'video', 'quiz', 'question')),
    content_json TEXT NOT NULL,
    UNIQUE (bucket_id, lesson_order),
    FOREIGN KEY (bucket_id) REFERENCES lesson_buckets(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_parts_course ON parts(course_id);
CREATE INDEX IF NOT EXISTS idx_buckets_part ON lesson_buckets(part_id);
CREATE INDEX IF NOT EXISTS idx_lessons_bucket ON lesson_points(bucket_id);

-- 퀴즈 선택지 테이블
CREATE TABLE IF NOT EXISTS quiz_options (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL,
    text TEXT NOT NULL,
    is_correct INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (question_id) REFERENCES lesson_points(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_quiz_options_question ON quiz_options(question_id);

-- 체크포인트 테이블 ((user, lesson) 당 1행)
CREATE TABLE IF NOT EXISTS checkpoints (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    lesson_id INTEGER NOT NULL,
    course_id INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE (user_id, lesson_id),
    FOREIGN KEY (lesson_id) REFERENCES lesson_points(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_checkpoints_user_course ON checkpoints(user_id, course_id, updated_at);

-- 퀴즈 답안 테이블 (첫 제출만 유효)
CREATE TABLE IF NOT EXISTS quiz_answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    answer_id INTEGER NOT NULL,
    is_correct INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    UNIQUE (user_id, question_id),
    FOREIGN KEY (question_id) REFERENCES lesson_points(id) ON DELETE CASCADE,
    FOREIGN KEY (answer_id) REFERENCES quiz_options(id) ON DELETE CASCADE
);

-- 서술형 답안 테이블
CREATE TABLE IF NOT EXISTS question_answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    question_id INTEGER NOT NULL,
    answer TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('not passed', 'answered')),
    created_at INTEGER NOT NULL,
    UNIQUE (user_id, question_id),
    FOREIGN KEY (question_id) REFERENCES lesson_points(id) ON DELETE CASCADE
);

-- 1회성 알림 플래그 ((user, course, kind) 당 1행)
CREATE TABLE IF NOT EXISTS milestone_flags (
    user_id INTEGER NOT NULL,
    course_id INTEGER NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('course_started', 'halfway')),
    created_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, course_id, kind),
    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
);
"#;
