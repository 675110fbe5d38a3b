//! Progress Data Models
//!
//! 커리큘럼 트리, 체크포인트, 답안 기록 및 계산 결과 뷰 모델

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// "해당 레슨 없음"을 나타내는 footer 센티널 (코스의 처음/끝)
pub const NO_LESSON: i64 = -1;

/// 레슨 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Text,
    Video,
    Quiz,
    Question,
}

impl LessonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonType::Text => "text",
            LessonType::Video => "video",
            LessonType::Quiz => "quiz",
            LessonType::Question => "question",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(LessonType::Text),
            "video" => Some(LessonType::Video),
            "quiz" => Some(LessonType::Quiz),
            "question" => Some(LessonType::Question),
            _ => None,
        }
    }
}

/// 코스
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// 최소 화폐 단위 (센트 등)
    pub price: i64,
    pub duration_minutes: i64,
}

/// 코스의 최상위 구분
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: i64,
    pub course_id: i64,
    pub order: i64,
    pub title: String,
}

/// 파트 안의 레슨 묶음
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonBucket {
    pub id: i64,
    pub part_id: i64,
    pub order: i64,
    pub title: String,
}

/// 레슨 유형별 콘텐츠 페이로드 (DB에는 JSON으로 저장)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LessonContent {
    Text {
        blocks: Vec<String>,
    },
    Video {
        url: String,
        #[serde(rename = "durationSecs")]
        duration_secs: u32,
    },
    Quiz {
        prompt: String,
    },
    Question {
        prompt: String,
    },
}

impl LessonContent {
    pub fn lesson_type(&self) -> LessonType {
        match self {
            LessonContent::Text { .. } => LessonType::Text,
            LessonContent::Video { .. } => LessonType::Video,
            LessonContent::Quiz { .. } => LessonType::Quiz,
            LessonContent::Question { .. } => LessonType::Question,
        }
    }

    /// 퀴즈/서술형 문항의 지문
    pub fn prompt(&self) -> Option<&str> {
        match self {
            LessonContent::Quiz { prompt } | LessonContent::Question { prompt } => Some(prompt),
            _ => None,
        }
    }
}

/// 단일 학습 단위
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPoint {
    pub id: i64,
    pub bucket_id: i64,
    pub order: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub content: LessonContent,
}

/// 퀴즈 선택지 (정답 여부 포함, 채점용)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// 화면 표시용 퀴즈 선택지 (정답 여부 제외)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOptionView {
    pub id: i64,
    pub text: String,
}

impl From<QuizOption> for QuizOptionView {
    fn from(option: QuizOption) -> Self {
        Self {
            id: option.id,
            text: option.text,
        }
    }
}

/// 체크포인트: 사용자가 레슨에 도달/완료했다는 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub user_id: i64,
    pub lesson_id: i64,
    pub course_id: i64,
    pub updated_at: i64,
}

/// 코스 내 체크포인트 목록 항목 (최신순)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointEntry {
    pub lesson_id: i64,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
}

/// 퀴즈 답안 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswerRecord {
    pub user_id: i64,
    pub question_id: i64,
    pub answer_id: i64,
    pub is_correct: bool,
    pub created_at: i64,
}

/// 서술형 문항 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionStatus {
    #[serde(rename = "not passed")]
    NotPassed,
    #[serde(rename = "answered")]
    Answered,
}

impl QuestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionStatus::NotPassed => "not passed",
            QuestionStatus::Answered => "answered",
        }
    }
}

/// 서술형 답안 기록
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswerRecord {
    pub user_id: i64,
    pub question_id: i64,
    pub answer: String,
    pub status: QuestionStatus,
    pub created_at: i64,
}

/// 서술형 문항 조회 결과
///
/// 답안이 없으면 `{"status": "not passed"}` 로 직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionState {
    pub status: QuestionStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub answer: Option<String>,
}

impl QuestionState {
    pub fn not_passed() -> Self {
        Self {
            status: QuestionStatus::NotPassed,
            answer: None,
        }
    }
}

impl From<QuestionAnswerRecord> for QuestionState {
    fn from(record: QuestionAnswerRecord) -> Self {
        Self {
            status: record.status,
            answer: Some(record.answer),
        }
    }
}

/// 1회성 알림 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    CourseStarted,
    Halfway,
}

impl MilestoneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneKind::CourseStarted => "course_started",
            MilestoneKind::Halfway => "halfway",
        }
    }
}

/// 이전/현재/다음 레슨 id (없으면 [`NO_LESSON`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    #[serde(rename = "previousLessonId")]
    pub previous: i64,
    #[serde(rename = "currentLessonId")]
    pub current: i64,
    #[serde(rename = "nextLessonId")]
    pub next: i64,
}

impl Footer {
    pub fn previous_lesson(&self) -> Option<i64> {
        (self.previous != NO_LESSON).then_some(self.previous)
    }

    pub fn next_lesson(&self) -> Option<i64> {
        (self.next != NO_LESSON).then_some(self.next)
    }
}

/// 헤더에 표시되는 형제 레슨 완료 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPointStatus {
    pub lesson_id: i64,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub is_done: bool,
}

/// 현재 파트/버킷 정보와 형제 레슨 상태
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonHeader {
    pub course_id: i64,
    pub course_title: String,
    pub part_order: i64,
    pub part_title: String,
    pub bucket_order: i64,
    pub bucket_title: String,
    pub lessons: Vec<LessonPointStatus>,
}

/// 현재 레슨 조회 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentLesson {
    pub header: LessonHeader,
    pub lesson_id: i64,
    pub lesson_type: LessonType,
    pub is_new_enrollment: bool,
}

/// 로드맵 레슨
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapLesson {
    pub id: i64,
    pub order: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub lesson_type: LessonType,
    pub is_done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapBucket {
    pub id: i64,
    pub order: i64,
    pub title: String,
    pub lessons: Vec<RoadmapLesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPart {
    pub id: i64,
    pub order: i64,
    pub title: String,
    pub buckets: Vec<RoadmapBucket>,
}

/// 완료 표시가 포함된 전체 커리큘럼 트리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub course_id: i64,
    pub title: String,
    pub parts: Vec<RoadmapPart>,
}

/// 코스 진행률 요약
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    pub completed_lessons: i64,
    pub total_lessons: i64,
    pub percent: f64,
}

/// 퀴즈 표시용 뷰 (이전 답안 포함)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub lesson_id: i64,
    pub title: String,
    pub prompt: String,
    pub options: Vec<QuizOptionView>,
    pub prior_answer: Option<QuizAnswerRecord>,
}

/// 서술형 문항 표시용 뷰
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub lesson_id: i64,
    pub title: String,
    pub prompt: String,
    pub state: QuestionState,
}

/// 저작: 새 코스 트리
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub duration_minutes: i64,
    pub parts: Vec<NewPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPart {
    pub order: i64,
    pub title: String,
    pub buckets: Vec<NewBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBucket {
    pub order: i64,
    pub title: String,
    pub lessons: Vec<NewLesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLesson {
    pub order: i64,
    pub title: String,
    pub content: LessonContent,
    /// 퀴즈 레슨에만 사용
    #[serde(default)]
    pub options: Vec<NewQuizOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizOption {
    pub text: String,
    pub is_correct: bool,
}

/// 저작 결과로 발급된 id 목록
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedCourse {
    pub course_id: i64,
    pub part_ids: Vec<i64>,
    pub bucket_ids: Vec<i64>,
    /// 커리큘럼 순서대로
    pub lesson_ids: Vec<i64>,
    /// 퀴즈 레슨 id -> 선택지 id (입력 순서)
    pub option_ids: HashMap<i64, Vec<i64>>,
}
