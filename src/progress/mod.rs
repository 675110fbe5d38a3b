//! Progress Module
//!
//! 저장소 위에서 매 호출마다 새로 계산되는 상태 없는 진행 상태 계산기

pub mod footer;
pub mod milestone;
pub mod position;
pub mod quiz;
pub mod roadmap;

pub use footer::resolve_footer;
pub use milestone::{is_halfway_milestone_reached, mark_course_started};
pub use position::{resolve_position, PositionOptions};
pub use quiz::{answer_question, answer_quiz, get_question, get_quiz, question_state};
pub use roadmap::{build_roadmap, course_progress};
