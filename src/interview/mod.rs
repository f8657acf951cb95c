//! Candidate interview: scripted intake, generated technical questions,
//! free-form answers, transcript on exit.
//!
//! The engine is a small state machine over `SessionState`. It talks to the
//! outside world through three seams: a `QuestionGenerator`, a
//! `LanguageDetector`, and a `TranscriptStore` (applied by the
//! `SessionManager` as an effect).

pub mod engine;
pub mod generator;
pub mod language;
pub mod manager;
pub mod model;
pub mod prompts;
pub mod routes;
pub mod state;

pub use engine::{Effect, InterviewEngine, InterviewLimits, Turn};
pub use generator::{Generation, GeneratorConfig, LlmQuestionGenerator, QuestionGenerator};
pub use language::{LanguageDetector, WhatlangDetector};
pub use manager::{SessionId, SessionManager};
pub use model::{CandidateInfo, Reply, TranscriptRecord};
pub use routes::{InterviewRouteState, interview_routes};
pub use state::{CandidateField, InterviewPhase, SessionState};
