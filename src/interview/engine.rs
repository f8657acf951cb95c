//! Interview engine: applies one inbound message to a session.
//!
//! Evaluation order for every message:
//! 1. Exit word (any phase): snapshot the session, reset it, emit a persist effect.
//! 2. Intake: store the field, ask the next question; after the last field,
//!    detect language, generate questions, and present them.
//! 3. Answer collection: append the answer.

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info, warn};

use super::generator::{Generation, QuestionGenerator};
use super::language::{LanguageDetector, resolve_language};
use super::model::{Reply, TranscriptRecord};
use super::prompts;
use super::state::{CandidateField, SessionState};

/// Bounds applied to a single session.
#[derive(Debug, Clone)]
pub struct InterviewLimits {
    /// Answers beyond this count are not stored.
    pub max_answers: usize,
}

impl Default for InterviewLimits {
    fn default() -> Self {
        Self { max_answers: 100 }
    }
}

/// Side effects for the caller to execute after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append the finished transcript to the store.
    PersistTranscript(TranscriptRecord),
}

/// Result of handling one message.
#[derive(Debug, Clone)]
pub struct Turn {
    pub reply: Reply,
    pub effects: Vec<Effect>,
}

impl Turn {
    pub fn reply(content: impl Into<String>) -> Self {
        Self {
            reply: Reply::assistant(content),
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Drives the scripted interview. Holds no session data itself.
pub struct InterviewEngine {
    generator: Arc<dyn QuestionGenerator>,
    detector: Arc<dyn LanguageDetector>,
    limits: InterviewLimits,
}

impl InterviewEngine {
    pub fn new(
        generator: Arc<dyn QuestionGenerator>,
        detector: Arc<dyn LanguageDetector>,
        limits: InterviewLimits,
    ) -> Self {
        Self {
            generator,
            detector,
            limits,
        }
    }

    /// Apply `message` to `state` and produce the reply plus effects.
    ///
    /// The final intake field and the generated questions are written
    /// together after generation returns, so a dropped future never leaves
    /// a session with all fields but no questions.
    pub async fn handle(&self, state: &mut SessionState, message: &str) -> Turn {
        let message = message.trim();

        if prompts::is_exit_signal(message) {
            let record = TranscriptRecord::capture(state, &Local::now());
            info!(
                step = state.step,
                answers = state.answers.len(),
                "Candidate ended the interview"
            );
            state.reset();
            return Turn::reply(prompts::CLOSING).with_effect(Effect::PersistTranscript(record));
        }

        let Some(field) = state.current_field() else {
            return self.collect_answer(state, message);
        };

        match CandidateField::at(state.step + 1) {
            Some(next) => {
                state.record_field(message);
                debug!(field = %field, step = state.step, "Intake field recorded");
                Turn::reply(next.prompt())
            }
            None => self.finish_intake(state, message).await,
        }
    }

    async fn finish_intake(&self, state: &mut SessionState, tech_stack: &str) -> Turn {
        let language = resolve_language(self.detector.as_ref(), tech_stack);
        let questions = match self.generator.generate(tech_stack, language).await {
            Generation::Questions(text) => text,
            Generation::Failed { reason } => {
                warn!(reason = %reason, "Presenting degraded question text");
                prompts::generation_failed(&reason)
            }
        };

        state.record_field(tech_stack);
        state.generated_questions = questions;
        info!(language = language, "Intake complete, questions generated");

        Turn::reply(prompts::questions_ready(&state.generated_questions))
    }

    fn collect_answer(&self, state: &mut SessionState, answer: &str) -> Turn {
        if state.answers.len() >= self.limits.max_answers {
            warn!(max = self.limits.max_answers, "Answer limit reached");
            return Turn::reply(prompts::ANSWER_LIMIT_REACHED);
        }
        state.answers.push(answer.to_string());
        debug!(count = state.answers.len(), "Answer recorded");
        Turn::reply(prompts::ANSWER_NOTED)
    }
}
