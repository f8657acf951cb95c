//! Interview session state: intake fields, phase derivation, reset.

use serde::{Deserialize, Serialize};

use super::model::CandidateInfo;

/// One intake field, in the order the candidate is asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    Name,
    Email,
    Phone,
    YearsExperience,
    Position,
    Location,
    TechStack,
}

impl CandidateField {
    /// All intake fields in prompt order.
    pub const ALL: [CandidateField; 7] = [
        CandidateField::Name,
        CandidateField::Email,
        CandidateField::Phone,
        CandidateField::YearsExperience,
        CandidateField::Position,
        CandidateField::Location,
        CandidateField::TechStack,
    ];

    /// The field collected at intake step `step`, if any.
    pub fn at(step: usize) -> Option<CandidateField> {
        Self::ALL.get(step).copied()
    }

    /// The question asked to collect this field.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Name => "What is your full name?",
            Self::Email => "Please enter your email address.",
            Self::Phone => "What is your phone number?",
            Self::YearsExperience => "How many years of experience do you have?",
            Self::Position => "What position(s) are you applying for?",
            Self::Location => "Where are you currently located?",
            Self::TechStack => "List your tech stack (languages, frameworks, tools).",
        }
    }
}

impl std::fmt::Display for CandidateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::YearsExperience => "years_experience",
            Self::Position => "position",
            Self::Location => "location",
            Self::TechStack => "tech_stack",
        };
        write!(f, "{s}")
    }
}

/// Number of intake fields.
pub const FIELD_COUNT: usize = CandidateField::ALL.len();

/// Which half of the conversation a session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewPhase {
    Intake,
    CollectingAnswers,
}

impl std::fmt::Display for InterviewPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intake => write!(f, "intake"),
            Self::CollectingAnswers => write!(f, "collecting_answers"),
        }
    }
}

/// State of one candidate conversation.
///
/// Invariants: `step <= FIELD_COUNT`, and `candidate` holds exactly the
/// fields before `step`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Index of the next intake field to collect.
    pub step: usize,
    pub candidate: CandidateInfo,
    /// Empty until intake completes.
    pub generated_questions: String,
    pub answers: Vec<String>,
}

impl SessionState {
    pub fn phase(&self) -> InterviewPhase {
        if self.step < FIELD_COUNT {
            InterviewPhase::Intake
        } else {
            InterviewPhase::CollectingAnswers
        }
    }

    /// The field the next intake message fills, or `None` once intake is done.
    pub fn current_field(&self) -> Option<CandidateField> {
        CandidateField::at(self.step)
    }

    /// Store `value` for the current field and advance one step.
    ///
    /// Returns the field that was filled, or `None` if intake is already complete.
    pub fn record_field(&mut self, value: &str) -> Option<CandidateField> {
        let field = self.current_field()?;
        self.candidate.set(field, value);
        self.step += 1;
        Some(field)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
