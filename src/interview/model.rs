//! Candidate data, chat replies, and the persisted transcript record.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::llm::Role;

use super::state::{CandidateField, SessionState};

/// Timestamp layout used in transcript records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Candidate details collected during intake.
///
/// Only fields the candidate actually answered are serialized, so a
/// transcript from an early exit carries a partial object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(
        rename = "experience",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub years_experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
}

impl CandidateInfo {
    fn slot_mut(&mut self, field: CandidateField) -> &mut Option<String> {
        match field {
            CandidateField::Name => &mut self.name,
            CandidateField::Email => &mut self.email,
            CandidateField::Phone => &mut self.phone,
            CandidateField::YearsExperience => &mut self.years_experience,
            CandidateField::Position => &mut self.position,
            CandidateField::Location => &mut self.location,
            CandidateField::TechStack => &mut self.tech_stack,
        }
    }

    pub fn get(&self, field: CandidateField) -> Option<&str> {
        let slot = match field {
            CandidateField::Name => &self.name,
            CandidateField::Email => &self.email,
            CandidateField::Phone => &self.phone,
            CandidateField::YearsExperience => &self.years_experience,
            CandidateField::Position => &self.position,
            CandidateField::Location => &self.location,
            CandidateField::TechStack => &self.tech_stack,
        };
        slot.as_deref()
    }

    pub fn set(&mut self, field: CandidateField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Number of fields collected so far.
    pub fn len(&self) -> usize {
        CandidateField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A message emitted by the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub role: Role,
    pub content: String,
}

impl Reply {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One completed (or abandoned) interview, as written to the transcript log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub candidate_info: CandidateInfo,
    pub tech_questions: String,
    pub answers: Vec<String>,
    pub timestamp: String,
}

impl TranscriptRecord {
    /// Snapshot a session. Must run before the session is reset.
    pub fn capture<Tz>(state: &SessionState, at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            candidate_info: state.candidate.clone(),
            tech_questions: state.generated_questions.clone(),
            answers: state.answers.clone(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
