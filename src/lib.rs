//! TalentScout: a scripted hiring-assistant interview core.

pub mod channels;
pub mod config;
pub mod error;
pub mod interview;
pub mod llm;
pub mod store;
