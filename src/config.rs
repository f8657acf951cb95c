//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::interview::{GeneratorConfig, InterviewLimits};
use crate::llm::{LlmBackend, LlmConfig};

/// Default model used when `TALENT_SCOUT_MODEL` is unset.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";

/// Default transcript log location, relative to the working directory.
pub const DEFAULT_TRANSCRIPT_PATH: &str = "logs/responses.jsonl";

/// Application configuration, assembled from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    /// Where completed transcripts are appended.
    pub transcript_path: PathBuf,
    /// Port for the HTTP/WebSocket server.
    pub port: u16,
    /// Whether to run the stdin REPL alongside the server.
    pub cli_enabled: bool,
    /// Directory for the rolling log file, if any.
    pub log_dir: Option<PathBuf>,
    pub generator: GeneratorConfig,
    pub limits: InterviewLimits,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("TALENT_SCOUT_LLM_BACKEND").as_deref() {
            None | Some("openai") => LlmBackend::OpenAi,
            Some("anthropic") => LlmBackend::Anthropic,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "TALENT_SCOUT_LLM_BACKEND".to_string(),
                    message: format!("expected 'openai' or 'anthropic', got '{other}'"),
                });
            }
        };

        let (key_var, default_model) = match backend {
            LlmBackend::OpenAi => ("OPENAI_API_KEY", DEFAULT_OPENAI_MODEL),
            LlmBackend::Anthropic => ("ANTHROPIC_API_KEY", DEFAULT_ANTHROPIC_MODEL),
        };
        let api_key = lookup(key_var)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(key_var.to_string()))?;

        let model = lookup("TALENT_SCOUT_MODEL").unwrap_or_else(|| default_model.to_string());

        let transcript_path = lookup("TALENT_SCOUT_TRANSCRIPT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TRANSCRIPT_PATH));

        let port = parse_or(&lookup, "TALENT_SCOUT_PORT", 7860u16)?;
        let timeout_secs = parse_or(&lookup, "TALENT_SCOUT_GENERATION_TIMEOUT_SECS", 60u64)?;
        let max_answers = parse_or(&lookup, "TALENT_SCOUT_MAX_ANSWERS", 100usize)?;
        let max_tech_stack_chars =
            parse_or(&lookup, "TALENT_SCOUT_MAX_TECH_STACK_CHARS", 1000usize)?;
        let cli_enabled = parse_flag(&lookup, "TALENT_SCOUT_CLI", true)?;
        let log_dir = lookup("TALENT_SCOUT_LOG_DIR").map(PathBuf::from);

        Ok(Self {
            llm: LlmConfig {
                backend,
                api_key: SecretString::from(api_key),
                model,
            },
            transcript_path,
            port,
            cli_enabled,
            log_dir,
            generator: GeneratorConfig {
                timeout: Duration::from_secs(timeout_secs),
                max_tech_stack_chars,
                ..GeneratorConfig::default()
            },
            limits: InterviewLimits { max_answers },
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{raw}': {e}"),
        }),
    }
}

fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}
