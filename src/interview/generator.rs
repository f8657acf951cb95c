//! Technical question generation through the LLM provider.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::prompts::interviewer_system_prompt;

/// Outcome of a question-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    Questions(String),
    Failed { reason: String },
}

/// Produces interview questions for a tech stack in a given language.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, tech_stack: &str, language: &str) -> Generation;
}

/// Configuration for question generation.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on a single generation call.
    pub timeout: Duration,
    /// Tech-stack text beyond this many characters is not sent to the model.
    pub max_tech_stack_chars: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1500,
            timeout: Duration::from_secs(60),
            max_tech_stack_chars: 1000,
        }
    }
}

/// Generates questions with an `LlmProvider`.
pub struct LlmQuestionGenerator {
    llm: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl LlmQuestionGenerator {
    pub fn new(llm: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { llm, config }
    }
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(&self, tech_stack: &str, language: &str) -> Generation {
        let tech_stack = truncate_chars(tech_stack, self.config.max_tech_stack_chars);

        let request = CompletionRequest::new(vec![
            ChatMessage::system(interviewer_system_prompt(tech_stack, language)),
            ChatMessage::user(tech_stack),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens);

        info!(
            model = self.llm.model_name(),
            language = language,
            "Generating technical questions"
        );

        let result = tokio::time::timeout(self.config.timeout, self.llm.complete(request)).await;
        match result {
            Ok(Ok(response)) => {
                let text = response.content.trim();
                if text.is_empty() {
                    warn!("Question generation returned empty output");
                    Generation::Failed {
                        reason: "the model returned an empty response".to_string(),
                    }
                } else {
                    Generation::Questions(text.to_string())
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Question generation failed");
                Generation::Failed {
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                let e = LlmError::Timeout {
                    provider: self.llm.model_name().to_string(),
                    timeout: self.config.timeout,
                };
                warn!(error = %e, "Question generation timed out");
                Generation::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::llm::{CompletionResponse, Role};

    enum Behaviour {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct StubLlm {
        behaviour: Behaviour,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl StubLlm {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.seen.lock().unwrap().push(request);
            match self.behaviour {
                Behaviour::Reply(text) => Ok(CompletionResponse {
                    content: text.to_string(),
                }),
                Behaviour::Fail => Err(LlmError::RequestFailed {
                    provider: "stub".to_string(),
                    reason: "quota exceeded".to_string(),
                }),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    unreachable!("timeout should fire first")
                }
            }
        }
    }

    #[tokio::test]
    async fn success_is_trimmed() {
        let llm = StubLlm::new(Behaviour::Reply("  \n## Go\n1. Goroutines?\n "));
        let generator = LlmQuestionGenerator::new(llm.clone(), GeneratorConfig::default());

        let outcome = generator.generate("Go", "German").await;
        assert_eq!(outcome, Generation::Questions("## Go\n1. Goroutines?".to_string()));

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let request = &seen[0];
        assert_eq!(request.messages[0].role, Role::System);
        assert!(request.messages[0].content.contains("Respond in German"));
        assert_eq!(request.messages[1].role, Role::User);
        assert_eq!(request.messages[1].content, "Go");
    }

    #[tokio::test]
    async fn provider_error_becomes_failure() {
        let generator =
            LlmQuestionGenerator::new(StubLlm::new(Behaviour::Fail), GeneratorConfig::default());
        match generator.generate("Rust", "English").await {
            Generation::Failed { reason } => assert!(reason.contains("quota exceeded")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_output_becomes_failure() {
        let generator = LlmQuestionGenerator::new(
            StubLlm::new(Behaviour::Reply("   ")),
            GeneratorConfig::default(),
        );
        assert!(matches!(
            generator.generate("Rust", "English").await,
            Generation::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn hung_provider_times_out() {
        let config = GeneratorConfig {
            timeout: Duration::from_millis(50),
            ..GeneratorConfig::default()
        };
        let generator = LlmQuestionGenerator::new(StubLlm::new(Behaviour::Hang), config);
        match generator.generate("Rust", "English").await {
            Generation::Failed { reason } => assert_eq!(reason, "Provider stub timed out after 50ms"),
            other => panic!("expected timeout failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn long_tech_stack_is_truncated() {
        let llm = StubLlm::new(Behaviour::Reply("ok"));
        let config = GeneratorConfig {
            max_tech_stack_chars: 5,
            ..GeneratorConfig::default()
        };
        let generator = LlmQuestionGenerator::new(llm.clone(), config);
        generator.generate("Pythön, Go, Rust", "English").await;

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen[0].messages[1].content, "Pythö");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
