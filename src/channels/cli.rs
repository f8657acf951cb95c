//! CLI channel: stdin/stdout REPL driving a single interview session.

use std::future::Future;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::ChannelError;
use crate::interview::{Reply, SessionManager};

/// Runs one interview over a line-oriented reader/writer pair.
pub struct CliChannel {
    manager: Arc<SessionManager>,
}

impl CliChannel {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }

    /// Run the stdin REPL, then keep waiting for `shutdown`.
    ///
    /// End of input only ends the CLI session. The process keeps serving other
    /// channels until `shutdown` resolves, which also interrupts a live session.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), ChannelError>
    where
        F: Future<Output = ()>,
    {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.run_with_until(stdin, stdout, shutdown).await
    }

    /// [`Self::run_until`] over arbitrary I/O.
    pub async fn run_with_until<R, W, F>(
        &self,
        reader: R,
        writer: W,
        shutdown: F,
    ) -> Result<(), ChannelError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tokio::select! {
            result = self.run_with(reader, writer) => {
                result?;
                tracing::info!("CLI input closed; other channels keep serving");
            }
            () = &mut shutdown => return Ok(()),
        }
        shutdown.await;
        Ok(())
    }

    /// Run against arbitrary I/O. Blank lines are ignored.
    pub async fn run_with<R, W>(&self, reader: R, mut writer: W) -> Result<(), ChannelError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (id, greeting) = self.manager.open().await;
        write_reply(&mut writer, &greeting).await?;

        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match self.manager.handle(id, &line).await {
                        Ok(reply) => write_reply(&mut writer, &reply).await?,
                        Err(e) => {
                            tracing::error!(error = %e, "CLI session lost");
                            break;
                        }
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }

        self.manager.close(id).await;
        Ok(())
    }
}

async fn write_reply<W>(writer: &mut W, reply: &Reply) -> Result<(), ChannelError>
where
    W: AsyncWrite + Unpin,
{
    let send_failed = |e: std::io::Error| ChannelError::SendFailed {
        name: "cli".to_string(),
        reason: e.to_string(),
    };
    let text = format!("\n{}\n\n> ", reply.content);
    writer.write_all(text.as_bytes()).await.map_err(send_failed)?;
    writer.flush().await.map_err(send_failed)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::StoreError;
    use crate::interview::generator::{Generation, QuestionGenerator};
    use crate::interview::language::LanguageDetector;
    use crate::interview::{InterviewEngine, InterviewLimits, TranscriptRecord, prompts};
    use crate::store::TranscriptStore;

    struct EchoGenerator;

    #[async_trait]
    impl QuestionGenerator for EchoGenerator {
        async fn generate(&self, tech_stack: &str, language: &str) -> Generation {
            Generation::Questions(format!("[{language}] {tech_stack}?"))
        }
    }

    struct English;

    impl LanguageDetector for English {
        fn detect(&self, _text: &str) -> Option<String> {
            Some("en".to_string())
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        records: tokio::sync::Mutex<Vec<TranscriptRecord>>,
    }

    #[async_trait]
    impl TranscriptStore for MemoryStore {
        async fn append(&self, record: &TranscriptRecord) -> Result<(), StoreError> {
            self.records.lock().await.push(record.clone());
            Ok(())
        }

        async fn load_all(&self) -> Result<Vec<TranscriptRecord>, StoreError> {
            Ok(self.records.lock().await.clone())
        }
    }

    #[tokio::test]
    async fn repl_runs_full_interview() {
        let store = Arc::new(MemoryStore::default());
        let engine = InterviewEngine::new(
            Arc::new(EchoGenerator),
            Arc::new(English),
            InterviewLimits::default(),
        );
        let manager = Arc::new(SessionManager::new(Arc::new(engine), store.clone()));
        let channel = CliChannel::new(manager.clone());

        let input = "Alice\n\na@x.com\n555\n3\nDev\nRemote\nRust\nmy answer\nexit\n";
        let mut output = Vec::new();
        channel
            .run_with(BufReader::new(input.as_bytes()), &mut output)
            .await
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("What is your full name?"));
        assert!(output.contains("[English] Rust?"));
        assert!(output.contains(prompts::ANSWER_NOTED));
        assert!(output.contains(prompts::CLOSING));

        let records = store.load_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].answers, vec!["my answer".to_string()]);
        assert_eq!(manager.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn end_of_input_waits_for_shutdown() {
        let engine = InterviewEngine::new(
            Arc::new(EchoGenerator),
            Arc::new(English),
            InterviewLimits::default(),
        );
        let manager = Arc::new(SessionManager::new(
            Arc::new(engine),
            Arc::new(MemoryStore::default()),
        ));
        let channel = CliChannel::new(manager.clone());
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let mut output = Vec::new();
        let run = channel.run_with_until(BufReader::new(&b""[..]), &mut output, async {
            let _ = stop_rx.await;
        });
        tokio::pin!(run);

        let early = tokio::time::timeout(std::time::Duration::from_millis(100), &mut run).await;
        assert!(early.is_err(), "returned on EOF before shutdown");
        assert_eq!(manager.active_sessions().await, 0);

        stop_tx.send(()).unwrap();
        run.await.unwrap();
    }
}
