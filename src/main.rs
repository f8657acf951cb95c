use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use talent_scout::channels::CliChannel;
use talent_scout::config::AppConfig;
use talent_scout::error::{self, ChannelError, ConfigError};
use talent_scout::interview::{
    InterviewEngine, InterviewRouteState, LlmQuestionGenerator, SessionManager, WhatlangDetector,
    interview_routes,
};
use talent_scout::llm::create_provider;
use talent_scout::store::{JsonlTranscriptStore, TranscriptStore};

#[tokio::main]
async fn main() -> error::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("  {hint}");
        }
        std::process::exit(1);
    });

    // Initialize tracing (stderr, plus a daily log file when configured)
    let (file_layer, _log_guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(ConfigError::Io)?;
            let appender = tracing_appender::rolling::daily(dir, "talent-scout.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    eprintln!("🤖 TalentScout v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.llm.model);
    eprintln!("   Transcripts: {}", config.transcript_path.display());
    eprintln!("   Chat WS: ws://0.0.0.0:{}/ws/chat", config.port);
    eprintln!("   Download: http://0.0.0.0:{}/api/transcripts", config.port);

    let llm = create_provider(&config.llm)?;
    let generator = Arc::new(LlmQuestionGenerator::new(llm, config.generator.clone()));
    let engine = Arc::new(InterviewEngine::new(
        generator,
        Arc::new(WhatlangDetector),
        config.limits.clone(),
    ));
    let store: Arc<dyn TranscriptStore> =
        Arc::new(JsonlTranscriptStore::new(config.transcript_path.clone()));
    let manager = Arc::new(SessionManager::new(engine, Arc::clone(&store)));

    let app = interview_routes(InterviewRouteState {
        manager: Arc::clone(&manager),
        store,
    });
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .map_err(|e| ChannelError::StartupFailed {
            name: "http".to_string(),
            reason: e.to_string(),
        })?;
    tracing::info!(port = config.port, "Interview server started");
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Interview server stopped");
        }
    });

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };
    if config.cli_enabled {
        eprintln!("   Type your answers and press Enter. 'exit' to finish.\n");
        CliChannel::new(manager).run_until(shutdown).await?;
    } else {
        eprintln!("   CLI disabled; press Ctrl-C to stop.\n");
        shutdown.await;
    }

    server.abort();
    Ok(())
}
