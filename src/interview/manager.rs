//! SessionManager: owns per-session state, runs the engine, applies effects.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::SessionError;
use crate::store::TranscriptStore;

use super::engine::{Effect, InterviewEngine};
use super::model::Reply;
use super::prompts;
use super::state::SessionState;

/// Identifier for one candidate conversation.
pub type SessionId = Uuid;

/// Tracks every open interview and routes messages to the engine.
///
/// Each session has its own lock, so messages within a session are handled
/// one at a time while different sessions proceed independently.
pub struct SessionManager {
    engine: Arc<InterviewEngine>,
    store: Arc<dyn TranscriptStore>,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionState>>>>,
}

impl SessionManager {
    pub fn new(engine: Arc<InterviewEngine>, store: Arc<dyn TranscriptStore>) -> Self {
        Self {
            engine,
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Start a new session and return its id with the greeting.
    pub async fn open(&self) -> (SessionId, Reply) {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(SessionState::default())));
        info!(session = %id, "Session opened");
        (id, Reply::assistant(prompts::greeting()))
    }

    /// Handle one candidate message.
    pub async fn handle(&self, id: SessionId, message: &str) -> Result<Reply, SessionError> {
        let session = self.session(id).await?;
        let mut state = session.lock().await;

        let turn = self.engine.handle(&mut state, message).await;
        for effect in turn.effects {
            self.apply(id, effect).await;
        }
        Ok(turn.reply)
    }

    /// Reset a session to its initial state and greet again.
    pub async fn clear(&self, id: SessionId) -> Result<Reply, SessionError> {
        let session = self.session(id).await?;
        session.lock().await.reset();
        info!(session = %id, "Session cleared");
        Ok(Reply::assistant(prompts::greeting()))
    }

    /// Drop a session without persisting it.
    pub async fn close(&self, id: SessionId) {
        if self.sessions.write().await.remove(&id).is_some() {
            info!(session = %id, "Session closed");
        }
    }

    /// Copy of a session's current state.
    pub async fn snapshot(&self, id: SessionId) -> Result<SessionState, SessionError> {
        let session = self.session(id).await?;
        let state = session.lock().await;
        Ok(state.clone())
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn session(&self, id: SessionId) -> Result<Arc<Mutex<SessionState>>, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound { id })
    }

    /// Execute an effect. Failures are logged; the reply still goes out.
    async fn apply(&self, id: SessionId, effect: Effect) {
        match effect {
            Effect::PersistTranscript(record) => match self.store.append(&record).await {
                Ok(()) => info!(
                    session = %id,
                    answers = record.answers.len(),
                    "Transcript saved"
                ),
                Err(e) => error!(session = %id, error = %e, "Failed to save transcript"),
            },
        }
    }
}
