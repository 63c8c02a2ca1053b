use super::reply::AgentReply;
use crate::api::AgentBackend;
use crate::conversation::{ConversationLog, Message};
use crate::error::{LogSearchError, Result};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Prefix of the error entry appended to the log when a turn fails
pub const TURN_ERROR_PREFIX: &str = "Sorry, there was an error: ";
/// Prefix of the banner text when a turn fails
pub const LAST_ERROR_PREFIX: &str = "Error: ";
/// Prefix of the banner text when a reset fails
pub const RESET_ERROR_PREFIX: &str = "Failed to reset: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Pending,
}

/// Read-only projection handed to the view
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub messages: &'a [Message],
    pub pending: bool,
    pub last_error: Option<&'a str>,
}

/// Proof that a submit was accepted; consumed by `complete_submit` on the
/// session that issued it
#[derive(Debug)]
#[must_use]
pub struct PendingPrompt {
    session: u64,
    prompt: String,
}

impl PendingPrompt {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// Proof that a reset was accepted; consumed by `complete_reset` on the
/// session that issued it
#[derive(Debug)]
#[must_use]
pub struct PendingReset {
    session: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Empty input, another request in flight, or a token from another
    /// session; nothing changed
    Skipped,
    Replied,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Skipped,
    Cleared,
    Failed,
}

/// Conversation with the log search agent.
///
/// Owns the message log, the single-flight status and the last error. All
/// mutation goes through `submit`/`reset`, or through the `begin_*` /
/// `complete_*` pairs they are built from.
pub struct ConversationSession<B> {
    id: u64,
    backend: B,
    log: ConversationLog,
    status: SessionStatus,
    last_error: Option<String>,
}

impl<B: AgentBackend> ConversationSession<B> {
    pub fn new(backend: B) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            backend,
            log: ConversationLog::new(),
            status: SessionStatus::Idle,
            last_error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            messages: self.log.messages(),
            pending: self.is_pending(),
            last_error: self.last_error.as_deref(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == SessionStatus::Pending
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Sends `text` to the agent and records the exchange.
    ///
    /// Whitespace-only input, or a call while another request is pending,
    /// leaves the session untouched.
    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let Some(pending) = self.begin_submit(text) else {
            return SubmitOutcome::Skipped;
        };
        let result = self.backend.query(pending.prompt()).await;
        self.complete_submit(pending, result)
    }

    /// Asks the backend to drop its context, then clears the local log.
    /// A failed reset keeps the log as it was.
    pub async fn reset(&mut self) -> ResetOutcome {
        let Some(pending) = self.begin_reset() else {
            return ResetOutcome::Skipped;
        };
        let result = self.backend.reset().await;
        self.complete_reset(pending, result)
    }

    pub fn begin_submit(&mut self, text: &str) -> Option<PendingPrompt> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty prompt");
            return None;
        }
        if self.is_pending() {
            tracing::warn!("Prompt submitted while a request is pending; ignoring");
            return None;
        }

        self.last_error = None;
        self.status = SessionStatus::Pending;
        self.log.push(Message::user(text));

        Some(PendingPrompt {
            session: self.id,
            prompt: text.to_string(),
        })
    }

    pub fn complete_submit(
        &mut self,
        pending: PendingPrompt,
        result: Result<serde_json::Value>,
    ) -> SubmitOutcome {
        if pending.session != self.id {
            tracing::warn!("Prompt completed on a session that did not start it; ignoring");
            return SubmitOutcome::Skipped;
        }

        let outcome = match result.and_then(|body| AgentReply::decode(&body)) {
            Ok(reply) => {
                tracing::debug!(kind = ?reply.kind(), "Agent replied");
                self.log.push(Message::agent(reply.into_content()));
                SubmitOutcome::Replied
            }
            Err(e) => {
                self.record_turn_failure(&e);
                SubmitOutcome::Failed
            }
        };

        self.status = SessionStatus::Idle;
        outcome
    }

    pub fn begin_reset(&mut self) -> Option<PendingReset> {
        if self.is_pending() {
            tracing::warn!("Reset requested while a request is pending; ignoring");
            return None;
        }

        self.last_error = None;
        self.status = SessionStatus::Pending;
        Some(PendingReset { session: self.id })
    }

    pub fn complete_reset(&mut self, pending: PendingReset, result: Result<()>) -> ResetOutcome {
        if pending.session != self.id {
            tracing::warn!("Reset completed on a session that did not start it; ignoring");
            return ResetOutcome::Skipped;
        }

        let outcome = match result {
            Ok(()) => {
                self.log.clear();
                self.last_error = None;
                tracing::info!("Conversation reset");
                ResetOutcome::Cleared
            }
            Err(e) => {
                tracing::debug!(error = %e, "Failed to reset conversation");
                self.last_error = Some(format!("{}{}", RESET_ERROR_PREFIX, e));
                ResetOutcome::Failed
            }
        };

        self.status = SessionStatus::Idle;
        outcome
    }

    fn record_turn_failure(&mut self, error: &LogSearchError) {
        tracing::debug!(
            error = %error,
            transport = error.is_transport(),
            protocol = error.is_protocol(),
            "Agent turn failed"
        );
        self.log
            .push(Message::error(format!("{}{}", TURN_ERROR_PREFIX, error)));
        self.last_error = Some(format!("{}{}", LAST_ERROR_PREFIX, error));
    }
}
