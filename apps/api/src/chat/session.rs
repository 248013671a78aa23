//! Conversation session — owns the message history and drives one edit at a time.
//!
//! States: `Idle → Sending → Idle`. A submission is accepted only from `Idle` with
//! a non-blank instruction; anything else is a silent no-op. Each accepted
//! submission appends exactly one user turn and one assistant turn and publishes
//! exactly one document, whether or not the edit succeeded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::interpreter::Interpreter;
use crate::chat::merger::merge_reply;
use crate::chat::prompts::GREETING;
use crate::models::{CvDocument, Message};
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Empty or whitespace-only instruction.
    Blank,
    /// Another instruction is still in flight.
    Busy,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Completed {
        reply: Message,
        document: Arc<CvDocument>,
        applied: bool,
    },
    Ignored(IgnoreReason),
}

struct SessionInner {
    state: SessionState,
    messages: Vec<Message>,
}

pub struct ChatSession {
    /// Used to tag log lines.
    label: Uuid,
    interpreter: Interpreter,
    inner: Mutex<SessionInner>,
}

impl ChatSession {
    pub fn new(label: Uuid, interpreter: Interpreter) -> Self {
        Self {
            label,
            interpreter,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                messages: vec![Message::assistant(GREETING)],
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Runs one instruction through the interpreter and commits the result to
    /// `store`. The future must be driven to completion; the HTTP layer spawns it.
    pub async fn submit(&self, instruction: &str, store: &DocumentStore) -> SubmitOutcome {
        if instruction.trim().is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::Blank);
        }

        let (previous, retired) = {
            let mut inner = self.lock();
            if inner.state == SessionState::Sending {
                info!("Session {}: instruction dropped, a request is in flight", self.label);
                return SubmitOutcome::Ignored(IgnoreReason::Busy);
            }
            inner.messages.push(Message::user(instruction));
            inner.state = SessionState::Sending;
            store.snapshot_with_retired()
        };

        let raw = self.interpreter.interpret(instruction, &previous).await;
        let outcome = merge_reply(raw, previous, &retired);

        match &outcome.error {
            Some(e) => warn!("Session {}: edit not applied: {e}", self.label),
            None => info!("Session {}: edit applied", self.label),
        }

        let applied = outcome.is_applied();
        let reply = Message::assistant(outcome.confirmation);

        let mut inner = self.lock();
        inner.messages.push(reply.clone());
        store.replace(Arc::clone(&outcome.document));
        inner.state = SessionState::Idle;

        SubmitOutcome::Completed {
            reply,
            document: outcome.document,
            applied,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        // history stays consistent even if a holder panicked: every write is a push
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
