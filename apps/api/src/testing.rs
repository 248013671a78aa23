//! Test doubles for the generative model.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::llm_client::{LanguageModel, LlmError};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub system: String,
}

/// Replays a fixed list of replies, one per call, and records every prompt.
/// Calls past the end of the script fail with `EmptyContent`.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            system: system.to_string(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// Holds every call open until `release` is called, then answers with `reply`.
pub struct GatedModel {
    reply: String,
    calls: AtomicUsize,
    entered: Notify,
    gate: Notify,
}

impl GatedModel {
    pub fn new(reply: String) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            gate: Notify::new(),
        }
    }

    pub async fn wait_until_called(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for GatedModel {
    async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(self.reply.clone())
    }
}
