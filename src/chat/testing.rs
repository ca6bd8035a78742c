//! Scripted endpoints for exercising the chat engine without a network.

use crate::chat::endpoint::CompletionEndpoint;
use crate::chat::error::CallFailed;
use crate::chat::message::ChatMessage;
use crate::chat::model_id::ModelId;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Endpoint returning a fixed outcome and recording every message list it receives.
/// Clones share their call log and script.
#[derive(Clone)]
pub struct StubEndpoint {
    model: ModelId,
    outcome: Result<String, CallFailed>,
    scripted: Arc<Mutex<VecDeque<Result<String, CallFailed>>>>,
    calls: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl StubEndpoint {
    fn with_outcome(model: &str, outcome: Result<String, CallFailed>) -> Self {
        Self {
            model: model.parse().expect("valid stub model id"),
            outcome,
            scripted: Arc::default(),
            calls: Arc::default(),
        }
    }

    pub fn replying(model: &str, reply: &str) -> Self {
        Self::with_outcome(model, Ok(reply.to_string()))
    }

    pub fn failing(model: &str, cause: &str) -> Self {
        Self::with_outcome(model, Err(CallFailed::new(cause)))
    }

    /// Makes the next call fail with `cause`, before falling back to the fixed outcome.
    pub fn fail_next(&self, cause: &str) {
        self.scripted
            .lock()
            .unwrap()
            .push_back(Err(CallFailed::new(cause)));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<Vec<ChatMessage>> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionEndpoint for StubEndpoint {
    fn model(&self) -> &ModelId {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CallFailed> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let scripted = self.scripted.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| self.outcome.clone())
    }
}
