//! Per-user exploration session: one chat engine plus the conversation as displayed.

use crate::chat::chatbot::{ChatReply, DataChatbot};
use crate::chat::config::ChatConfig;
use crate::chat::error::ChatError;
use crate::chat::message::ChatMessage;
use crate::error::ExplorerError;
use polars::prelude::DataFrame;
use std::sync::Arc;

/// First assistant message of every new session.
pub const GREETING: &str = "Bonjour ! Je connais toutes les prévisions. Posez-moi une question \
     (ex : 'Quelle ville sera la plus chaude demain ?')";

/// State a front-end keeps for one user.
///
/// Owns its [`DataChatbot`] and the transcript shown on screen. The observation table is
/// shared read-only between sessions. Create one per user session and pass it by
/// reference to whatever handles that user's requests; dropping it ends the conversation.
pub struct ExplorerSession {
    table: Arc<DataFrame>,
    chatbot: DataChatbot,
    transcript: Vec<ChatMessage>,
}

impl ExplorerSession {
    /// Starts a session whose chat engine is built from `config`.
    pub fn new(table: Arc<DataFrame>, config: &ChatConfig) -> Result<Self, ExplorerError> {
        let chatbot = DataChatbot::from_config(&table, config)?;
        Ok(Self::with_chatbot(table, chatbot))
    }

    pub fn with_chatbot(table: Arc<DataFrame>, chatbot: DataChatbot) -> Self {
        Self {
            table,
            chatbot,
            transcript: vec![ChatMessage::assistant(GREETING)],
        }
    }

    pub fn table(&self) -> &Arc<DataFrame> {
        &self.table
    }

    pub fn chatbot(&self) -> &DataChatbot {
        &self.chatbot
    }

    /// Everything shown in the conversation pane, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Sends `prompt` to the chat engine and records both sides in the transcript.
    ///
    /// When both models fail, the error text is recorded as the assistant's turn
    /// (the chat engine's own history is left unchanged) and the error is returned.
    pub async fn ask(&mut self, prompt: &str) -> Result<ChatReply, ChatError> {
        self.transcript.push(ChatMessage::user(prompt));
        let result = self.chatbot.chat(prompt).await;
        let shown = match &result {
            Ok(reply) => reply.content.clone(),
            Err(e) => e.to_string(),
        };
        self.transcript.push(ChatMessage::assistant(shown));
        result
    }

    /// Clears the conversation, on screen and in the chat engine.
    pub fn clear(&mut self) {
        self.chatbot.reset();
        self.transcript.clear();
    }
}
