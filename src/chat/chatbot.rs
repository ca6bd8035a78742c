//! The chat engine answering questions about an observation table.

use crate::chat::config::{http_client, ChatConfig};
use crate::chat::context::{build_context, DEFAULT_CONTEXT_ROW_LIMIT};
use crate::chat::endpoint::CompletionEndpoint;
use crate::chat::error::ChatError;
use crate::chat::message::{ChatMessage, TurnHistory, MAX_HISTORY_EXCHANGES};
use crate::chat::notifier::{LogNotifier, Notifier};
use crate::error::ExplorerError;
use bon::bon;
use chrono::{Local, NaiveDate};
use log::{error, info, warn};
use polars::prelude::DataFrame;

/// Which endpoint produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Primary,
    Fallback,
}

/// A successful answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub content: String,
    pub source: ReplySource,
}

/// Hybrid (remote + local) chat engine over an observation table.
///
/// The system prompt is rendered once, when the engine is built, from the table as
/// it is at that moment. Each [`chat`](DataChatbot::chat) call tries the primary
/// endpoint once and, if that fails for any reason, the fallback endpoint once.
/// Successful exchanges are kept in a [`TurnHistory`] of at most ten exchanges.
///
/// One engine belongs to one conversation: `chat` and `reset` take `&mut self`.
///
/// # Examples
///
/// ```no_run
/// # use meteo_explorer::{ChatConfig, DataChatbot, ObservationLoader};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = ObservationLoader::default().load_latest().await?.frame.collect()?;
/// let mut chatbot = DataChatbot::from_config(&table, &ChatConfig::from_env()?)?;
///
/// match chatbot.chat("Quelle ville sera la plus chaude demain ?").await {
///     Ok(reply) => println!("{}", reply.content),
///     Err(e) => eprintln!("{e}"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct DataChatbot {
    context: String,
    history: TurnHistory,
    primary: Box<dyn CompletionEndpoint>,
    fallback: Box<dyn CompletionEndpoint>,
    notifier: Box<dyn Notifier>,
}

#[bon]
impl DataChatbot {
    /// Builds an engine from explicit endpoints.
    ///
    /// # Arguments
    ///
    /// * `table` - **Required (start).** The observations the model answers from.
    /// * `.primary(..)` / `.fallback(..)` - **Required.** The two endpoints, tried in that order.
    /// * `.notifier(..)` - Optional. Told when the fallback takes over. Defaults to [`LogNotifier`].
    /// * `.today(NaiveDate)` - Optional. Date written into the prompt. Defaults to the local date.
    /// * `.row_limit(usize)` - Optional. Rows embedded in the prompt. Defaults to 1000.
    /// * `.max_exchanges(usize)` - Optional. History bound. Defaults to 10 exchanges.
    ///
    /// No endpoint is contacted.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ContextRender`] if a table value cannot be read.
    #[builder]
    pub fn new(
        #[builder(start_fn)] table: &DataFrame,
        primary: Box<dyn CompletionEndpoint>,
        fallback: Box<dyn CompletionEndpoint>,
        notifier: Option<Box<dyn Notifier>>,
        today: Option<NaiveDate>,
        row_limit: Option<usize>,
        max_exchanges: Option<usize>,
    ) -> Result<Self, ChatError> {
        let today = today.unwrap_or_else(|| Local::now().date_naive());
        let row_limit = row_limit.unwrap_or(DEFAULT_CONTEXT_ROW_LIMIT);
        let context =
            build_context(table, today, row_limit).map_err(ChatError::ContextRender)?;
        info!(
            "Chat context built from {} rows ({} characters), primary {}, fallback {}",
            table.height().min(row_limit),
            context.len(),
            primary.model(),
            fallback.model()
        );

        Ok(Self {
            context,
            history: TurnHistory::new(max_exchanges.unwrap_or(MAX_HISTORY_EXCHANGES)),
            primary,
            fallback,
            notifier: notifier.unwrap_or_else(|| Box::new(LogNotifier)),
        })
    }

    /// Builds an engine whose endpoints are described by `config`.
    ///
    /// Runs [`ChatConfig::validate`], which only logs. A missing API key therefore
    /// still shows up on the first call, as a primary failure.
    pub fn from_config(table: &DataFrame, config: &ChatConfig) -> Result<Self, ExplorerError> {
        config.validate();
        let client = http_client()?;
        let chatbot = Self::builder(table)
            .primary(config.primary_endpoint(&client))
            .fallback(config.fallback_endpoint(&client))
            .row_limit(config.context_row_limit())
            .build()?;
        Ok(chatbot)
    }

    /// Answers `user_message`.
    ///
    /// The primary endpoint gets one attempt. On failure the notifier is told and the
    /// fallback gets one attempt. History is only updated when one of them answers.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::AllEndpointsFailed`], carrying both causes, when both
    /// endpoints fail. The engine stays usable.
    pub async fn chat(&mut self, user_message: &str) -> Result<ChatReply, ChatError> {
        let messages = self.assemble_messages(user_message);

        let reply = match self.primary.complete(&messages).await {
            Ok(content) => ChatReply {
                content,
                source: ReplySource::Primary,
            },
            Err(primary) => {
                warn!(
                    "Primary model {} failed ({}). Switching to {}",
                    self.primary.model(),
                    primary,
                    self.fallback.model()
                );
                self.notifier.notify(&format!(
                    "Mode hors-ligne activé : utilisation de {}",
                    self.fallback.model()
                ));

                match self.fallback.complete(&messages).await {
                    Ok(content) => ChatReply {
                        content,
                        source: ReplySource::Fallback,
                    },
                    Err(fallback) => {
                        error!(
                            "Fallback model {} failed too ({})",
                            self.fallback.model(),
                            fallback
                        );
                        return Err(ChatError::AllEndpointsFailed {
                            primary_model: self.primary.model().clone(),
                            primary,
                            fallback_model: self.fallback.model().clone(),
                            fallback,
                        });
                    }
                }
            }
        };

        self.history.push_exchange(
            ChatMessage::user(user_message),
            ChatMessage::assistant(reply.content.clone()),
        );
        Ok(reply)
    }

    /// Forgets every past exchange.
    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// The message list a call with `user_message` sends: system context, history,
    /// then the new message.
    pub fn assemble_messages(&self, user_message: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(self.context.as_str()));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(user_message));
        messages
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn history(&self) -> &TurnHistory {
        &self.history
    }
}
