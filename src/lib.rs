#[cfg(feature = "charts")]
pub mod charts;
mod chat;
mod error;
mod observations;
mod session;
mod types;
mod utils;

pub use error::ExplorerError;
pub use session::{ExplorerSession, GREETING};

pub use chat::chatbot::{ChatReply, DataChatbot, ReplySource};
pub use chat::config::{
    http_client, ChatConfig, API_KEY_ENV, DEFAULT_FALLBACK_MODEL, DEFAULT_PRIMARY_MODEL,
    FALLBACK_MODEL_ENV, LOCAL_BASE_URL_ENV, PRIMARY_MODEL_ENV,
};
pub use chat::context::{build_context, render_table, DEFAULT_CONTEXT_ROW_LIMIT};
pub use chat::endpoint::{
    CompletionEndpoint, OllamaEndpoint, OpenAiCompatibleEndpoint, GEMINI_BASE_URL,
    OLLAMA_BASE_URL, OPENAI_BASE_URL,
};
pub use chat::error::{CallFailed, ChatError, ConfigError};
pub use chat::message::{ChatMessage, Role, TurnHistory, MAX_HISTORY_EXCHANGES};
pub use chat::model_id::{ModelId, Provider};
pub use chat::notifier::{LogNotifier, Notifier};

pub use observations::data_loader::ObservationLoader;
pub use observations::error::ObservationError;
pub use observations::filtering::{filter_data, FilterValue};

pub use types::observation::*;
pub use types::observation_frame::{DashboardSummary, ObservationFrame};

pub use utils::{latest_data_file, DEFAULT_DATA_DIR};
