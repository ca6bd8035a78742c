pub mod chatbot;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod message;
pub mod model_id;
pub mod notifier;

#[cfg(test)]
pub(crate) mod testing;
