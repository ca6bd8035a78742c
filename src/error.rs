use crate::chat::error::{ChatError, ConfigError};
use crate::observations::error::ObservationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Observation(#[from] ObservationError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
