use roam_map::MapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("invalid behavior config: {0}")]
    InvalidBehaviorConfig(String),

    #[error("invalid character {id}: {reason}")]
    InvalidCharacter { id: String, reason: String },

    #[error("scene has no rooms")]
    EmptyScene,
}

pub type Result<T> = std::result::Result<T, SimError>;
