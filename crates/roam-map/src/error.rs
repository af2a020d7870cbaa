use std::path::PathBuf;

use thiserror::Error;

/// Problems found while loading or building a scene.
///
/// Path queries never fail; everything here is caught before the first tick.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scene yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate room id: {0}")]
    DuplicateRoom(String),

    #[error("duplicate corridor id: {0}")]
    DuplicateCorridor(String),

    #[error("corridor {corridor} references unknown room {room}")]
    UnknownRoom { corridor: String, room: String },

    #[error("invalid geometry for {id}: {reason}")]
    InvalidGeometry { id: String, reason: String },

    #[error("invalid nav settings: {0}")]
    InvalidNavSettings(String),
}

pub type Result<T> = std::result::Result<T, MapError>;
