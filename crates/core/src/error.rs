//! Error types for Murmur Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid sender: {0:?} (expected \"user\" or \"other\")")]
    InvalidSender(String),

    #[error("Invalid message state: {0:?} (expected \"sending\", \"sent\" or \"read\")")]
    InvalidMessageState(String),

    #[error("Invalid color: {0:?} (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Bubble is already attached to a container")]
    AlreadyAttached,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to parse config TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
