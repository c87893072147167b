//! Command implementations.

pub mod deploy;
pub mod keys;
pub mod receipt;

use std::path::PathBuf;

use storechain_gateway::chain::{ChainError, PipelineError, PollFailure, SignerError};
use storechain_gateway::config::ConfigError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Signer error: {0}")]
    Signer(#[from] SignerError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Confirmation failed: {0}")]
    Poll(#[from] PollFailure),

    #[error("Transaction failed: {0}")]
    Pipeline(#[from] PipelineError),

    /// Refuses to overwrite an existing key file.
    #[error("Key file already exists: {}", .0.display())]
    KeyExists(PathBuf),

    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid contract artifact: {0}")]
    Artifact(String),
}
