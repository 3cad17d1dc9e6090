//! Workspace error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `VanetError` via `From` impls, or keep them separate and wrap `VanetError`
//! as one variant.  Both patterns are acceptable; prefer whichever keeps
//! error sites clean.

use thiserror::Error;

use crate::NodeId;

/// The top-level error type for `vanet-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum VanetError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `vanet-*` crates.
pub type VanetResult<T> = Result<T, VanetError>;
