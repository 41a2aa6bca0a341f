use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::document::DocumentId;

/// Top-level error type for draft/publish operations
#[derive(Debug, Error, Diagnostic)]
pub enum DraftError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("note {id} not found")]
    #[diagnostic(
        code(drafts::not_found),
        help("neither a published nor a draft record exists for this id")
    )]
    NotFound { id: DocumentId },

    #[error("failed to load note {id}: both reads failed")]
    #[diagnostic(code(drafts::load))]
    Load {
        id: DocumentId,
        published: StoreError,
        #[source]
        draft: StoreError,
    },
}

/// Errors from a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("store unavailable: {message}")]
    #[diagnostic(code(store::unavailable))]
    Unavailable { message: String },

    #[error("write rejected: {message}")]
    #[diagnostic(code(store::rejected))]
    Rejected { message: String },

    #[error("i/o error at {}", path.display())]
    #[diagnostic(code(store::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record")]
    #[diagnostic(code(store::serde))]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    #[error("invalid document id {id:?}")]
    #[diagnostic(
        code(store::invalid_id),
        help("ids may not be empty, start with '.', or contain path separators")
    )]
    InvalidId { id: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Checks performed before any write.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a title is required to publish")]
    #[diagnostic(code(validation::missing_title), help("give the note a title"))]
    MissingTitle,
}

/// Configuration errors
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    #[diagnostic(code(config::invalid))]
    Invalid { var: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, DraftError>;
