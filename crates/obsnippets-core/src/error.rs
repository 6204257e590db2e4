use crate::models::SnippetId;
use std::io;
use thiserror::Error;

/// Reasons a draft cannot be committed as a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("snippet name must not be empty")]
    EmptyName,
    #[error("text snippets need some content")]
    EmptyTextContent,
}

impl ValidationError {
    /// Message shown to the user when a commit is rejected.
    pub fn user_message(&self) -> &'static str {
        "Please fill in all required fields!"
    }
}

#[derive(Debug, Error)]
pub enum ObsnippetsError {
    #[error("Invalid snippet: {0}")]
    Validation(#[from] ValidationError),

    #[error("Snippet {0} not found")]
    NotFound(SnippetId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No active document to insert into")]
    NoActiveDocument,

    #[error("Cursor {line}:{column} is outside the document")]
    InvalidCursor { line: usize, column: usize },

    #[error("Insertion failed: {0}")]
    Insertion(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Keyboard controller error: {0}")]
    Keyboard(String),

    #[error("Session is already closed")]
    SessionClosed,
}

impl ObsnippetsError {
    /// Whether the error came from persisting snippets rather than from the
    /// operation itself.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ObsnippetsError::Storage(_) | ObsnippetsError::Io(_) | ObsnippetsError::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ObsnippetsError>;
