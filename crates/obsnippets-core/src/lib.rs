//! obsnippets - a small library of reusable text and code snippets.
//!
//! Snippets live in an ordered [`SnippetRepository`] that is written back to
//! its storage after every change. Editing goes through an
//! [`EditingSession`], browsing and inserting through a
//! [`ManagementSession`].

pub mod commands;
pub mod config;
pub mod editing;
pub mod error;
pub mod format;
pub mod insertion;
pub mod management;
pub mod models;
pub mod notify;
pub mod repository;
pub mod storage;

// Re-export common items for convenience
pub use commands::{submit_new_snippet, Command};
pub use config::{
    ensure_config_dir, get_config_dir, get_db_file_path, get_log_file_path, resolve_db_path,
};
pub use editing::{Draft, EditingSession, SessionState};
pub use error::{ObsnippetsError, Result, ValidationError};
pub use format::format_snippet;
pub use insertion::{
    ClipboardInserter, Cursor, DocumentInserter, FileDocument, KeyboardInserter, NoDocument,
};
pub use management::{CategoryGroup, ManagementSession};
pub use models::{Category, Language, Snippet, SnippetId};
pub use notify::{notify_error, LogNotifier, MessageLog, Notifier};
pub use repository::SnippetRepository;
pub use storage::{JsonFileStorage, MemoryStorage, SnippetStorage};
