mod common;
mod editor;
mod snippet_manager;

// Public API
pub use common::{restore_terminal, setup_terminal, show_message, StatusLine, Tui};
pub use editor::{run_editor, EditorOutcome};
pub use snippet_manager::display_snippet_manager;
