//! Places formatted snippets into a document.

use crate::error::{ObsnippetsError, Result};
use arboard::Clipboard;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub trait DocumentInserter {
    /// Insert `text` at the caret of the active document.
    ///
    /// Fails with [`ObsnippetsError::NoActiveDocument`] when there is nothing
    /// to insert into.
    fn insert_at_cursor(&mut self, text: &str) -> Result<()>;

    /// Short description used in confirmation messages.
    fn describe(&self) -> String;
}

/// Zero-based caret position; `column` counts characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A text file with a caret in it.
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
    cursor: Cursor,
}

impl FileDocument {
    pub fn new(path: impl Into<PathBuf>, cursor: Cursor) -> Self {
        Self {
            path: path.into(),
            cursor,
        }
    }
}

impl DocumentInserter for FileDocument {
    fn insert_at_cursor(&mut self, text: &str) -> Result<()> {
        if !self.path.is_file() {
            return Err(ObsnippetsError::NoActiveDocument);
        }

        let mut document = fs::read_to_string(&self.path)?;
        let offset = byte_offset(&document, self.cursor).ok_or(ObsnippetsError::InvalidCursor {
            line: self.cursor.line,
            column: self.cursor.column,
        })?;
        document.insert_str(offset, text);
        fs::write(&self.path, document)?;

        debug!(path = %self.path.display(), offset, len = text.len(), "inserted snippet");
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "{} at {}:{}",
            self.path.display(),
            self.cursor.line,
            self.cursor.column
        )
    }
}

// Byte offset of `cursor` in `text`, or None if the caret is outside it. The
// caret may sit right after the last character of a line.
fn byte_offset(text: &str, cursor: Cursor) -> Option<usize> {
    let mut line_start = 0;
    for _ in 0..cursor.line {
        let newline = text[line_start..].find('\n')?;
        line_start += newline + 1;
    }

    let rest = &text[line_start..];
    let line = rest.split('\n').next().unwrap_or_default();
    let line = line.strip_suffix('\r').unwrap_or(line);

    if cursor.column == line.chars().count() {
        return Some(line_start + line.len());
    }
    line.char_indices()
        .nth(cursor.column)
        .map(|(index, _)| line_start + index)
}

/// Stand-in used when no document is open.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocument;

impl DocumentInserter for NoDocument {
    fn insert_at_cursor(&mut self, _text: &str) -> Result<()> {
        Err(ObsnippetsError::NoActiveDocument)
    }

    fn describe(&self) -> String {
        "no document".to_string()
    }
}

/// Puts the text on the system clipboard, ready to be pasted at the caret.
#[derive(Debug, Default)]
pub struct ClipboardInserter;

impl DocumentInserter for ClipboardInserter {
    fn insert_at_cursor(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ObsnippetsError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| ObsnippetsError::Clipboard(e.to_string()))
    }

    fn describe(&self) -> String {
        "the clipboard".to_string()
    }
}

/// Types the text into whichever window has keyboard focus.
#[derive(Debug)]
pub struct KeyboardInserter {
    delay: Duration,
}

impl KeyboardInserter {
    /// `delay` gives the user time to focus the target window.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl DocumentInserter for KeyboardInserter {
    fn insert_at_cursor(&mut self, text: &str) -> Result<()> {
        let mut keyboard = create_keyboard_controller()?;
        thread::sleep(self.delay);
        type_text_with_formatting(&mut keyboard, text)
    }

    fn describe(&self) -> String {
        "the focused window".to_string()
    }
}

/// Create a keyboard controller
pub fn create_keyboard_controller() -> Result<Enigo> {
    Enigo::new(&Settings::default()).map_err(|err| {
        ObsnippetsError::Keyboard(format!("Failed to create keyboard controller: {}", err))
    })
}

pub fn type_text_with_formatting(keyboard: &mut impl Keyboard, text: &str) -> Result<()> {
    // Keep chunks small enough for the platform input buffer
    const CHUNK_SIZE: usize = 512;

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            keyboard
                .key(Key::Return, Direction::Click)
                .map_err(|err| ObsnippetsError::Keyboard(format!("Failed to type newline: {}", err)))?;
            thread::sleep(Duration::from_millis(15));
        }

        let chars: Vec<char> = line.chars().collect();
        for chunk in chars.chunks(CHUNK_SIZE) {
            let chunk: String = chunk.iter().collect();
            keyboard
                .text(&chunk)
                .map_err(|err| ObsnippetsError::Keyboard(format!("Failed to type text: {}", err)))?;
            thread::sleep(Duration::from_millis(10));
        }
    }

    Ok(())
}
