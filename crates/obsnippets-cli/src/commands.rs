use crate::cli::{Commands, InsertTarget};
use crate::utils::with_terminal;
use obsnippets_core::{
    notify_error, resolve_db_path, submit_new_snippet, ClipboardInserter, Command, Cursor,
    DocumentInserter, EditingSession, FileDocument, JsonFileStorage, KeyboardInserter,
    LogNotifier, ManagementSession, NoDocument, Result, SnippetRepository,
};
use obsnippets_ui::{display_snippet_manager, run_editor, show_message, EditorOutcome, StatusLine};
use ratatui::style::Color;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

// Time to switch to the target window before typing starts.
const TYPING_DELAY: Duration = Duration::from_millis(1500);

pub fn handle_command(db: Option<&Path>, command: Option<Commands>) -> Result<()> {
    let db_path = resolve_db_path(db);
    info!(path = %db_path.display(), "opening snippet store");
    let mut repository = SnippetRepository::open(JsonFileStorage::new(db_path))?;

    // Default: the manager, with no document to insert into
    let command = command.unwrap_or(Commands::Manage {
        target: InsertTarget::default(),
    });

    let result = match command {
        Commands::Create => create_snippet(&mut repository),
        Commands::Manage { target } => manage_snippets(&mut repository, &target),
    };

    if repository.is_dirty() {
        if let Err(e) = repository.flush() {
            warn!(error = %e, "snippets could not be saved");
            notify_error(&mut LogNotifier, &e);
            eprintln!("Warning: snippets could not be saved: {}", e);
        }
    }

    result
}

fn create_snippet(repository: &mut SnippetRepository) -> Result<()> {
    info!(command = Command::CreateSnippet.id(), "running command");
    let status = StatusLine::new();
    let mut notifier = status.clone();
    let mut session = EditingSession::create();

    let outcome = with_terminal(|terminal| {
        let outcome = run_editor(terminal, &mut session, &status, |session| {
            submit_new_snippet(session, repository, &mut notifier)
        })?;
        if let (EditorOutcome::Committed(_), Some(message)) = (&outcome, status.current()) {
            show_message(terminal, &message, Color::Green, 1200)?;
        }
        Ok(outcome)
    })?;

    match outcome {
        EditorOutcome::Committed(snippet) => println!("Snippet \"{}\" created", snippet.name),
        EditorOutcome::Cancelled => println!("Operation canceled."),
    }
    Ok(())
}

fn manage_snippets(repository: &mut SnippetRepository, target: &InsertTarget) -> Result<()> {
    info!(command = Command::ManageSnippets.id(), "running command");
    let mut inserter = build_inserter(target);
    // Typing has to wait until the terminal is handed back, or the keystrokes
    // land in the manager itself.
    let mut deferred = target.type_text.then(DeferredInsert::default);
    let status = StatusLine::new();
    let mut notifier = status.clone();

    let last_message = with_terminal(|terminal| {
        let mut session = ManagementSession::new(repository, &mut notifier);
        let active: &mut dyn DocumentInserter = match deferred.as_mut() {
            Some(deferred) => deferred,
            None => inserter.as_mut(),
        };
        display_snippet_manager(terminal, &mut session, active, &status)?;
        Ok(status.current())
    })?;

    if let Some(message) = last_message {
        println!("{}", message);
    }

    if let Some(text) = deferred.and_then(|deferred| deferred.text) {
        println!(
            "Typing the snippet into the focused window in {} ms...",
            TYPING_DELAY.as_millis()
        );
        inserter.insert_at_cursor(&text)?;
    }
    Ok(())
}

/// Holds the chosen snippet until the terminal is released.
#[derive(Debug, Default)]
struct DeferredInsert {
    text: Option<String>,
}

impl DocumentInserter for DeferredInsert {
    fn insert_at_cursor(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "the focused window".to_string()
    }
}

pub fn build_inserter(target: &InsertTarget) -> Box<dyn DocumentInserter> {
    if let Some(path) = &target.document {
        Box::new(FileDocument::new(
            path,
            Cursor::new(target.line.unwrap_or(0), target.column.unwrap_or(0)),
        ))
    } else if target.clipboard {
        Box::new(ClipboardInserter)
    } else if target.type_text {
        Box::new(KeyboardInserter::new(TYPING_DELAY))
    } else {
        Box::new(NoDocument)
    }
}
