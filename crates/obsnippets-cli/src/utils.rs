use obsnippets_core::{ensure_config_dir, get_log_file_path, Result};
use obsnippets_ui::{restore_terminal, setup_terminal, Tui};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Run `f` on a fresh terminal and always hand the terminal back afterwards.
pub fn with_terminal<T>(f: impl FnOnce(&mut Tui) -> Result<T>) -> Result<T> {
    let mut terminal = setup_terminal()?;
    let result = f(&mut terminal);
    restore_terminal(&mut terminal)?;
    result
}

/// Log to a file in the config directory so nothing is drawn over the UI.
/// `RUST_LOG` picks the level, `info` by default.
pub fn init_logging() -> Result<()> {
    ensure_config_dir()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_log_file_path())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}
