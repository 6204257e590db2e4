use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use obsnippets_core::{Notifier, Result};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Terminal,
};
use std::cell::RefCell;
use std::io::{stdout, Stdout};
use std::rc::Rc;
use std::{thread, time::Duration};
use tracing::info;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    if let Err(e) = execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
}

pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Notifier backing the status line at the bottom of every screen.
///
/// Clones share their messages, so the screen keeps one handle while the
/// sessions notify through another.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    messages: Rc<RefCell<Vec<String>>>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }
}

impl Notifier for StatusLine {
    fn notify(&mut self, message: &str) {
        info!(target: "obsnippets::notice", "{}", message);
        self.messages.borrow_mut().push(message.to_string());
    }
}

// Helper function to show messages in a popup
pub fn show_message<B: Backend>(
    terminal: &mut Terminal<B>,
    message: &str,
    color: Color,
    duration_ms: u64,
) -> Result<()> {
    terminal.draw(|f| {
        let area = centered_rect(60, 20, f.area());

        // Clear the area behind the popup
        f.render_widget(Clear, area);

        let message_text = if duration_ms == 0 {
            format!("{}\n\nPress any key to continue...", message)
        } else {
            message.to_string()
        };

        let message_box = Paragraph::new(message_text)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL).title(" obsnippets "))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        f.render_widget(message_box, area);
    })?;

    if duration_ms > 0 {
        // Sleep but still be interruptible by key press
        for _ in 0..duration_ms / 100 {
            thread::sleep(Duration::from_millis(100));
            if crossterm::event::poll(Duration::from_millis(0))? {
                let _ = crossterm::event::read()?;
                break;
            }
        }
    } else if crossterm::event::poll(Duration::from_secs(30))? {
        let _ = crossterm::event::read()?;
    }

    Ok(())
}

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Status line paragraph; errors are shown in red.
pub fn status_paragraph(status: &StatusLine, is_error: bool) -> Paragraph<'static> {
    let color = if is_error { Color::Red } else { Color::Green };
    Paragraph::new(status.current().unwrap_or_default()).style(Style::default().fg(color))
}
