use crate::common::{status_paragraph, StatusLine};
use crate::editor::{run_editor, EditorOutcome};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use obsnippets_core::{
    format_snippet, DocumentInserter, ManagementSession, ObsnippetsError, Result, SnippetId,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

const PREVIEW_WIDTH: usize = 60;

/// A rendered row of the listing: either a category heading or a snippet.
struct Row {
    item: ListItem<'static>,
    snippet: Option<SnippetId>,
}

fn build_rows(session: &ManagementSession<'_>) -> Vec<Row> {
    let mut rows = Vec::new();
    for group in session.groups() {
        rows.push(Row {
            item: ListItem::new(Line::from(Span::styled(
                group.heading.clone(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ))),
            snippet: None,
        });

        if group.snippets.is_empty() {
            rows.push(Row {
                item: ListItem::new(Span::styled(
                    "    (none)",
                    Style::default().fg(Color::DarkGray),
                )),
                snippet: None,
            });
        }

        for snippet in group.snippets {
            let line = Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    snippet.name.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    preview(&format_snippet(snippet)),
                    Style::default().fg(Color::Gray),
                ),
            ]);
            rows.push(Row {
                item: ListItem::new(line),
                snippet: Some(snippet.id),
            });
        }
    }
    rows
}

// One-line description of the inserted text.
fn preview(formatted: &str) -> String {
    let flat = formatted.replace('\n', " ⏎ ");
    if flat.chars().count() > PREVIEW_WIDTH {
        let cut: String = flat.chars().take(PREVIEW_WIDTH - 1).collect();
        format!("{}…", cut)
    } else {
        flat
    }
}

/// Selection over snippet rows; headings are skipped.
#[derive(Debug, Default)]
struct Selection {
    snippet: Option<SnippetId>,
}

impl Selection {
    fn row_index(&self, rows: &[Row]) -> Option<usize> {
        let selectable: Vec<usize> = selectable_rows(rows);
        self.snippet
            .and_then(|id| rows.iter().position(|row| row.snippet == Some(id)))
            .or_else(|| selectable.first().copied())
    }

    fn step(&mut self, rows: &[Row], forward: bool) {
        let selectable = selectable_rows(rows);
        if selectable.is_empty() {
            self.snippet = None;
            return;
        }
        let current = self
            .row_index(rows)
            .and_then(|row| selectable.iter().position(|r| *r == row))
            .unwrap_or(0);
        let next = if forward {
            (current + 1).min(selectable.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.snippet = rows[selectable[next]].snippet;
    }

    // Keep the cursor near where it was after the selected row vanished.
    fn refresh(&mut self, rows: &[Row], previous_row: Option<usize>) {
        if self.snippet.is_some_and(|id| rows.iter().any(|r| r.snippet == Some(id))) {
            return;
        }
        let selectable = selectable_rows(rows);
        let anchor = previous_row.unwrap_or(0);
        self.snippet = selectable
            .iter()
            .find(|row| **row >= anchor)
            .or_else(|| selectable.last())
            .and_then(|row| rows[*row].snippet);
    }
}

fn selectable_rows(rows: &[Row]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.snippet.is_some())
        .map(|(index, _)| index)
        .collect()
}

/// Show the grouped snippet listing until a snippet is inserted or the user
/// closes it.
pub fn display_snippet_manager<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut ManagementSession<'_>,
    inserter: &mut dyn DocumentInserter,
    status: &StatusLine,
) -> Result<()> {
    let mut selection = Selection::default();
    let mut status_is_error = false;

    while session.is_open() {
        // Re-read the repository on every pass
        let rows = build_rows(session);
        let selected_row = selection.row_index(&rows);
        selection.snippet = selected_row.and_then(|row| rows[row].snippet);

        terminal.draw(|f| {
            draw_manager(f, session.title(), &rows, selected_row, status, status_is_error)
        })?;

        let key = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            _ => continue,
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => session.close(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                session.close()
            }
            KeyCode::Up | KeyCode::Char('k') => selection.step(&rows, false),
            KeyCode::Down | KeyCode::Char('j') => selection.step(&rows, true),
            KeyCode::Enter | KeyCode::Char('i') => {
                if let Some(id) = selection.snippet {
                    status_is_error = session.insert(id, inserter).is_err();
                }
            }
            KeyCode::Char('e') => {
                if let Some(id) = selection.snippet {
                    status_is_error = edit_snippet(terminal, session, id, status).is_err();
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selection.snippet {
                    status_is_error = session.delete(id).is_err();
                    let rows = build_rows(session);
                    selection.refresh(&rows, selected_row);
                }
            }
            _ => {}
        }
    }

    debug!("snippet manager closed");
    Ok(())
}

fn edit_snippet<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut ManagementSession<'_>,
    id: SnippetId,
    status: &StatusLine,
) -> Result<()> {
    let mut editing = session.edit(id)?;
    let outcome = run_editor(terminal, &mut editing, status, |editing| {
        session.commit_edit(editing)
    })?;

    if let EditorOutcome::Committed(_) = outcome {
        if session.repository().is_dirty() {
            return Err(ObsnippetsError::Storage(
                "changes are not saved yet".to_string(),
            ));
        }
    }
    Ok(())
}

fn draw_manager(
    f: &mut Frame,
    title: &str,
    rows: &[Row],
    selected_row: Option<usize>,
    status: &StatusLine,
    status_is_error: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Listing
            Constraint::Length(1), // Help
            Constraint::Length(1), // Status
        ])
        .split(f.area());

    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = rows.iter().map(|row| row.item.clone()).collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(selected_row);
    f.render_stateful_widget(list, chunks[1], &mut state);

    let help = Paragraph::new("↑/↓: select | Enter: insert | e: edit | d: delete | Esc: close")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[2]);
    f.render_widget(status_paragraph(status, status_is_error), chunks[3]);
}
