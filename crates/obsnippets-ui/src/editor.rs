use crate::common::{status_paragraph, StatusLine};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use obsnippets_core::{
    Category, Draft, EditingSession, Language, Result, SessionState, Snippet,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

#[derive(Debug)]
pub enum EditorOutcome {
    Committed(Snippet),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Category,
    Content,
    Language,
}

#[derive(Debug, PartialEq, Eq)]
enum FormAction {
    Continue,
    Submit,
    Cancel,
}

/// Which field has focus; the values themselves live in the session draft.
struct Form {
    field: Field,
}

impl Form {
    fn new() -> Self {
        Self { field: Field::Name }
    }

    fn fields(draft: &Draft) -> Vec<Field> {
        let mut fields = vec![Field::Name, Field::Category];
        if draft.content_visible() {
            fields.push(Field::Content);
        }
        if draft.language_visible() {
            fields.push(Field::Language);
        }
        fields
    }

    fn focus_next(&mut self, draft: &Draft) {
        let fields = Self::fields(draft);
        let index = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[(index + 1) % fields.len()];
    }

    fn focus_prev(&mut self, draft: &Draft) {
        let fields = Self::fields(draft);
        let index = fields.iter().position(|f| *f == self.field).unwrap_or(0);
        self.field = fields[(index + fields.len() - 1) % fields.len()];
    }

    fn is_last(&self, draft: &Draft) -> bool {
        Self::fields(draft).last() == Some(&self.field)
    }

    fn handle_key(&mut self, session: &mut EditingSession, key: KeyEvent) -> FormAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return FormAction::Cancel,
            KeyCode::Char('c') if ctrl => return FormAction::Cancel,
            KeyCode::Char('s') if ctrl => return FormAction::Submit,
            KeyCode::Tab => self.focus_next(session.draft()),
            KeyCode::BackTab => self.focus_prev(session.draft()),
            _ => match self.field {
                Field::Name => self.edit_name(session, key.code),
                Field::Category => self.edit_category(session, key.code),
                Field::Content => edit_content(session, key.code),
                Field::Language => self.edit_language(session, key.code),
            },
        }

        match key.code {
            KeyCode::Enter if self.field != Field::Content => {
                if self.is_last(session.draft()) {
                    FormAction::Submit
                } else {
                    self.focus_next(session.draft());
                    FormAction::Continue
                }
            }
            _ => FormAction::Continue,
        }
    }

    fn handle_paste(&mut self, session: &mut EditingSession, text: &str) {
        match self.field {
            Field::Name => {
                // Names stay on one line
                let pasted = text.replace(['\r', '\n'], " ");
                session.set_name(format!("{}{}", session.draft().name, pasted));
            }
            Field::Content => {
                let pasted = text.replace("\r\n", "\n");
                session.set_content(format!("{}{}", session.draft().content, pasted));
            }
            Field::Category | Field::Language => {}
        }
    }

    fn edit_name(&mut self, session: &mut EditingSession, code: KeyCode) {
        let mut name = session.draft().name.clone();
        match code {
            KeyCode::Char(c) => name.push(c),
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Down => return self.focus_next(session.draft()),
            _ => return,
        }
        session.set_name(name);
    }

    fn edit_category(&mut self, session: &mut EditingSession, code: KeyCode) {
        match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                let toggled = session.draft().category.toggled();
                session.set_category(toggled);
            }
            KeyCode::Char('t') => session.set_category(Category::Text),
            KeyCode::Char('c') => session.set_category(Category::Code),
            KeyCode::Up => self.focus_prev(session.draft()),
            KeyCode::Down => self.focus_next(session.draft()),
            _ => {}
        }
    }

    fn edit_language(&mut self, session: &mut EditingSession, code: KeyCode) {
        match code {
            KeyCode::Right | KeyCode::Char(' ') => {
                let next = cycle_language(session.draft().language.as_ref(), true);
                session.set_language(next);
            }
            KeyCode::Left => {
                let prev = cycle_language(session.draft().language.as_ref(), false);
                session.set_language(prev);
            }
            KeyCode::Up => self.focus_prev(session.draft()),
            _ => {}
        }
    }
}

fn edit_content(session: &mut EditingSession, code: KeyCode) {
    let mut content = session.draft().content.clone();
    match code {
        KeyCode::Char(c) => content.push(c),
        KeyCode::Enter => content.push('\n'),
        KeyCode::Backspace => {
            content.pop();
        }
        _ => return,
    }
    session.set_content(content);
}

// Steps through "no language" followed by the supported languages. A custom
// language name restarts the cycle.
fn cycle_language(current: Option<&Language>, forward: bool) -> Option<Language> {
    let mut choices: Vec<Option<Language>> = vec![None];
    choices.extend(Language::SUPPORTED.iter().cloned().map(Some));

    let index = choices
        .iter()
        .position(|choice| choice.as_ref() == current)
        .unwrap_or(0);
    let next = if forward {
        (index + 1) % choices.len()
    } else {
        (index + choices.len() - 1) % choices.len()
    };
    choices.swap_remove(next)
}

/// Run the create/edit form until the snippet is committed or the user
/// backs out. `commit` is called on every submit; while it fails and the
/// session is still open the form stays up for correction.
pub fn run_editor<B, F>(
    terminal: &mut Terminal<B>,
    session: &mut EditingSession,
    status: &StatusLine,
    mut commit: F,
) -> Result<EditorOutcome>
where
    B: Backend,
    F: FnMut(&mut EditingSession) -> Result<Snippet>,
{
    let mut form = Form::new();
    let mut status_is_error = false;

    loop {
        terminal.draw(|f| draw_form(f, session, &form, status, status_is_error))?;

        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                form.handle_key(session, key)
            }
            Event::Paste(text) => {
                form.handle_paste(session, &text);
                FormAction::Continue
            }
            _ => FormAction::Continue,
        };

        match action {
            FormAction::Continue => {}
            FormAction::Cancel => {
                debug!("editing cancelled");
                let _ = session.cancel();
                return Ok(EditorOutcome::Cancelled);
            }
            FormAction::Submit => match commit(session) {
                Ok(snippet) => return Ok(EditorOutcome::Committed(snippet)),
                Err(err) => {
                    // Storage trouble still commits; the status line carries the warning
                    if let SessionState::Committed(snippet) = session.state() {
                        return Ok(EditorOutcome::Committed(snippet.clone()));
                    }
                    debug!(error = %err, "submit failed");
                    status_is_error = true;
                }
            },
        }
    }
}

fn field_block(title: &str, active: bool) -> Block<'static> {
    let color = if active { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", title))
}

fn draw_form(
    f: &mut Frame,
    session: &EditingSession,
    form: &Form,
    status: &StatusLine,
    status_is_error: bool,
) {
    let draft = session.draft();
    let mut constraints = vec![
        Constraint::Length(3), // Title
        Constraint::Length(3), // Name
        Constraint::Length(3), // Category
        Constraint::Min(5),    // Content
    ];
    if draft.language_visible() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(1)); // Help
    constraints.push(Constraint::Length(1)); // Status

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let title = Paragraph::new(session.title())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let name = Paragraph::new(draft.name.as_str())
        .block(field_block("Name of snippet", form.field == Field::Name));
    f.render_widget(name, chunks[1]);

    let category_spans: Vec<Span> = Category::DISPLAY_ORDER
        .iter()
        .flat_map(|category| {
            let selected = *category == draft.category;
            let marker = if selected { "(•) " } else { "( ) " };
            let style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [
                Span::styled(format!("{}{}", marker, category.label()), style),
                Span::raw("   "),
            ]
        })
        .collect();
    let category = Paragraph::new(Line::from(category_spans))
        .block(field_block("Type of snippet", form.field == Field::Category));
    f.render_widget(category, chunks[2]);

    let content_area = chunks[3];
    let inner_height = content_area.height.saturating_sub(2) as usize;
    let line_count = draft.content.split('\n').count();
    let scroll = line_count.saturating_sub(inner_height.max(1)) as u16;
    let content = Paragraph::new(draft.content.as_str())
        .scroll((scroll, 0))
        .block(field_block("Snippet content", form.field == Field::Content));
    f.render_widget(content, content_area);

    let mut next = 4;
    if draft.language_visible() {
        let label = draft
            .language
            .as_ref()
            .map(|language| language.label().to_string())
            .unwrap_or_else(|| "(none)".to_string());
        let language = Paragraph::new(format!("◀ {} ▶", label))
            .block(field_block("Code language", form.field == Field::Language));
        f.render_widget(language, chunks[next]);
        next += 1;
    }

    let help = Paragraph::new(format!(
        "Tab: switch fields | Ctrl+S: {} | Esc: cancel",
        session.submit_label()
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    f.render_widget(help, chunks[next]);
    f.render_widget(status_paragraph(status, status_is_error), chunks[next + 1]);

    match form.field {
        Field::Name => place_cursor(f, chunks[1], 0, draft.name.chars().count()),
        Field::Content => {
            let last_line = draft.content.rsplit('\n').next().unwrap_or_default();
            let row = (line_count - 1).min(inner_height.saturating_sub(1));
            place_cursor(f, content_area, row, last_line.chars().count());
        }
        Field::Category | Field::Language => {}
    }
}

fn place_cursor(f: &mut Frame, area: Rect, row: usize, column: usize) {
    let max_x = area.width.saturating_sub(2) as usize;
    let x = area.x + 1 + column.min(max_x) as u16;
    let y = area.y + 1 + row as u16;
    f.set_cursor_position((x, y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_text(form: &mut Form, session: &mut EditingSession, text: &str) {
        for c in text.chars() {
            form.handle_key(session, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_fills_the_focused_fields() {
        let mut session = EditingSession::create();
        let mut form = Form::new();

        type_text(&mut form, &mut session, "greet");
        assert_eq!(form.handle_key(&mut session, key(KeyCode::Enter)), FormAction::Continue);
        assert_eq!(form.field, Field::Category);
        form.handle_key(&mut session, key(KeyCode::Tab));
        type_text(&mut form, &mut session, "Hi");
        form.handle_key(&mut session, key(KeyCode::Enter));
        type_text(&mut form, &mut session, "there");

        assert_eq!(session.draft().name, "greet");
        assert_eq!(session.draft().content, "Hi\nthere");
    }

    #[test]
    fn language_field_only_reachable_for_code() {
        let mut session = EditingSession::create();
        let mut form = Form::new();

        for _ in 0..3 {
            form.handle_key(&mut session, key(KeyCode::Tab));
        }
        assert_eq!(form.field, Field::Name);

        form.handle_key(&mut session, key(KeyCode::Tab));
        form.handle_key(&mut session, key(KeyCode::Right));
        assert_eq!(session.draft().category, Category::Code);
        form.handle_key(&mut session, key(KeyCode::Tab));
        form.handle_key(&mut session, key(KeyCode::Tab));
        assert_eq!(form.field, Field::Language);

        form.handle_key(&mut session, key(KeyCode::Right));
        assert_eq!(session.draft().language, Some(Language::JavaScript));
        form.handle_key(&mut session, key(KeyCode::Left));
        form.handle_key(&mut session, key(KeyCode::Left));
        assert_eq!(session.draft().language, Some(Language::Markdown));
    }

    #[test]
    fn ctrl_s_submits_and_esc_cancels() {
        let mut session = EditingSession::create();
        let mut form = Form::new();
        let ctrl_s = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('s'))
        };

        assert_eq!(form.handle_key(&mut session, ctrl_s), FormAction::Submit);
        assert_eq!(form.handle_key(&mut session, key(KeyCode::Esc)), FormAction::Cancel);
        assert!(session.draft().name.is_empty());
    }

    #[test]
    fn pasted_names_stay_on_one_line() {
        let mut session = EditingSession::create();
        let mut form = Form::new();

        form.handle_paste(&mut session, "two\nlines");
        assert_eq!(session.draft().name, "two lines");
    }

    #[test]
    fn custom_language_restarts_cycle() {
        let custom = Language::from("rust");
        assert_eq!(cycle_language(Some(&custom), true), Some(Language::JavaScript));
        assert_eq!(cycle_language(None, false), Some(Language::Markdown));
    }
}
