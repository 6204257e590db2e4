//! Listing, inserting, editing and deleting snippets.
//!
//! The session is a view over the live repository: every listing is read
//! fresh, nothing is cached between actions.

use crate::editing::EditingSession;
use crate::error::{ObsnippetsError, Result};
use crate::format::format_snippet;
use crate::insertion::DocumentInserter;
use crate::models::{Category, Snippet, SnippetId};
use crate::notify::{notify_error, Notifier};
use crate::repository::SnippetRepository;
use tracing::info;

/// One heading of the management listing.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub heading: String,
    pub snippets: Vec<&'a Snippet>,
}

pub struct ManagementSession<'a> {
    repository: &'a mut SnippetRepository,
    notifier: &'a mut dyn Notifier,
    open: bool,
}

impl<'a> ManagementSession<'a> {
    pub fn new(repository: &'a mut SnippetRepository, notifier: &'a mut dyn Notifier) -> Self {
        Self {
            repository,
            notifier,
            open: true,
        }
    }

    pub fn title(&self) -> &'static str {
        "Snippet management"
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn repository(&self) -> &SnippetRepository {
        self.repository
    }

    pub fn snippet(&self, id: SnippetId) -> Option<&Snippet> {
        self.repository.get(id)
    }

    /// Snippets grouped by category, text first.
    pub fn groups(&self) -> Vec<CategoryGroup<'_>> {
        Category::DISPLAY_ORDER
            .into_iter()
            .map(|category| CategoryGroup {
                category,
                heading: format!("Snippets - {}", category),
                snippets: self.repository.filter_by_category(category),
            })
            .collect()
    }

    /// Format the snippet and insert it at the document caret. The session
    /// closes once the text is in place; a failed insert leaves it open.
    pub fn insert(&mut self, id: SnippetId, inserter: &mut dyn DocumentInserter) -> Result<()> {
        self.ensure_open()?;
        let text = match self.repository.get(id) {
            Some(snippet) => format_snippet(snippet),
            None => return self.fail(ObsnippetsError::NotFound(id)),
        };

        if let Err(err) = inserter.insert_at_cursor(&text) {
            return self.fail(err);
        }

        info!(%id, target = %inserter.describe(), "inserted snippet");
        self.close();
        Ok(())
    }

    /// Open an editing session seeded from the snippet.
    pub fn edit(&mut self, id: SnippetId) -> Result<EditingSession> {
        self.ensure_open()?;
        match self.repository.get(id) {
            Some(snippet) => Ok(EditingSession::edit(snippet)),
            None => self.fail(ObsnippetsError::NotFound(id)),
        }
    }

    /// Commit an edit started with [`ManagementSession::edit`]; the snippet is
    /// replaced in place and the session stays open.
    pub fn commit_edit(&mut self, session: &mut EditingSession) -> Result<Snippet> {
        self.ensure_open()?;
        match session.commit_to(self.repository) {
            Ok(snippet) => {
                self.notifier
                    .notify(&format!("Snippet \"{}\" updated", snippet.name));
                Ok(snippet)
            }
            Err(err) => self.fail(err),
        }
    }

    /// Delete right away; there is no confirmation step.
    pub fn delete(&mut self, id: SnippetId) -> Result<Snippet> {
        self.ensure_open()?;
        match self.repository.remove(id) {
            Ok(removed) => {
                self.notifier
                    .notify(&format!("Snippet \"{}\" deleted", removed.name));
                Ok(removed)
            }
            Err(err) => self.fail(err),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(ObsnippetsError::SessionClosed)
        }
    }

    fn fail<T>(&mut self, err: ObsnippetsError) -> Result<T> {
        notify_error(self.notifier, &err);
        Err(err)
    }
}
