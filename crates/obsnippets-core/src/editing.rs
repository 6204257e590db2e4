//! Create/edit workflow for a single snippet.
//!
//! A session owns a [`Draft`] that is edited freely. Submitting validates it;
//! a valid draft becomes a [`Snippet`] and is handed to a commit handler,
//! an invalid one leaves the session open for correction.

use crate::error::{ObsnippetsError, Result, ValidationError};
use crate::models::{validate_fields, Category, Language, Snippet, SnippetId};
use crate::repository::SnippetRepository;
use tracing::debug;

/// In-progress field values of a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub category: Category,
    pub content: String,
    pub language: Option<Language>,
}

impl Draft {
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            category: Category::Text,
            content: String::new(),
            language: None,
        }
    }

    pub fn from_snippet(snippet: &Snippet) -> Self {
        Self {
            name: snippet.name.clone(),
            category: snippet.category,
            content: snippet.content.clone(),
            language: snippet.language.clone(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate_fields(&self.name, self.category, &self.content)
    }

    /// Content is edited for both categories.
    pub fn content_visible(&self) -> bool {
        matches!(self.category, Category::Text | Category::Code)
    }

    /// The language only matters for code.
    pub fn language_visible(&self) -> bool {
        self.category == Category::Code
    }

    fn to_snippet(&self, id: Option<SnippetId>) -> Snippet {
        Snippet {
            id: id.unwrap_or_default(),
            name: self.name.clone(),
            content: self.content.clone(),
            category: self.category,
            language: self.language.clone(),
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Rejected(ValidationError),
    Committed(Snippet),
    Cancelled,
}

#[derive(Debug)]
pub struct EditingSession {
    draft: Draft,
    base: Option<Snippet>,
    state: SessionState,
}

impl EditingSession {
    /// Start a create flow with an empty draft.
    pub fn create() -> Self {
        Self {
            draft: Draft::empty(),
            base: None,
            state: SessionState::Editing,
        }
    }

    /// Start an edit flow seeded from `base`.
    pub fn edit(base: &Snippet) -> Self {
        Self {
            draft: Draft::from_snippet(base),
            base: Some(base.clone()),
            state: SessionState::Editing,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_edit(&self) -> bool {
        self.base.is_some()
    }

    /// Open sessions accept field changes and submits.
    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Editing | SessionState::Rejected(_))
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() {
            "Edit a snippet"
        } else {
            "Create a new snippet"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Edit Snippet"
        } else {
            "Create Snippet"
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        if self.reopen() {
            self.draft.name = name.into();
        }
    }

    /// Switching category never clears content or language.
    pub fn set_category(&mut self, category: Category) {
        if self.reopen() {
            self.draft.category = category;
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        if self.reopen() {
            self.draft.content = content.into();
        }
    }

    pub fn set_language(&mut self, language: Option<Language>) {
        if self.reopen() {
            self.draft.language = language;
        }
    }

    /// Validate the draft and hand the resulting snippet to `handler` together
    /// with the snippet being edited, if any.
    ///
    /// Storage failures still count as committed since the repository keeps
    /// the change in memory.
    pub fn submit<F>(&mut self, handler: F) -> Result<Snippet>
    where
        F: FnOnce(Snippet, Option<&Snippet>) -> Result<()>,
    {
        if !self.is_open() {
            return Err(ObsnippetsError::SessionClosed);
        }

        if let Err(reason) = self.draft.validate() {
            debug!(%reason, "draft rejected");
            self.state = SessionState::Rejected(reason);
            return Err(reason.into());
        }

        let snippet = self.draft.to_snippet(self.base.as_ref().map(|b| b.id));
        match handler(snippet.clone(), self.base.as_ref()) {
            Ok(()) => {
                self.state = SessionState::Committed(snippet.clone());
                Ok(snippet)
            }
            Err(err) if err.is_storage() => {
                self.state = SessionState::Committed(snippet);
                Err(err)
            }
            Err(err) => {
                self.state = SessionState::Editing;
                Err(err)
            }
        }
    }

    /// Submit into `repository`: create flows append, edit flows replace the
    /// base snippet in place.
    pub fn commit_to(&mut self, repository: &mut SnippetRepository) -> Result<Snippet> {
        self.submit(|snippet, base| match base {
            Some(base) => repository.update(base.id, snippet),
            None => repository.add(snippet),
        })
    }

    pub fn cancel(&mut self) -> Result<()> {
        if !self.is_open() {
            return Err(ObsnippetsError::SessionClosed);
        }
        self.state = SessionState::Cancelled;
        Ok(())
    }

    fn reopen(&mut self) -> bool {
        match self.state {
            SessionState::Editing => true,
            SessionState::Rejected(_) => {
                self.state = SessionState::Editing;
                true
            }
            SessionState::Committed(_) | SessionState::Cancelled => false,
        }
    }
}
