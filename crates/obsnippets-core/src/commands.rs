use crate::editing::EditingSession;
use crate::error::Result;
use crate::models::Snippet;
use crate::notify::{notify_error, Notifier};
use crate::repository::SnippetRepository;
use std::fmt;

/// Entry points the host exposes to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open an editing session with an empty draft.
    CreateSnippet,
    /// Open the management session.
    ManageSnippets,
}

impl Command {
    pub fn id(&self) -> &'static str {
        match self {
            Command::CreateSnippet => "open-snippet-modal",
            Command::ManageSnippets => "manage-snippets",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateSnippet => "Create a snippet",
            Command::ManageSnippets => "Insert in note and Manage snippets",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Commit the session opened by [`Command::CreateSnippet`] and tell the user
/// how it went.
pub fn submit_new_snippet(
    session: &mut EditingSession,
    repository: &mut SnippetRepository,
    notifier: &mut dyn Notifier,
) -> Result<Snippet> {
    match session.commit_to(repository) {
        Ok(snippet) => {
            notifier.notify(&format!("Snippet \"{}\" created !", snippet.name));
            Ok(snippet)
        }
        Err(err) => {
            notify_error(notifier, &err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::MessageLog;
    use crate::storage::MemoryStorage;

    #[test]
    fn commands_keep_their_ids_and_names() {
        assert_eq!(Command::CreateSnippet.id(), "open-snippet-modal");
        assert_eq!(Command::ManageSnippets.id(), "manage-snippets");
        assert_eq!(Command::CreateSnippet.to_string(), "Create a snippet");
        assert_eq!(
            Command::ManageSnippets.to_string(),
            "Insert in note and Manage snippets"
        );
    }

    #[test]
    fn creating_notifies_with_the_name() {
        let mut repo = SnippetRepository::open(MemoryStorage::new()).unwrap();
        let mut log = MessageLog::new();
        let mut session = EditingSession::create();
        session.set_name("greet");
        session.set_content("Hello, world!");

        submit_new_snippet(&mut session, &mut repo, &mut log).unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(log.latest(), Some("Snippet \"greet\" created !"));
    }

    #[test]
    fn invalid_create_keeps_session_open() {
        let mut repo = SnippetRepository::open(MemoryStorage::new()).unwrap();
        let mut log = MessageLog::new();
        let mut session = EditingSession::create();

        assert!(submit_new_snippet(&mut session, &mut repo, &mut log).is_err());
        assert!(session.is_open());
        assert!(repo.is_empty());
        assert_eq!(log.latest(), Some("Please fill in all required fields!"));
    }
}
