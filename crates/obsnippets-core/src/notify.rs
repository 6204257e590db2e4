use crate::error::ObsnippetsError;
use tracing::info;

/// Fire-and-forget, user-visible messages.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Tell the user about a failed operation. Validation failures get the
/// short "fill in the fields" message, everything else its description.
pub fn notify_error(notifier: &mut dyn Notifier, err: &ObsnippetsError) {
    match err {
        ObsnippetsError::Validation(reason) => notifier.notify(reason.user_message()),
        ObsnippetsError::NoActiveDocument => {
            notifier.notify("Open a document before inserting a snippet")
        }
        other => notifier.notify(&other.to_string()),
    }
}

/// Sends notifications to the log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) {
        info!(target: "obsnippets::notice", "{}", message);
    }
}

/// Keeps notifications around so a UI can show them.
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Notifier for MessageLog {
    fn notify(&mut self, message: &str) {
        info!(target: "obsnippets::notice", "{}", message);
        self.messages.push(message.to_string());
    }
}
