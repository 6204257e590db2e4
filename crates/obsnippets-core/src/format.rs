use crate::models::{Category, Snippet};

pub const FENCE: &str = "```";

/// Render a snippet into the text that gets inserted into a document.
///
/// Code snippets become a fenced block tagged with their language; text
/// snippets are returned verbatim.
pub fn format_snippet(snippet: &Snippet) -> String {
    match snippet.category {
        Category::Code => {
            let info = snippet
                .language
                .as_ref()
                .map(|language| language.as_str())
                .unwrap_or_default();
            format!("{FENCE}{info}\n{}\n{FENCE}", snippet.content)
        }
        Category::Text => snippet.content.clone(),
    }
}
