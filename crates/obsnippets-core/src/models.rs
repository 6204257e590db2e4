use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier handed out when a snippet is first created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnippetId(Uuid);

impl SnippetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SnippetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Text,
    Code,
}

impl Category {
    /// Order in which categories are listed to the user.
    pub const DISPLAY_ORDER: [Category; 2] = [Category::Text, Category::Code];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Code => "code",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Text => "Text",
            Category::Code => "Code",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Category::Text => Category::Code,
            Category::Code => Category::Text,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language tag of a code snippet, used as the fence info string.
///
/// Names outside the built-in set are kept as-is in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    JavaScript,
    Python,
    Html,
    Css,
    Markdown,
    Other(String),
}

impl Language {
    pub const SUPPORTED: [Language; 5] = [
        Language::JavaScript,
        Language::Python,
        Language::Html,
        Language::Css,
        Language::Markdown,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Html => "html",
            Language::Css => "css",
            Language::Markdown => "markdown",
            Language::Other(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Markdown => "Markdown",
            Language::Other(name) => name,
        }
    }
}

impl From<String> for Language {
    fn from(name: String) -> Self {
        match name.as_str() {
            "javascript" => Language::JavaScript,
            "python" => Language::Python,
            "html" => Language::Html,
            "css" => Language::Css,
            "markdown" => Language::Markdown,
            _ => Language::Other(name),
        }
    }
}

impl From<&str> for Language {
    fn from(name: &str) -> Self {
        Language::from(name.to_string())
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        match language {
            Language::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    #[serde(default)]
    pub id: SnippetId,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(alias = "type")]
    pub category: Category,
    #[serde(default, deserialize_with = "deserialize_language")]
    pub language: Option<Language>,
}

impl Snippet {
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        category: Category,
        language: Option<Language>,
    ) -> Self {
        Self {
            id: SnippetId::new(),
            name: name.into(),
            content: content.into(),
            category,
            language,
        }
    }

    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(name, content, Category::Text, None)
    }

    pub fn code(
        name: impl Into<String>,
        language: impl Into<Language>,
        content: impl Into<String>,
    ) -> Self {
        Self::new(name, content, Category::Code, Some(language.into()))
    }

    /// Check the commit-time invariants.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate_fields(&self.name, self.category, &self.content)
    }
}

/// Shared by snippets and editing drafts.
///
/// Content emptiness is only checked for text snippets; an empty code block is
/// accepted.
pub fn validate_fields(
    name: &str,
    category: Category,
    content: &str,
) -> std::result::Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if category == Category::Text && content.trim().is_empty() {
        return Err(ValidationError::EmptyTextContent);
    }
    Ok(())
}

// Older stores write an empty string when no language was picked.
fn deserialize_language<'de, D>(deserializer: D) -> std::result::Result<Option<Language>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|name| !name.trim().is_empty())
        .map(Language::from))
}
