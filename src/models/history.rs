//! Records exchanged with a history provider.
//!
//! Shapes follow the browser history API: a `HistoryEntry` per distinct URL
//! and a `VisitEntry` per individual visit to it. All times are epoch ms.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub last_visit_time: i64,
    #[serde(default)]
    pub visit_count: u32,
    #[serde(default)]
    pub typed_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitEntry {
    pub visit_id: String,
    pub visit_time: i64,
    #[serde(default)]
    pub referring_visit_id: Option<String>,
    #[serde(default, alias = "transition")]
    pub transition_type: TransitionType,
}

/// How the browser arrived at a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionType {
    #[default]
    Link,
    Typed,
    AutoBookmark,
    AutoSubframe,
    ManualSubframe,
    Generated,
    AutoToplevel,
    FormSubmit,
    Reload,
    Keyword,
    KeywordGenerated,
}

impl TransitionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionType::Link => "link",
            TransitionType::Typed => "typed",
            TransitionType::AutoBookmark => "auto_bookmark",
            TransitionType::AutoSubframe => "auto_subframe",
            TransitionType::ManualSubframe => "manual_subframe",
            TransitionType::Generated => "generated",
            TransitionType::AutoToplevel => "auto_toplevel",
            TransitionType::FormSubmit => "form_submit",
            TransitionType::Reload => "reload",
            TransitionType::Keyword => "keyword",
            TransitionType::KeywordGenerated => "keyword_generated",
        }
    }

    /// Decode the core type stored in the low byte of Chrome's `visits.transition`.
    /// Unknown core values are treated as links.
    pub fn from_chrome_core(raw: i64) -> Self {
        match raw & 0xFF {
            1 => TransitionType::Typed,
            2 => TransitionType::AutoBookmark,
            3 => TransitionType::AutoSubframe,
            4 => TransitionType::ManualSubframe,
            5 => TransitionType::Generated,
            6 => TransitionType::AutoToplevel,
            7 => TransitionType::FormSubmit,
            8 => TransitionType::Reload,
            9 => TransitionType::Keyword,
            10 => TransitionType::KeywordGenerated,
            _ => TransitionType::Link,
        }
    }
}

/// Query passed to [`crate::provider::HistoryProvider::search`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Substring matched against url and title; empty matches everything.
    pub text: String,
    pub max_results: usize,
    /// Only entries last visited at or after this instant.
    pub start_time: i64,
}
