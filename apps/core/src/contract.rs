use serde::{Deserialize, Serialize};

use crate::host::LauncherHost;
use crate::model::{Entry, MatchSpan, SearchResult};
use crate::session::Session;

/// Application record as the host serializes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppRecord {
    pub name: String,
    pub path: String,
}

impl From<AppRecord> for Entry {
    fn from(value: AppRecord) -> Self {
        Entry::from_owned(value.name, value.path)
    }
}

/// Input and window events the host forwards to the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum HostEvent {
    QueryChanged { query: String },
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    ResultClicked { index: usize },
    WindowFocused,
    WindowBlurred,
    CatalogChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub path: String,
    pub spans: Vec<MatchSpan>,
}

impl From<&SearchResult> for ResultRow {
    fn from(value: &SearchResult) -> Self {
        Self {
            name: value.entry.name.clone(),
            path: value.entry.path.clone(),
            spans: value.spans.clone(),
        }
    }
}

/// What the render layer needs to draw the launcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub rows: Vec<ResultRow>,
    pub selected: Option<usize>,
    pub scroll_top: usize,
}

impl ViewState {
    pub fn capture<H: LauncherHost>(session: &Session<H>) -> Self {
        Self {
            query: session.query().to_string(),
            rows: session.results().iter().map(ResultRow::from).collect(),
            selected: session.selected(),
            scroll_top: session.viewport().scroll_top(),
        }
    }
}
