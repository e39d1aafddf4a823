use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::contract::AppRecord;
use crate::events::{HostTopic, ListenerId, ListenerTable};
use crate::model::Entry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A call the core made into the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    OpenApplication { path: String },
    HideWindow,
}

/// The shell around the launcher: app enumeration, process spawning and the
/// native window all live behind this trait.
pub trait LauncherHost {
    fn list_applications(&mut self) -> Result<Vec<Entry>, HostError>;
    fn open_application(&mut self, path: &str);
    fn hide_window(&mut self);
    fn subscribe(&mut self, topic: HostTopic) -> ListenerId;
    fn unsubscribe(&mut self, id: ListenerId);
}

impl<H: LauncherHost + ?Sized> LauncherHost for &mut H {
    fn list_applications(&mut self) -> Result<Vec<Entry>, HostError> {
        (**self).list_applications()
    }

    fn open_application(&mut self, path: &str) {
        (**self).open_application(path)
    }

    fn hide_window(&mut self) {
        (**self).hide_window()
    }

    fn subscribe(&mut self, topic: HostTopic) -> ListenerId {
        (**self).subscribe(topic)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        (**self).unsubscribe(id)
    }
}

/// Hosts that buffer their outgoing calls instead of performing them.
pub trait CallLog {
    fn drain_calls(&mut self) -> Vec<HostCall>;
}

/// In-memory host that records every call made into it.
#[derive(Debug, Default)]
pub struct RecordingHost {
    apps: Vec<Entry>,
    failure: Option<String>,
    calls: Vec<HostCall>,
    listeners: ListenerTable,
    list_requests: usize,
}

impl RecordingHost {
    pub fn with_apps(apps: Vec<Entry>) -> Self {
        Self {
            apps,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn deterministic_fixture() -> Self {
        Self::with_apps(vec![
            Entry::new("Terminal", "/c"),
            Entry::new("Calculator", "/a"),
            Entry::new("Calendar", "/b"),
        ])
    }

    pub fn set_apps(&mut self, apps: Vec<Entry>) {
        self.apps = apps;
        self.failure = None;
    }

    pub fn set_failure(&mut self, message: Option<&str>) {
        self.failure = message.map(str::to_string);
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn list_requests(&self) -> usize {
        self.list_requests
    }

    pub fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }
}

impl LauncherHost for RecordingHost {
    fn list_applications(&mut self) -> Result<Vec<Entry>, HostError> {
        self.list_requests += 1;
        match &self.failure {
            Some(message) => Err(HostError::new(message.clone())),
            None => Ok(self.apps.clone()),
        }
    }

    fn open_application(&mut self, path: &str) {
        self.calls.push(HostCall::OpenApplication {
            path: path.to_string(),
        });
    }

    fn hide_window(&mut self) {
        self.calls.push(HostCall::HideWindow);
    }

    fn subscribe(&mut self, topic: HostTopic) -> ListenerId {
        self.listeners.register(topic)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.unregister(id);
    }
}

impl CallLog for RecordingHost {
    fn drain_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }
}

/// Host backed by a JSON catalog file (`[{"name": .., "path": ..}]`).
///
/// The file is re-read on every `list_applications`, so editing it and
/// sending `catalog_changed` picks up the new set.
#[derive(Debug)]
pub struct CatalogFileHost {
    catalog_path: PathBuf,
    pending: Vec<HostCall>,
    listeners: ListenerTable,
}

impl CatalogFileHost {
    pub fn new(catalog_path: PathBuf) -> Self {
        Self {
            catalog_path,
            pending: Vec::new(),
            listeners: ListenerTable::default(),
        }
    }

    pub fn catalog_path(&self) -> &std::path::Path {
        &self.catalog_path
    }
}

impl LauncherHost for CatalogFileHost {
    fn list_applications(&mut self) -> Result<Vec<Entry>, HostError> {
        let raw = std::fs::read_to_string(&self.catalog_path).map_err(|e| {
            HostError::new(format!(
                "failed to read catalog {}: {e}",
                self.catalog_path.display()
            ))
        })?;
        let records: Vec<AppRecord> = serde_json::from_str(&raw)
            .map_err(|e| HostError::new(format!("invalid catalog json: {e}")))?;
        Ok(records.into_iter().map(Entry::from).collect())
    }

    fn open_application(&mut self, path: &str) {
        self.pending.push(HostCall::OpenApplication {
            path: path.to_string(),
        });
    }

    fn hide_window(&mut self) {
        self.pending.push(HostCall::HideWindow);
    }

    fn subscribe(&mut self, topic: HostTopic) -> ListenerId {
        self.listeners.register(topic)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.unregister(id);
    }
}

impl CallLog for CatalogFileHost {
    fn drain_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.pending)
    }
}
