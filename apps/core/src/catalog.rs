use crate::host::{HostError, LauncherHost};
use crate::model::Entry;

/// Known applications, sorted by case-insensitive name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    pub fn from_entries(mut entries: Vec<Entry>) -> Self {
        entries.sort_by(|a, b| {
            a.folded_name()
                .cmp(b.folded_name())
                .then_with(|| a.path.cmp(&b.path))
        });
        Self { entries }
    }

    /// Host failures degrade to an empty catalog; the error is only logged.
    pub fn from_fetch(fetched: Result<Vec<Entry>, HostError>) -> Self {
        match fetched {
            Ok(entries) => {
                let catalog = Self::from_entries(entries);
                tracing::info!(entries = catalog.len(), "catalog loaded");
                catalog
            }
            Err(error) => {
                tracing::error!(%error, "failed to list applications; using empty catalog");
                Self::default()
            }
        }
    }

    pub fn load<H: LauncherHost + ?Sized>(host: &mut H) -> Self {
        Self::from_fetch(host.list_applications())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
