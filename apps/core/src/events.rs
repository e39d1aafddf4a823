use serde::{Deserialize, Serialize};

use crate::host::LauncherHost;

/// Inbound host notifications the session listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostTopic {
    CatalogChanged,
    WindowFocused,
    WindowBlurred,
}

impl HostTopic {
    pub const ALL: [HostTopic; 3] = [
        HostTopic::CatalogChanged,
        HostTopic::WindowFocused,
        HostTopic::WindowBlurred,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CatalogChanged => "catalog-changed",
            Self::WindowFocused => "window-focused",
            Self::WindowBlurred => "window-blurred",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Bookkeeping for hosts that hand out listener ids.
#[derive(Debug, Default)]
pub struct ListenerTable {
    next_id: u64,
    active: Vec<(ListenerId, HostTopic)>,
}

impl ListenerTable {
    pub fn register(&mut self, topic: HostTopic) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.active.push((id, topic));
        id
    }

    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.active.len();
        self.active.retain(|(active_id, _)| *active_id != id);
        self.active.len() != before
    }

    pub fn active(&self) -> &[(ListenerId, HostTopic)] {
        &self.active
    }

    pub fn count(&self, topic: HostTopic) -> usize {
        self.active.iter().filter(|(_, t)| *t == topic).count()
    }
}

/// Listener ids held by one session. Released exactly once.
#[derive(Debug, Default)]
pub struct Subscriptions {
    ids: Vec<ListenerId>,
}

impl Subscriptions {
    pub fn acquire<H: LauncherHost + ?Sized>(host: &mut H) -> Self {
        let ids = HostTopic::ALL
            .iter()
            .map(|topic| {
                let id = host.subscribe(*topic);
                tracing::debug!(topic = topic.as_str(), id = id.0, "listener registered");
                id
            })
            .collect();
        Self { ids }
    }

    pub fn release<H: LauncherHost + ?Sized>(&mut self, host: &mut H) {
        for id in self.ids.drain(..) {
            host.unsubscribe(id);
            tracing::debug!(id = id.0, "listener released");
        }
    }
}
