use crate::catalog::Catalog;
use crate::config::Config;
use crate::events::Subscriptions;
use crate::host::{HostError, LauncherHost};
use crate::model::{Entry, SearchResult};
use crate::search::{search_with_threshold, DEFAULT_THRESHOLD};
use crate::selection::{Selection, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub match_threshold: u32,
    pub visible_rows: usize,
    pub reset_on_blur: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_THRESHOLD,
            visible_rows: 8,
            reset_on_blur: false,
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(value: &Config) -> Self {
        Self {
            match_threshold: u32::from(value.match_threshold),
            visible_rows: usize::from(value.visible_rows),
            reset_on_blur: value.reset_on_blur,
        }
    }
}

/// Identifies one catalog fetch. Only the most recently issued ticket may
/// replace the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
}

/// Owns the query and catalog, and keeps results, selection and scroll
/// position consistent with them.
pub struct Session<H: LauncherHost> {
    host: H,
    options: SessionOptions,
    catalog: Catalog,
    query: String,
    results: Vec<SearchResult>,
    selection: Selection,
    viewport: Viewport,
    issued_refresh: u64,
    subscriptions: Subscriptions,
}

impl<H: LauncherHost> Session<H> {
    /// Registers host listeners and performs the initial catalog load.
    pub fn start(mut host: H, options: SessionOptions) -> Self {
        let subscriptions = Subscriptions::acquire(&mut host);
        let mut session = Self {
            host,
            options,
            catalog: Catalog::default(),
            query: String::new(),
            results: Vec::new(),
            selection: Selection::default(),
            viewport: Viewport::new(options.visible_rows),
            issued_refresh: 0,
            subscriptions,
        };
        session.on_catalog_notification();
        session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selection.activate(&self.results)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
        self.recompute();
    }

    pub fn on_arrow_down(&mut self) {
        if self.selection.move_down() {
            self.follow_selection();
        }
    }

    pub fn on_arrow_up(&mut self) {
        if self.selection.move_up() {
            self.follow_selection();
        }
    }

    /// Launches the selected entry and hides the window. Returns the entry
    /// that was launched, if any.
    pub fn on_enter(&mut self) -> Option<Entry> {
        let Some(entry) = self.selection.activate(&self.results).cloned() else {
            tracing::debug!(query = %self.query, "enter with no selection");
            return None;
        };

        tracing::info!(name = %entry.name, path = %entry.path, "launching application");
        self.host.open_application(&entry.path);
        self.host.hide_window();
        Some(entry)
    }

    /// Pointer click on a rendered row: select it, then launch it.
    pub fn on_result_clicked(&mut self, index: usize) -> Option<Entry> {
        if !self.selection.set_selected(index) {
            return None;
        }
        self.follow_selection();
        self.on_enter()
    }

    pub fn on_window_blur(&mut self) {
        self.host.hide_window();
        if self.options.reset_on_blur {
            self.reset_view();
        }
    }

    pub fn on_escape(&mut self) {
        self.on_window_blur();
    }

    pub fn on_window_focus(&mut self) {
        self.reset_view();
    }

    /// Synchronous refresh: fetch from the host and apply immediately.
    pub fn on_catalog_notification(&mut self) {
        let ticket = self.begin_refresh();
        let fetched = self.host.list_applications();
        self.complete_refresh(ticket, fetched);
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued_refresh += 1;
        RefreshTicket {
            generation: self.issued_refresh,
        }
    }

    /// Applies a finished fetch. Returns false when the ticket is stale and
    /// the response was dropped.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        fetched: Result<Vec<Entry>, HostError>,
    ) -> bool {
        if ticket.generation != self.issued_refresh {
            tracing::warn!(
                generation = ticket.generation,
                latest = self.issued_refresh,
                "discarding stale catalog response"
            );
            return false;
        }

        self.catalog = Catalog::from_fetch(fetched);
        self.recompute();
        self.selection.reset();
        self.viewport.reset();
        true
    }

    fn reset_view(&mut self) {
        self.query.clear();
        self.recompute();
        self.selection.reset();
        self.viewport.reset();
    }

    fn recompute(&mut self) {
        self.results =
            search_with_threshold(&self.catalog, &self.query, self.options.match_threshold);
        self.selection.on_results_changed(self.results.len());
        self.viewport.clamp(self.results.len());
        self.follow_selection();
    }

    fn follow_selection(&mut self) {
        if let Some(index) = self.selection.selected() {
            self.viewport.ensure_visible(index);
        }
    }
}

impl<H: LauncherHost> Drop for Session<H> {
    fn drop(&mut self) {
        self.subscriptions.release(&mut self.host);
    }
}
