use std::time::Duration;

use chrono::NaiveDate;
use meteoviz_logging::viz_debug;

use crate::catalog::{Catalog, CatalogEntry, NodeIndex, TreeRow};
use crate::filters::{FilterState, ForecastHour, PressureLevel};
use crate::resolver::{ImageRequest, ResolvedImage, SampleImageResolver};
use crate::Effect;

/// Identifies one loading request. Strictly increasing; only the latest one counts.
pub type RequestToken = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing selected.
    #[default]
    Idle,
    /// Selection or filters changed; waiting for the simulated latency.
    Loading { token: RequestToken },
    /// The image for the current tuple may be shown.
    Ready { token: RequestToken },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetails {
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    #[default]
    Pending,
    Displayed(ImageDetails),
    /// Rendering falls back to the placeholder panel.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadReport {
    Saved { path: String },
    /// Saving failed and the image was handed to the system viewer instead.
    OpenedExternally { url: String, reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Up,
    Down,
    First,
    Last,
}

/// Simulated network latency before a resolved image may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingDelays {
    pub initial_selection: Duration,
    pub filter_change: Duration,
}

impl Default for LoadingDelays {
    fn default() -> Self {
        Self {
            initial_selection: Duration::from_millis(1500),
            filter_change: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    catalog: Catalog,
    resolver: SampleImageResolver,
    delays: LoadingDelays,
    filters: FilterState,
    search_term: String,
    search_focused: bool,
    selected: Option<NodeIndex>,
    load: LoadState,
    last_token: RequestToken,
    image: ImageStatus,
    cursor: usize,
    sidebar_open: bool,
    fullscreen: bool,
    status: Option<String>,
    quit: bool,
    dirty: bool,
}

impl AppState {
    /// Built-in catalog, sample images and default delays; filters start at `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            catalog: Catalog::builtin(),
            resolver: SampleImageResolver::default(),
            delays: LoadingDelays::default(),
            filters: FilterState::new(today),
            search_term: String::new(),
            search_focused: false,
            selected: None,
            load: LoadState::Idle,
            last_token: 0,
            image: ImageStatus::Pending,
            cursor: 0,
            sidebar_open: true,
            fullscreen: false,
            status: None,
            quit: false,
            dirty: true,
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self.selected = None;
        self.cursor = 0;
        self
    }

    pub fn with_resolver(mut self, resolver: SampleImageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_delays(mut self, delays: LoadingDelays) -> Self {
        self.delays = delays;
        self
    }

    pub fn with_initial_filters(mut self, hour: ForecastHour, level: PressureLevel) -> Self {
        self.filters.hour = hour;
        self.filters.level = level;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn image_status(&self) -> &ImageStatus {
        &self.image
    }

    pub fn current_token(&self) -> RequestToken {
        self.last_token
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.selected.and_then(|index| self.catalog.entry(index))
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Locator and filename for the current (node, date, hour, level) tuple.
    pub fn resolved_image(&self) -> Option<ResolvedImage> {
        let entry = self.selected_entry()?;
        Some(self.resolver.resolve(&ImageRequest {
            node_id: &entry.id,
            node_name: &entry.name,
            category: entry.category,
            date: self.filters.date,
            hour: self.filters.hour,
            level: self.filters.level,
        }))
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn visible_rows(&self) -> Vec<TreeRow> {
        self.catalog.visible_rows(&self.search_term)
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn search_focused(&self) -> bool {
        self.search_focused
    }

    pub(crate) fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub(crate) fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn selected_index(&self) -> Option<NodeIndex> {
        self.selected
    }

    fn begin_loading(&mut self, delay: Duration) -> Effect {
        self.last_token += 1;
        let token = self.last_token;
        self.load = LoadState::Loading { token };
        self.image = ImageStatus::Pending;
        viz_debug!("loading started token={token} delay_ms={}", delay.as_millis());
        Effect::ScheduleLoadComplete { token, delay }
    }

    pub(crate) fn select(&mut self, node_id: &str) -> Option<Effect> {
        let index = self.catalog.index_of(node_id)?;
        self.selected = Some(index);
        if let Some(position) = self.visible_rows().iter().position(|row| row.index == index) {
            self.cursor = position;
        }
        self.mark_dirty();
        Some(self.begin_loading(self.delays.initial_selection))
    }

    pub(crate) fn clear_selection(&mut self) -> Option<Effect> {
        self.selected?;
        self.selected = None;
        self.fullscreen = false;
        // Bump the token so anything still in flight is stale.
        self.last_token += 1;
        self.load = LoadState::Idle;
        self.image = ImageStatus::Pending;
        self.mark_dirty();
        Some(Effect::CancelPendingLoad)
    }

    fn filters_changed(&mut self) -> Option<Effect> {
        self.mark_dirty();
        self.selected?;
        Some(self.begin_loading(self.delays.filter_change))
    }

    pub(crate) fn set_date(&mut self, date: NaiveDate) -> Option<Effect> {
        if self.filters.date == date {
            return None;
        }
        self.filters.date = date;
        self.filters_changed()
    }

    pub(crate) fn set_forecast_hour(&mut self, hour: ForecastHour) -> Option<Effect> {
        if self.filters.hour == hour {
            return None;
        }
        self.filters.hour = hour;
        self.filters_changed()
    }

    pub(crate) fn set_pressure_level(&mut self, level: PressureLevel) -> Option<Effect> {
        if self.filters.level == level {
            return None;
        }
        self.filters.level = level;
        self.filters_changed()
    }

    pub(crate) fn complete_loading(&mut self, token: RequestToken) -> Option<Effect> {
        match self.load {
            LoadState::Loading { token: current } if current == token => {}
            other => {
                viz_debug!("ignoring stale load completion token={token} state={other:?}");
                return None;
            }
        }
        let resolved = self.resolved_image()?;
        self.load = LoadState::Ready { token };
        self.mark_dirty();
        Some(Effect::FetchImage {
            token,
            url: resolved.url,
        })
    }

    pub(crate) fn apply_image_outcome(&mut self, token: RequestToken, status: ImageStatus) {
        if self.load != (LoadState::Ready { token }) {
            viz_debug!("ignoring stale image outcome token={token}");
            return;
        }
        self.image = status;
        self.mark_dirty();
    }

    pub(crate) fn toggle_expand(&mut self, node_id: &str) -> bool {
        if !self.catalog.toggle_expand(node_id) {
            return false;
        }
        self.clamp_cursor();
        self.mark_dirty();
        true
    }

    pub(crate) fn set_search_term(&mut self, term: String) {
        if self.search_term == term {
            return;
        }
        self.search_term = term;
        self.cursor = 0;
        self.mark_dirty();
    }

    pub(crate) fn set_search_focused(&mut self, focused: bool) {
        if self.search_focused != focused {
            self.search_focused = focused;
            self.mark_dirty();
        }
    }

    pub(crate) fn move_cursor(&mut self, movement: CursorMove) {
        let row_count = self.visible_rows().len();
        if row_count == 0 {
            return;
        }
        let last = row_count - 1;
        let next = match movement {
            CursorMove::Up => self.cursor.saturating_sub(1),
            CursorMove::Down => (self.cursor + 1).min(last),
            CursorMove::First => 0,
            CursorMove::Last => last,
        };
        if next != self.cursor {
            self.cursor = next;
            self.mark_dirty();
        }
    }

    pub(crate) fn node_under_cursor(&self) -> Option<&CatalogEntry> {
        let row = self.visible_rows().get(self.cursor).copied()?;
        self.catalog.entry(row.index)
    }

    fn clamp_cursor(&mut self) {
        let row_count = self.visible_rows().len();
        self.cursor = self.cursor.min(row_count.saturating_sub(1));
    }

    pub(crate) fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
        self.mark_dirty();
    }

    pub(crate) fn set_fullscreen(&mut self, open: bool) {
        let open = open && self.selected.is_some();
        if self.fullscreen != open {
            self.fullscreen = open;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_status(&mut self, status: String) {
        self.status = Some(status);
        self.mark_dirty();
    }

    pub(crate) fn request_quit(&mut self) {
        self.quit = true;
        self.mark_dirty();
    }
}
