use crate::catalog::NodeKind;
use crate::filters::FilterState;
use crate::resolver::ResolvedImage;
use crate::{AppState, ImageStatus, LoadState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRowView {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    /// Whether to draw an expand/collapse affordance.
    pub expandable: bool,
    pub expanded: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePanel {
    Welcome,
    Loading { node_name: String },
    Ready {
        image: ResolvedImage,
        status: ImageStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub rows: Vec<TreeRowView>,
    pub cursor: Option<usize>,
    pub search_term: String,
    pub search_focused: bool,
    pub filters: FilterState,
    pub selection: Option<SelectionView>,
    pub panel: ImagePanel,
    pub sidebar_open: bool,
    pub fullscreen: bool,
    pub status: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    /// `Wind Speed | Jul 16, 2025 | +6h | 850hPa`
    pub fn caption(&self) -> Option<String> {
        let selection = self.selection.as_ref()?;
        Some(format!(
            "{} | {} | +{}h | {}",
            selection.name,
            self.filters.date.format("%b %d, %Y"),
            self.filters.hour,
            self.filters.level
        ))
    }

    /// Lines shown in place of an image that failed to load.
    pub fn placeholder_summary(&self) -> Vec<String> {
        let Some(selection) = self.selection.as_ref() else {
            return Vec::new();
        };
        vec![
            format!("Selected: {}", selection.name),
            format!("Date: {}", self.filters.date.format("%Y-%m-%d")),
            format!("Hour: +{} hours", self.filters.hour),
            format!("Level: {}", self.filters.level),
        ]
    }
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        let selected_index = self.selected_index();
        let rows: Vec<TreeRowView> = self
            .visible_rows()
            .into_iter()
            .filter_map(|row| {
                let entry = self.catalog().entry(row.index)?;
                Some(TreeRowView {
                    id: entry.id.clone(),
                    name: entry.name.clone(),
                    kind: entry.kind,
                    depth: row.depth,
                    expandable: entry.is_expandable(),
                    expanded: entry.expanded,
                    selected: selected_index == Some(row.index),
                })
            })
            .collect();
        let cursor = (!rows.is_empty()).then(|| self.cursor().min(rows.len() - 1));

        let selection = self.selected_entry().map(|entry| SelectionView {
            id: entry.id.clone(),
            name: entry.name.clone(),
            kind: entry.kind,
        });

        let panel = match (self.load_state(), &selection, self.resolved_image()) {
            (LoadState::Ready { .. }, Some(_), Some(image)) => ImagePanel::Ready {
                image,
                status: self.image_status().clone(),
            },
            (LoadState::Loading { .. }, Some(selection), _) => ImagePanel::Loading {
                node_name: selection.name.clone(),
            },
            _ => ImagePanel::Welcome,
        };

        AppViewModel {
            rows,
            cursor,
            search_term: self.search_term().to_string(),
            search_focused: self.search_focused(),
            filters: *self.filters(),
            selection,
            panel,
            sidebar_open: self.sidebar_open(),
            fullscreen: self.fullscreen(),
            status: self.status().map(str::to_string),
            dirty: self.is_dirty(),
        }
    }
}
