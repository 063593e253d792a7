use chrono::NaiveDate;

use crate::{CursorMove, DownloadReport, ForecastHour, ImageDetails, PressureLevel, RequestToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User selected a catalog node by id.
    NodeSelected(String),
    /// Selection reset; returns the explorer to the welcome panel.
    SelectionCleared,
    /// User clicked the expand/collapse affordance of a node.
    ExpandToggled(String),
    /// Search box text changed (full text, not a delta).
    SearchChanged(String),
    /// Search box gained or lost keyboard focus.
    SearchFocusChanged(bool),
    DateChanged(NaiveDate),
    HourChanged(ForecastHour),
    LevelChanged(PressureLevel),
    /// Simulated latency for `token` has passed.
    LoadDelayElapsed { token: RequestToken },
    /// Image for `token` was fetched and decoded.
    ImageLoaded {
        token: RequestToken,
        details: ImageDetails,
    },
    /// Image for `token` could not be fetched or decoded.
    ImageFailed { token: RequestToken, reason: String },
    /// User asked to save the current image.
    DownloadRequested,
    /// Export finished, one way or another.
    DownloadFinished(DownloadReport),
    ThemeToggled,
    SidebarToggled,
    FullscreenOpened,
    FullscreenClosed,
    /// Keyboard cursor over the visible tree rows.
    CursorMoved(CursorMove),
    /// Select the node under the cursor.
    CursorActivated,
    /// Expand or collapse the node under the cursor.
    CursorExpandToggled,
    QuitRequested,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for unmapped input.
    NoOp,
}
