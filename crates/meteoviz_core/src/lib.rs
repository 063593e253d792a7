//! MeteoViz core: pure forecast-explorer state machine and view-model helpers.
mod catalog;
mod effect;
mod filters;
mod msg;
mod resolver;
mod state;
mod update;
mod view_model;

pub use catalog::{
    Catalog, CatalogEntry, CatalogError, ImageCategory, NodeIndex, NodeKind, TreeNode, TreeRow,
};
pub use effect::Effect;
pub use filters::{FilterParseError, FilterState, ForecastHour, PressureLevel};
pub use msg::Msg;
pub use resolver::{
    image_filename, ImageRequest, ResolvedImage, SampleImageResolver, RAIN_FORECAST_URL,
    TEMPERATURE_OBSERVATION_URL, WIND_FORECAST_URL,
};
pub use state::{
    AppState, CursorMove, DownloadReport, ImageDetails, ImageStatus, LoadState, LoadingDelays,
    RequestToken,
};
pub use update::update;
pub use view_model::{AppViewModel, ImagePanel, SelectionView, TreeRowView};
