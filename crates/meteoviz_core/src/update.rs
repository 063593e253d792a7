use meteoviz_logging::{viz_debug, viz_info, viz_warn};

use crate::{AppState, DownloadReport, Effect, ImageStatus, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::NodeSelected(node_id) => match state.select(&node_id) {
            Some(effect) => {
                viz_info!("selected node {node_id}");
                vec![effect]
            }
            None => {
                viz_warn!("selection of unknown node {node_id:?} ignored");
                Vec::new()
            }
        },
        Msg::SelectionCleared => state.clear_selection().into_iter().collect(),
        Msg::ExpandToggled(node_id) => {
            if !state.toggle_expand(&node_id) {
                viz_debug!("expand toggle for unknown node {node_id:?} ignored");
            }
            Vec::new()
        }
        Msg::SearchChanged(term) => {
            state.set_search_term(term);
            Vec::new()
        }
        Msg::SearchFocusChanged(focused) => {
            state.set_search_focused(focused);
            Vec::new()
        }
        Msg::DateChanged(date) => state.set_date(date).into_iter().collect(),
        Msg::HourChanged(hour) => state.set_forecast_hour(hour).into_iter().collect(),
        Msg::LevelChanged(level) => state.set_pressure_level(level).into_iter().collect(),
        Msg::LoadDelayElapsed { token } => state.complete_loading(token).into_iter().collect(),
        Msg::ImageLoaded { token, details } => {
            state.apply_image_outcome(token, ImageStatus::Displayed(details));
            Vec::new()
        }
        Msg::ImageFailed { token, reason } => {
            state.apply_image_outcome(token, ImageStatus::Unavailable { reason });
            Vec::new()
        }
        Msg::DownloadRequested => match state.resolved_image() {
            Some(resolved) => {
                state.set_status(format!("Saving {}...", resolved.filename));
                vec![Effect::DownloadImage {
                    url: resolved.url,
                    filename: resolved.filename,
                }]
            }
            None => Vec::new(),
        },
        Msg::DownloadFinished(report) => {
            state.set_status(describe_download(&report));
            Vec::new()
        }
        Msg::ThemeToggled => vec![Effect::ToggleTheme],
        Msg::SidebarToggled => {
            state.toggle_sidebar();
            Vec::new()
        }
        Msg::FullscreenOpened => {
            state.set_fullscreen(true);
            Vec::new()
        }
        Msg::FullscreenClosed => {
            state.set_fullscreen(false);
            Vec::new()
        }
        Msg::CursorMoved(movement) => {
            state.move_cursor(movement);
            Vec::new()
        }
        Msg::CursorActivated => {
            let node_id = state.node_under_cursor().map(|entry| entry.id.clone());
            match node_id {
                Some(node_id) => return update(state, Msg::NodeSelected(node_id)),
                None => Vec::new(),
            }
        }
        Msg::CursorExpandToggled => {
            let node_id = state
                .node_under_cursor()
                .filter(|entry| entry.is_expandable())
                .map(|entry| entry.id.clone());
            if let Some(node_id) = node_id {
                state.toggle_expand(&node_id);
            }
            Vec::new()
        }
        Msg::QuitRequested => {
            state.request_quit();
            vec![Effect::Quit]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn describe_download(report: &DownloadReport) -> String {
    match report {
        DownloadReport::Saved { path } => format!("Saved {path}"),
        DownloadReport::OpenedExternally { url, reason } => {
            format!("Download failed ({reason}); opened {url} in the system viewer")
        }
        DownloadReport::Failed { reason } => format!("Download failed: {reason}"),
    }
}
