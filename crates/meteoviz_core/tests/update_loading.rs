use std::sync::Once;
use std::time::Duration;

use chrono::NaiveDate;
use meteoviz_core::{
    update, AppState, Effect, ForecastHour, ImageDetails, ImagePanel, ImageStatus, LoadState,
    Msg, PressureLevel, RequestToken, RAIN_FORECAST_URL, WIND_FORECAST_URL,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(meteoviz_logging::initialize_for_tests);
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 16).unwrap()
}

fn select(state: AppState, node_id: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::NodeSelected(node_id.to_string()))
}

fn scheduled_token(effects: &[Effect]) -> RequestToken {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleLoadComplete { token, .. } => Some(*token),
            _ => None,
        })
        .expect("schedule effect")
}

fn png_details() -> ImageDetails {
    ImageDetails {
        format: "Png".to_string(),
        width: 1200,
        height: 900,
        byte_len: 48_213,
    }
}

#[test]
fn selection_schedules_initial_delay() {
    init_logging();
    let (state, effects) = select(AppState::new(today()), "gfs-wind-speed");

    assert_eq!(
        effects,
        vec![Effect::ScheduleLoadComplete {
            token: 1,
            delay: Duration::from_millis(1500),
        }]
    );
    assert_eq!(state.load_state(), LoadState::Loading { token: 1 });
    assert_eq!(
        state.view().panel,
        ImagePanel::Loading {
            node_name: "Wind Speed".to_string()
        }
    );
}

#[test]
fn ready_only_after_delay_elapses() {
    init_logging();
    let (state, effects) = select(AppState::new(today()), "gfs-precip-total");
    let token = scheduled_token(&effects);
    assert!(matches!(state.load_state(), LoadState::Loading { .. }));

    let (state, effects) = update(state, Msg::LoadDelayElapsed { token });
    assert_eq!(state.load_state(), LoadState::Ready { token });
    assert_eq!(
        effects,
        vec![Effect::FetchImage {
            token,
            url: RAIN_FORECAST_URL.to_string(),
        }]
    );

    match state.view().panel {
        ImagePanel::Ready { image, status } => {
            assert_eq!(image.url, RAIN_FORECAST_URL);
            assert_eq!(image.filename, "Total_Precipitation_2025-07-16_0h_1000hPa.png");
            assert_eq!(status, ImageStatus::Pending);
        }
        other => panic!("expected ready panel, got {other:?}"),
    }
}

#[test]
fn second_selection_supersedes_pending_first() {
    init_logging();
    let (state, first) = select(AppState::new(today()), "gfs-precip-total");
    let first_token = scheduled_token(&first);
    let (state, second) = select(state, "gfs-wind-speed");
    let second_token = scheduled_token(&second);
    assert!(second_token > first_token);

    // The first timer fires late; it must not move the state forward.
    let (state, effects) = update(state, Msg::LoadDelayElapsed { token: first_token });
    assert!(effects.is_empty());
    assert_eq!(state.load_state(), LoadState::Loading { token: second_token });

    let (state, effects) = update(state, Msg::LoadDelayElapsed { token: second_token });
    assert_eq!(
        effects,
        vec![Effect::FetchImage {
            token: second_token,
            url: WIND_FORECAST_URL.to_string(),
        }]
    );
    assert_eq!(state.selected_entry().unwrap().id, "gfs-wind-speed");
}

#[test]
fn stale_timer_after_ready_is_ignored() {
    init_logging();
    let (state, first) = select(AppState::new(today()), "gfs-precip-total");
    let first_token = scheduled_token(&first);
    let (state, second) = select(state, "gfs-wind-speed");
    let second_token = scheduled_token(&second);

    let (state, _) = update(state, Msg::LoadDelayElapsed { token: second_token });
    let (state, effects) = update(state, Msg::LoadDelayElapsed { token: first_token });

    assert!(effects.is_empty());
    assert_eq!(state.load_state(), LoadState::Ready { token: second_token });
    assert_eq!(state.resolved_image().unwrap().url, WIND_FORECAST_URL);
}

#[test]
fn stale_image_outcome_is_ignored() {
    init_logging();
    let (state, effects) = select(AppState::new(today()), "gfs-wind-gust");
    let first_token = scheduled_token(&effects);
    let (state, _) = update(state, Msg::LoadDelayElapsed { token: first_token });

    // Hour changes while the first image is still downloading.
    let (state, effects) = update(state, Msg::HourChanged(ForecastHour::new(24).unwrap()));
    let second_token = scheduled_token(&effects);
    let (state, _) = update(
        state,
        Msg::ImageFailed {
            token: first_token,
            reason: "connection reset".to_string(),
        },
    );
    assert_eq!(state.image_status(), &ImageStatus::Pending);

    let (state, _) = update(state, Msg::LoadDelayElapsed { token: second_token });
    let (state, _) = update(
        state,
        Msg::ImageLoaded {
            token: second_token,
            details: png_details(),
        },
    );
    assert_eq!(state.image_status(), &ImageStatus::Displayed(png_details()));
}

#[test]
fn image_failure_shows_placeholder_summary() {
    init_logging();
    let (state, effects) = select(AppState::new(today()), "gfs-temp-2m");
    let token = scheduled_token(&effects);
    let (state, _) = update(state, Msg::LevelChanged(PressureLevel::Hpa850));
    let token = token + 1;
    let (state, _) = update(state, Msg::HourChanged(ForecastHour::new(6).unwrap()));
    let token = token + 1;
    assert_eq!(state.current_token(), token);

    let (state, _) = update(state, Msg::LoadDelayElapsed { token });
    let (state, _) = update(
        state,
        Msg::ImageFailed {
            token,
            reason: "http status 404".to_string(),
        },
    );

    let view = state.view();
    match &view.panel {
        ImagePanel::Ready { status, image } => {
            assert_eq!(
                status,
                &ImageStatus::Unavailable {
                    reason: "http status 404".to_string()
                }
            );
            assert_eq!(image.filename, "2m_Temperature_2025-07-16_6h_850hPa.png");
        }
        other => panic!("expected ready panel, got {other:?}"),
    }
    assert_eq!(
        view.placeholder_summary(),
        vec![
            "Selected: 2m Temperature",
            "Date: 2025-07-16",
            "Hour: +6 hours",
            "Level: 850hPa",
        ]
    );
}

#[test]
fn clearing_selection_returns_to_idle_and_invalidates_pending() {
    init_logging();
    let (state, effects) = select(AppState::new(today()), "wrf-ens-mean");
    let token = scheduled_token(&effects);

    let (state, effects) = update(state, Msg::SelectionCleared);
    assert_eq!(effects, vec![Effect::CancelPendingLoad]);
    assert_eq!(state.load_state(), LoadState::Idle);
    assert_eq!(state.view().panel, ImagePanel::Welcome);

    let (state, effects) = update(state, Msg::LoadDelayElapsed { token });
    assert!(effects.is_empty());
    assert_eq!(state.load_state(), LoadState::Idle);
}

#[test]
fn clearing_without_selection_is_noop() {
    init_logging();
    let state = AppState::new(today());
    let (next, effects) = update(state.clone(), Msg::SelectionCleared);
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn unknown_node_selection_is_ignored() {
    init_logging();
    let mut state = AppState::new(today());
    state.consume_dirty();

    let (mut next, effects) = select(state, "ecmwf-hres");
    assert!(effects.is_empty());
    assert_eq!(next.load_state(), LoadState::Idle);
    assert!(!next.consume_dirty());
}

#[test]
fn reselecting_same_node_restarts_loading() {
    init_logging();
    let (state, first) = select(AppState::new(today()), "imd-cyclone-track");
    let (state, _) = update(state, Msg::LoadDelayElapsed { token: scheduled_token(&first) });

    let (state, again) = select(state, "imd-cyclone-track");
    let token = scheduled_token(&again);
    assert_eq!(token, 2);
    assert_eq!(state.load_state(), LoadState::Loading { token });
}
