use chrono::NaiveDate;
use meteoviz_core::{
    image_filename, Catalog, ForecastHour, ImageRequest, PressureLevel, SampleImageResolver,
    RAIN_FORECAST_URL, TEMPERATURE_OBSERVATION_URL, WIND_FORECAST_URL,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 16).unwrap()
}

fn hour(hours: u16) -> ForecastHour {
    ForecastHour::new(hours).unwrap()
}

/// Resolves through the catalog's declared category, the way the explorer does.
fn resolve_declared(node_id: &str, hours: u16, level: PressureLevel) -> String {
    let catalog = Catalog::builtin();
    let entry = catalog.get(node_id).unwrap();
    SampleImageResolver::default()
        .resolve(&ImageRequest {
            node_id: &entry.id,
            node_name: &entry.name,
            category: entry.category,
            date: date(),
            hour: hour(hours),
            level,
        })
        .url
}

#[test]
fn wind_nodes_resolve_to_wind_forecast_regardless_of_filters() {
    for hours in [0, 18, 168] {
        for level in [PressureLevel::Hpa1000, PressureLevel::Hpa200] {
            assert_eq!(resolve_declared("gfs-wind-speed", hours, level), WIND_FORECAST_URL);
        }
    }
}

#[test]
fn precipitation_nodes_resolve_to_rain_forecast() {
    assert_eq!(
        resolve_declared("gfs-precip-total", 24, PressureLevel::Hpa850),
        RAIN_FORECAST_URL
    );
}

#[test]
fn imd_nodes_resolve_to_temperature_observation() {
    assert_eq!(
        resolve_declared("imd-monsoon-onset", 6, PressureLevel::Hpa500),
        TEMPERATURE_OBSERVATION_URL
    );
}

#[test]
fn unclassified_nodes_fall_back_to_hour_rotation() {
    assert_eq!(
        resolve_declared("wrf-ens-mean", 72, PressureLevel::Hpa300),
        WIND_FORECAST_URL
    );
}

#[test]
fn id_based_resolution_matches_declared_categories() {
    let resolver = SampleImageResolver::default();
    let catalog = Catalog::builtin();
    for node in catalog.to_forest().iter().flat_map(|product| {
        std::iter::once(product).chain(product.children.iter().flat_map(|category| {
            std::iter::once(category).chain(category.children.iter())
        }))
    }) {
        let by_id = resolver.resolve_by_id(&node.id, &node.name, date(), hour(12), PressureLevel::Hpa700);
        assert_eq!(
            by_id.url,
            resolve_declared(&node.id, 12, PressureLevel::Hpa700),
            "node {}",
            node.id
        );
    }
}

#[test]
fn filename_follows_name_date_hour_level() {
    assert_eq!(
        image_filename("2m Temperature", date(), hour(6), PressureLevel::Hpa850),
        "2m_Temperature_2025-07-16_6h_850hPa.png"
    );
}

#[test]
fn resolve_is_idempotent() {
    let resolver = SampleImageResolver::default();
    let first = resolver.resolve_by_id("gfs-temp-2m", "2m Temperature", date(), hour(48), PressureLevel::Hpa925);
    let second = resolver.resolve_by_id("gfs-temp-2m", "2m Temperature", date(), hour(48), PressureLevel::Hpa925);
    assert_eq!(first, second);
    assert_eq!(first.filename, "2m_Temperature_2025-07-16_48h_925hPa.png");
}

#[test]
fn date_only_changes_the_filename() {
    let resolver = SampleImageResolver::default();
    let later = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
    let a = resolver.resolve_by_id("wrf-ens-spread", "Ensemble Spread", date(), hour(0), PressureLevel::Hpa100);
    let b = resolver.resolve_by_id("wrf-ens-spread", "Ensemble Spread", later, hour(0), PressureLevel::Hpa100);
    assert_eq!(a.url, b.url);
    assert_eq!(b.filename, "Ensemble_Spread_2025-12-01_0h_100hPa.png");
}
