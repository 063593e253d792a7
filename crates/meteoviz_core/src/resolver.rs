//! Maps a selection plus filters to a displayable image locator and a download filename.
//!
//! The sample resolver stands in for a real forecast-image service: the URL depends
//! only on the node's declared category (and the hour, for unclassified nodes). The
//! date only shapes the filename.

use chrono::NaiveDate;

use crate::catalog::ImageCategory;
use crate::filters::{ForecastHour, PressureLevel};

pub const WIND_FORECAST_URL: &str =
    "https://nwp.ncmrwf.gov.in/Data/mihir/2025-07-16/00/UM-Reg4Km/Wind-Forecast/reg_pf0_200.png";
pub const RAIN_FORECAST_URL: &str =
    "https://nwp.ncmrwf.gov.in/Data/mihir/2025-07-16/00/UM-Reg4Km/Rain-Forecast/reg_rf1.png";
pub const TEMPERATURE_OBSERVATION_URL: &str =
    "https://nwp.ncmrwf.gov.in/Obs_Temp/imd_obs7_Tmax.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRequest<'a> {
    pub node_id: &'a str,
    pub node_name: &'a str,
    pub category: ImageCategory,
    pub date: NaiveDate,
    pub hour: ForecastHour,
    pub level: PressureLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub filename: String,
}

/// Three fixed sample images: wind forecast, rain forecast, temperature observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleImageResolver {
    images: [String; 3],
}

impl Default for SampleImageResolver {
    fn default() -> Self {
        Self {
            images: [
                WIND_FORECAST_URL.to_string(),
                RAIN_FORECAST_URL.to_string(),
                TEMPERATURE_OBSERVATION_URL.to_string(),
            ],
        }
    }
}

impl SampleImageResolver {
    /// Images in order: wind, rain, temperature. Unclassified nodes rotate through them by hour.
    pub fn with_images(wind: String, rain: String, temperature: String) -> Self {
        Self {
            images: [wind, rain, temperature],
        }
    }

    pub fn images(&self) -> &[String; 3] {
        &self.images
    }

    pub fn resolve(&self, request: &ImageRequest<'_>) -> ResolvedImage {
        let slot = match request.category {
            ImageCategory::Wind => 0,
            ImageCategory::Precipitation => 1,
            ImageCategory::Temperature => 2,
            ImageCategory::Unclassified => usize::from(request.hour.hours()) % self.images.len(),
        };
        ResolvedImage {
            url: self.images[slot].clone(),
            filename: image_filename(request.node_name, request.date, request.hour, request.level),
        }
    }

    /// Resolves with the category inferred from the id text rather than declared.
    pub fn resolve_by_id(
        &self,
        node_id: &str,
        node_name: &str,
        date: NaiveDate,
        hour: ForecastHour,
        level: PressureLevel,
    ) -> ResolvedImage {
        self.resolve(&ImageRequest {
            node_id,
            node_name,
            category: ImageCategory::infer_from_id(node_id),
            date,
            hour,
            level,
        })
    }
}

/// `{name}_{YYYY-MM-DD}_{hour}h_{level}.png`, whitespace runs in the name collapsed to `_`.
pub fn image_filename(
    node_name: &str,
    date: NaiveDate,
    hour: ForecastHour,
    level: PressureLevel,
) -> String {
    let mut name = String::with_capacity(node_name.len());
    let mut in_whitespace = false;
    for c in node_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                name.push('_');
            }
            in_whitespace = true;
        } else {
            name.push(c);
            in_whitespace = false;
        }
    }
    format!("{name}_{}_{hour}h_{level}.png", date.format("%Y-%m-%d"))
}
