use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use meteoviz_core::{
    Catalog, CatalogError, ForecastHour, LoadingDelays, PressureLevel, SampleImageResolver,
    TreeNode,
};
use meteoviz_engine::{EngineConfig, FetchSettings};
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application settings. Every field may be omitted from the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub log: LogDestination,
    pub loading: LoadingConfig,
    pub fetch: FetchConfig,
    pub forecast_hour: ForecastHour,
    pub pressure_level: PressureLevel,
    pub sample_images: Option<SampleImages>,
    /// Replaces the built-in product tree when present.
    pub catalog: Option<Vec<TreeNode>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
            log: LogDestination::default(),
            loading: LoadingConfig::default(),
            fetch: FetchConfig::default(),
            forecast_hour: ForecastHour::default(),
            pressure_level: PressureLevel::default(),
            sample_images: None,
            catalog: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadingConfig {
    pub initial_selection_ms: u64,
    pub filter_change_ms: u64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        let delays = LoadingDelays::default();
        Self {
            initial_selection_ms: delays.initial_selection.as_millis() as u64,
            filter_change_ms: delays.filter_change.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            max_bytes: settings.max_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SampleImages {
    pub wind: String,
    pub rain: String,
    pub temperature: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults { missing: PathBuf },
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "loaded config from {}", path.display()),
            ConfigSource::Defaults { missing } => {
                write!(f, "no config at {}; using defaults", missing.display())
            }
        }
    }
}

/// Read `path`, falling back to defaults only when the file does not exist.
pub fn load_config(path: &Path) -> Result<(AppConfig, ConfigSource), ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok((
                AppConfig::default(),
                ConfigSource::Defaults {
                    missing: path.to_path_buf(),
                },
            ));
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let config = parse_config(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((config, ConfigSource::File(path.to_path_buf())))
}

pub fn parse_config(text: &str) -> Result<AppConfig, ron::error::SpannedError> {
    ron::from_str(text)
}

impl AppConfig {
    pub fn apply_overrides(&mut self, output_dir: Option<PathBuf>, log: Option<LogDestination>) {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(log) = log {
            self.log = log;
        }
    }

    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        match &self.catalog {
            Some(forest) => Ok(Catalog::from_forest(forest.clone())?),
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn resolver(&self) -> SampleImageResolver {
        match &self.sample_images {
            Some(images) => SampleImageResolver::with_images(
                images.wind.clone(),
                images.rain.clone(),
                images.temperature.clone(),
            ),
            None => SampleImageResolver::default(),
        }
    }

    pub fn delays(&self) -> LoadingDelays {
        LoadingDelays {
            initial_selection: Duration::from_millis(self.loading.initial_selection_ms),
            filter_change: Duration::from_millis(self.loading.filter_change_ms),
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.fetch.request_timeout_secs),
                max_bytes: self.fetch.max_bytes,
                ..FetchSettings::default()
            },
            output_dir: self.output_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteoviz_core::{NodeKind, WIND_FORECAST_URL};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ron");
        let (config, source) = load_config(&path).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(source, ConfigSource::Defaults { missing: path });
        assert_eq!(config.delays(), LoadingDelays::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse_config(
            r#"(
                output_dir: "charts",
                log: off,
                loading: (filter_change_ms: 250),
                forecast_hour: 24,
                pressure_level: "850hPa",
            )"#,
        )
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("charts"));
        assert_eq!(config.log, LogDestination::Off);
        assert_eq!(config.loading.initial_selection_ms, 1500);
        assert_eq!(config.delays().filter_change, Duration::from_millis(250));
        assert_eq!(config.forecast_hour, ForecastHour::new(24).unwrap());
        assert_eq!(config.pressure_level, PressureLevel::Hpa850);
        assert_eq!(config.fetch, FetchConfig::default());
    }

    #[test]
    fn unsupported_forecast_hour_is_rejected() {
        assert!(parse_config("(forecast_hour: 5)").is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.ron");
        fs::write(&path, "(output_dir: ").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn custom_catalog_and_images_replace_builtins() {
        let config = parse_config(
            r#"(
                sample_images: Some((wind: "w.png", rain: "r.png", temperature: "t.png")),
                catalog: Some([
                    (id: "ecmwf", name: "ECMWF", kind: product, children: [
                        (id: "ecmwf-wind", name: "Wind", kind: variable),
                    ]),
                ]),
            )"#,
        )
        .unwrap();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("ecmwf").unwrap().kind, NodeKind::Product);
        assert_eq!(config.resolver().images()[0], "w.png");
    }

    #[test]
    fn duplicate_catalog_ids_are_rejected() {
        let config = parse_config(
            r#"(catalog: Some([
                (id: "a", name: "A", kind: variable),
                (id: "a", name: "Again", kind: variable),
            ]))"#,
        )
        .unwrap();
        assert!(matches!(config.catalog(), Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn defaults_use_builtin_catalog_and_sample_urls() {
        let config = AppConfig::default();
        assert_eq!(config.catalog().unwrap().len(), Catalog::builtin().len());
        assert_eq!(config.resolver().images()[0], WIND_FORECAST_URL);
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some(PathBuf::from("/tmp/out")), None);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.log, LogDestination::File);
        assert_eq!(config.engine_config().output_dir, PathBuf::from("/tmp/out"));
    }
}
