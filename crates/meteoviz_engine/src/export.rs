use std::path::PathBuf;
use std::sync::Arc;

use meteoviz_logging::{viz_error, viz_info};
use thiserror::Error;

use crate::filename::safe_filename;
use crate::opener::ExternalOpener;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::{ExportOutcome, FetchError, Fetcher};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("save failed: {0}")]
    Persist(#[from] PersistError),
}

/// Downloads the displayed image into the output directory, handing the URL
/// to the system opener when that is not possible.
pub struct ImageExporter {
    fetcher: Arc<dyn Fetcher>,
    writer: AtomicFileWriter,
    opener: Arc<dyn ExternalOpener>,
}

impl ImageExporter {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        output_dir: PathBuf,
        opener: Arc<dyn ExternalOpener>,
    ) -> Self {
        Self {
            fetcher,
            writer: AtomicFileWriter::new(output_dir),
            opener,
        }
    }

    pub async fn export(&self, url: &str, filename: &str) -> ExportOutcome {
        match self.save(url, filename).await {
            Ok(path) => {
                viz_info!("saved {url} to {}", path.display());
                ExportOutcome::Saved { path }
            }
            Err(err) => {
                viz_error!("Download failed: {err}");
                match self.opener.open(url) {
                    Ok(()) => ExportOutcome::OpenedExternally {
                        url: url.to_string(),
                        reason: err.to_string(),
                    },
                    Err(open_err) => {
                        viz_error!("could not open {url} externally: {open_err}");
                        ExportOutcome::Failed {
                            reason: format!("{err}; {open_err}"),
                        }
                    }
                }
            }
        }
    }

    async fn save(&self, url: &str, filename: &str) -> Result<PathBuf, ExportError> {
        let output = self.fetcher.fetch(url).await?;
        let name = safe_filename(filename);
        Ok(self.writer.write(&name, &output.bytes)?)
    }
}
