use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use meteoviz_logging::{viz_debug, viz_error, viz_warn};

use crate::decode::inspect_image;
use crate::export::ImageExporter;
use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::opener::{ExternalOpener, SystemOpener};
use crate::timer::LoadTimer;
use crate::{EngineEvent, FailureKind, ImageInfo, LoadToken};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fetch: FetchSettings,
    pub output_dir: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

enum EngineCommand {
    ScheduleLoad { token: LoadToken, delay: Duration },
    CancelLoad,
    FetchImage { token: LoadToken, url: String },
    Export { url: String, filename: String },
}

/// Owns a background thread running the tokio runtime. Commands go in through
/// the handle; results come back as [`EngineEvent`]s polled by the UI loop.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    /// Exports handed to the engine whose outcome has not been sent yet.
    pending_exports: Arc<AtomicUsize>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let fetcher: Arc<dyn Fetcher> = Arc::new(ReqwestFetcher::new(config.fetch.clone()));
        Self::with_parts(config, fetcher, Arc::new(SystemOpener))
    }

    pub fn with_parts(
        config: EngineConfig,
        fetcher: Arc<dyn Fetcher>,
        opener: Arc<dyn ExternalOpener>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let pending_exports = Arc::new(AtomicUsize::new(0));
        let export_counter = pending_exports.clone();
        let exporter = Arc::new(ImageExporter::new(
            fetcher.clone(),
            config.output_dir,
            opener,
        ));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    viz_error!("failed to start engine runtime: {err}");
                    return;
                }
            };
            let mut timer = LoadTimer::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::ScheduleLoad { token, delay } => {
                        let event_tx = event_tx.clone();
                        timer.schedule(runtime.handle(), token, delay, move |token| {
                            let _ = event_tx.send(EngineEvent::DelayElapsed { token });
                        });
                    }
                    EngineCommand::CancelLoad => timer.cancel(),
                    EngineCommand::FetchImage { token, url } => {
                        let fetcher = fetcher.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = fetch_and_inspect(fetcher.as_ref(), &url).await;
                            let _ = event_tx.send(EngineEvent::ImageFetched { token, result });
                        });
                    }
                    EngineCommand::Export { url, filename } => {
                        let exporter = exporter.clone();
                        let event_tx = event_tx.clone();
                        let export_counter = export_counter.clone();
                        runtime.spawn(async move {
                            let outcome = exporter.export(&url, &filename).await;
                            let _ = event_tx.send(EngineEvent::ExportFinished { filename, outcome });
                            export_counter.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                }
            }
            viz_debug!("engine command channel closed");
        });

        Self {
            cmd_tx,
            event_rx,
            pending_exports,
        }
    }

    pub fn schedule_load(&self, token: LoadToken, delay: Duration) {
        self.send(EngineCommand::ScheduleLoad { token, delay });
    }

    pub fn cancel_load(&self) {
        self.send(EngineCommand::CancelLoad);
    }

    pub fn fetch_image(&self, token: LoadToken, url: impl Into<String>) {
        self.send(EngineCommand::FetchImage {
            token,
            url: url.into(),
        });
    }

    pub fn export(&self, url: impl Into<String>, filename: impl Into<String>) {
        // Counted before sending so a waiter never sees zero while the command is queued.
        self.pending_exports.fetch_add(1, Ordering::SeqCst);
        let command = EngineCommand::Export {
            url: url.into(),
            filename: filename.into(),
        };
        if !self.send(command) {
            self.pending_exports.fetch_sub(1, Ordering::SeqCst);
        }
    }

    pub fn pending_exports(&self) -> usize {
        self.pending_exports.load(Ordering::SeqCst)
    }

    /// Block for up to `grace` while exports finish. Returns how many are still running.
    pub fn wait_for_exports(&self, grace: Duration) -> usize {
        let deadline = Instant::now() + grace;
        loop {
            let pending = self.pending_exports();
            if pending == 0 || Instant::now() >= deadline {
                return pending;
            }
            thread::sleep(Duration::from_millis(20));
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) -> bool {
        if self.cmd_tx.send(command).is_err() {
            viz_warn!("engine thread is gone; command dropped");
            return false;
        }
        true
    }
}

async fn fetch_and_inspect(fetcher: &dyn Fetcher, url: &str) -> Result<ImageInfo, FailureKind> {
    let output = fetcher.fetch(url).await.map_err(|err| {
        viz_warn!("image fetch failed for {url}: {err}");
        err.kind
    })?;
    let bytes = output.bytes;
    // Decoding tens of megabytes is CPU work; keep it off the async workers.
    let decoded = tokio::task::spawn_blocking(move || inspect_image(&bytes))
        .await
        .map_err(|err| {
            viz_error!("decode task for {url} did not complete: {err}");
            FailureKind::Undecodable
        })?;
    decoded.map_err(|err| {
        viz_warn!("image from {url} is not displayable: {err}");
        FailureKind::Undecodable
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FetchError, FetchMetadata, FetchOutput};
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;
    use std::sync::atomic::AtomicBool;

    struct StaticFetcher(Vec<u8>);

    #[async_trait::async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
            Ok(FetchOutput {
                bytes: self.0.clone(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    redirect_count: 0,
                    content_type: Some("image/png".to_string()),
                    byte_len: self.0.len() as u64,
                },
            })
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
            .write_to(&mut buf, ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn decoding_leaves_the_runtime_free_for_other_tasks() {
        let fetcher = StaticFetcher(png_bytes(1024, 1024));
        let ticked = Arc::new(AtomicBool::new(false));
        let flag = ticked.clone();
        tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

        let info = fetch_and_inspect(&fetcher, "http://charts.test/big.png")
            .await
            .unwrap();

        assert_eq!((info.width, info.height), (1024, 1024));
        assert!(ticked.load(Ordering::SeqCst), "other task starved during decode");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn undecodable_bytes_map_to_undecodable() {
        let fetcher = StaticFetcher(b"<html>503</html>".to_vec());
        let err = fetch_and_inspect(&fetcher, "http://charts.test/bad.png")
            .await
            .unwrap_err();
        assert_eq!(err, FailureKind::Undecodable);
    }
}
