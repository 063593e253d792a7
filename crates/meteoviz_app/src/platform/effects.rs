use std::time::Duration;

use meteoviz_core::{DownloadReport, Effect, ImageDetails, Msg};
use meteoviz_engine::{EngineConfig, EngineEvent, EngineHandle, ExportOutcome};
use meteoviz_logging::{viz_debug, viz_info, viz_warn};

use super::theme::ThemeProvider;

/// What the UI loop must do after a batch of effects ran.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EffectOutcome {
    pub redraw: bool,
    pub quit: bool,
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig) -> Self {
        viz_info!("engine output directory {}", config.output_dir.display());
        Self {
            engine: EngineHandle::new(config),
        }
    }

    pub fn run(&self, effects: Vec<Effect>, theme: &mut dyn ThemeProvider) -> EffectOutcome {
        let mut outcome = EffectOutcome::default();
        for effect in effects {
            match effect {
                Effect::ScheduleLoadComplete { token, delay } => {
                    viz_debug!("ScheduleLoadComplete token={token} delay_ms={}", delay.as_millis());
                    self.engine.schedule_load(token, delay);
                }
                Effect::CancelPendingLoad => self.engine.cancel_load(),
                Effect::FetchImage { token, url } => {
                    viz_info!("FetchImage token={token} url={url}");
                    self.engine.fetch_image(token, url);
                }
                Effect::DownloadImage { url, filename } => {
                    viz_info!("DownloadImage filename={filename} url={url}");
                    self.engine.export(url, filename);
                }
                Effect::ToggleTheme => {
                    let mode = theme.toggle();
                    viz_debug!("theme now {mode:?}");
                    outcome.redraw = true;
                }
                Effect::Quit => outcome.quit = true,
            }
        }
        outcome
    }

    /// Give running exports up to `grace` to land before the process exits.
    pub fn finish(&self, grace: Duration) -> usize {
        let pending = self.engine.pending_exports();
        if pending == 0 {
            return 0;
        }
        viz_info!("waiting up to {}ms for {pending} export(s)", grace.as_millis());
        let abandoned = self.engine.wait_for_exports(grace);
        if abandoned > 0 {
            viz_warn!("quitting with {abandoned} export(s) still running; they were abandoned");
        }
        abandoned
    }

    /// Engine results accumulated since the last call, as messages.
    pub fn drain_events(&self) -> Vec<Msg> {
        std::iter::from_fn(|| self.engine.try_recv())
            .map(event_to_msg)
            .collect()
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::DelayElapsed { token } => Msg::LoadDelayElapsed { token },
        EngineEvent::ImageFetched { token, result } => match result {
            Ok(info) => Msg::ImageLoaded {
                token,
                details: ImageDetails {
                    format: info.format,
                    width: info.width,
                    height: info.height,
                    byte_len: info.byte_len,
                },
            },
            Err(kind) => Msg::ImageFailed {
                token,
                reason: kind.to_string(),
            },
        },
        EngineEvent::ExportFinished { outcome, .. } => Msg::DownloadFinished(match outcome {
            ExportOutcome::Saved { path } => DownloadReport::Saved {
                path: path.display().to_string(),
            },
            ExportOutcome::OpenedExternally { url, reason } => {
                DownloadReport::OpenedExternally { url, reason }
            }
            ExportOutcome::Failed { reason } => DownloadReport::Failed { reason },
        }),
    }
}
