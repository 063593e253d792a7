use std::time::Duration;

use meteoviz_logging::viz_trace;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::LoadToken;

/// At most one pending simulated-load delay. Scheduling a new one cancels the
/// previous, so an older timer can never fire after a newer request.
#[derive(Debug, Default)]
pub struct LoadTimer {
    pending: Option<(LoadToken, CancellationToken)>,
}

impl LoadTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule<F>(&mut self, handle: &Handle, token: LoadToken, delay: Duration, on_elapsed: F)
    where
        F: FnOnce(LoadToken) + Send + 'static,
    {
        self.cancel();
        let cancel = CancellationToken::new();
        let child = cancel.clone();
        handle.spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {
                    viz_trace!("load timer {token} cancelled");
                }
                _ = tokio::time::sleep(delay) => on_elapsed(token),
            }
        });
        self.pending = Some((token, cancel));
    }

    pub fn cancel(&mut self) {
        if let Some((token, cancel)) = self.pending.take() {
            viz_trace!("cancelling load timer {token}");
            cancel.cancel();
        }
    }

    pub fn pending_token(&self) -> Option<LoadToken> {
        self.pending.as_ref().map(|(token, _)| *token)
    }
}
