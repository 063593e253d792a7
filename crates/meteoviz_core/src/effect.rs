use std::time::Duration;

use crate::RequestToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `Msg::LoadDelayElapsed { token }` after `delay`, superseding any pending one.
    ScheduleLoadComplete { token: RequestToken, delay: Duration },
    /// Drop whatever load timer is pending.
    CancelPendingLoad,
    FetchImage { token: RequestToken, url: String },
    DownloadImage { url: String, filename: String },
    ToggleTheme,
    Quit,
}
