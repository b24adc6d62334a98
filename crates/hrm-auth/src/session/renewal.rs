//! Background renewal of the access token.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::SessionInner;

/// Handle to the repeating renewal task of one session.
///
/// Dropping the handle cancels the task.
pub(crate) struct RenewalTask {
    cancel: CancellationToken,
    _handle: JoinHandle<()>,
}

impl RenewalTask {
    /// Spawns the renewal loop on the current tokio runtime.
    ///
    /// The task holds only a weak reference to the session, so it never keeps
    /// a dropped session manager alive.
    pub(crate) fn spawn(
        session: Weak<SessionInner>,
        interval: Duration,
        min_validity: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let cancelled = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::debug!(interval = ?interval, "Session renewal started");

            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let Some(session) = session.upgrade() else {
                    break;
                };
                if !session.renew_if_needed(min_validity).await {
                    break;
                }
            }

            tracing::debug!("Session renewal stopped");
        });

        Self {
            cancel,
            _handle: handle,
        }
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for RenewalTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
