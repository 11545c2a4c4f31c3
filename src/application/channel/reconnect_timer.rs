//! Cancellable handle for a scheduled reconnect.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::driver::Command;

/// A reconnect waiting to fire.
///
/// Stored on the channel so `close()` can abort it. The command it sends
/// carries the generation it was scheduled under; the driver drops it if
/// the channel has moved on, so an abort that loses the race is still
/// harmless.
#[derive(Debug)]
pub(crate) struct ReconnectTimer {
    handle: JoinHandle<()>,
    attempt: u32,
}

impl ReconnectTimer {
    /// Spawn a timer that asks the driver to reconnect after `delay`.
    pub(crate) fn schedule(
        delay: Duration,
        attempt: u32,
        generation: u64,
        commands: mpsc::UnboundedSender<Command>,
    ) -> Self {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = commands.send(Command::Connect {
                generation,
                retry: true,
            });
        });
        Self { handle, attempt }
    }

    /// The attempt number this timer will start.
    pub(crate) fn attempt(&self) -> u32 {
        self.attempt
    }

    /// True until the timer has fired or been cancelled.
    pub(crate) fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Prevent the timer from firing.
    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_connect_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = ReconnectTimer::schedule(Duration::from_secs(3), 1, 7, tx);
        assert_eq!(timer.attempt(), 1);
        assert!(timer.is_pending());

        let command = rx.recv().await;
        assert_eq!(
            command,
            Some(Command::Connect {
                generation: 7,
                retry: true
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = ReconnectTimer::schedule(Duration::from_secs(3), 1, 0, tx);
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }
}
