use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::task::Completion;

/// The settle delay as a cancellable scheduled task.
///
/// Fires `Completion::Settled` with its generation once the delay elapses.
/// Dropping the timer aborts it; a fire that raced the abort carries a
/// stale generation and is ignored by the binding task.
#[derive(Debug)]
pub(crate) struct SettleTimer {
    generation: u64,
    task: JoinHandle<()>,
}

impl SettleTimer {
    pub fn schedule(
        delay: Duration,
        generation: u64,
        completions: mpsc::UnboundedSender<Completion>,
    ) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = completions.send(Completion::Settled { generation });
        });
        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for SettleTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
