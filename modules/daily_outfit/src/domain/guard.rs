use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub enum GuardOutcome<T> {
    Completed(T),
    TimedOut,
    /// The task panicked or was aborted.
    Failed(String),
}

/// Runs a task on its own tokio task under a deadline.
///
/// On timeout the task's cancellation token fires and the caller gets control
/// back immediately; the task stops at its next checkpoint. Side effects it
/// already committed are kept.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutGuard {
    deadline: Duration,
}

impl TimeoutGuard {
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub async fn run<F, Fut, T>(&self, task: F) -> GuardOutcome<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let token = CancellationToken::new();
        // Also fires if the caller drops this future mid-wait.
        let _cancel_on_exit = token.clone().drop_guard();

        let mut handle = tokio::spawn(task(token));
        match tokio::time::timeout(self.deadline, &mut handle).await {
            Ok(Ok(value)) => GuardOutcome::Completed(value),
            Ok(Err(join_err)) => GuardOutcome::Failed(join_err.to_string()),
            Err(_elapsed) => GuardOutcome::TimedOut,
        }
    }
}
