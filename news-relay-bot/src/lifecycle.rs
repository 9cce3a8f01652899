//! Lifecycle coordination: one cancellation token shared by every execution context, cancelled
//! once on SIGINT/SIGTERM, followed by a bounded join.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub struct Lifecycle {
    cancel: CancellationToken,
    grace: Duration,
}

impl Lifecycle {
    pub fn new(grace: Duration) -> Self {
        Self {
            cancel: CancellationToken::new(),
            grace,
        }
    }

    /// Token handed to each context; cancelled exactly once.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Spawns the task that turns SIGINT (and SIGTERM on unix) into cancellation.
    pub fn install_signal_handlers(&self) -> JoinHandle<()> {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            wait_for_signal(&cancel).await;
            if !cancel.is_cancelled() {
                info!("Termination signal received, shutting down");
                cancel.cancel();
            }
        })
    }

    /// Waits for cancellation, then gives the contexts `grace` in total to finish. Contexts still
    /// running after the grace period are aborted. A grace period too large to add to the current
    /// instant waits for the contexts without a deadline.
    pub async fn run(self, contexts: Vec<(&'static str, JoinHandle<()>)>) {
        self.cancel.cancelled().await;
        info!(grace_secs = self.grace.as_secs_f64(), "Stopping execution contexts");

        // A grace period past the clock's range means no deadline.
        let deadline = Instant::now().checked_add(self.grace);
        for (name, mut handle) in contexts {
            let joined = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, &mut handle).await,
                None => Ok((&mut handle).await),
            };
            match joined {
                Ok(Ok(())) => info!(context = name, "Context stopped"),
                Ok(Err(e)) if e.is_cancelled() => info!(context = name, "Context aborted"),
                Ok(Err(e)) => error!(context = name, error = %e, "Context panicked"),
                Err(_) => {
                    warn!(context = name, "Context did not stop within the grace period");
                    handle.abort();
                }
            }
        }
        info!("Application stopped");
    }
}

#[cfg(unix)]
async fn wait_for_signal(cancel: &CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigterm.recv() => {}
                _ = tokio::signal::ctrl_c() => {}
                _ = cancel.cancelled() => {}
            }
        }
        Err(e) => {
            warn!(error = %e, "Cannot install SIGTERM handler, listening for Ctrl-C only");
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = cancel.cancelled() => {}
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal(cancel: &CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = cancel.cancelled() => {}
    }
}
