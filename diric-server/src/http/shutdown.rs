//! Shutdown triggers
//!
//! The server stops on Ctrl+C, SIGTERM, or when a database failure trips
//! the [`FatalSignal`] in fail-fast mode.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::Notify;

/// One-shot process-wide fatal flag.
///
/// The first `trip` records its reason and wakes the shutdown future;
/// later trips are ignored.
#[derive(Debug, Default)]
pub struct FatalSignal {
    reason: Mutex<Option<String>>,
    notify: Notify,
}

impl FatalSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trip(&self, reason: impl Into<String>) {
        let mut slot = self.reason.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(reason.into());
            // notify_one keeps a permit if nobody is waiting yet
            self.notify.notify_one();
        }
    }

    pub fn reason(&self) -> Option<String> {
        self.reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_tripped(&self) -> bool {
        self.reason().is_some()
    }

    /// Resolves once `trip` has been called
    pub async fn tripped(&self) {
        self.notify.notified().await;
    }
}

/// Wait for Ctrl+C, SIGTERM, or a fatal trip.
pub(crate) async fn shutdown_signal(fatal: Arc<FatalSignal>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
        _ = fatal.tripped() => {
            tracing::warn!("Fatal database error, starting shutdown");
        }
    }
}
