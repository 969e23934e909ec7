//! Optional snapshot delivery.
//!
//! Delivery is a capability the caller may or may not have. The pipeline
//! only sees the [`Notifier`] trait; no concrete endpoint lives here.

use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery endpoint rejected the credentials")]
    InvalidCredentials,
    #[error("delivery transport failed: {0}")]
    Transport(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sends a persisted snapshot somewhere.
pub trait Notifier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Deliver the snapshot at `path` with an optional text message.
    fn notify(&self, path: &Path, message: Option<&str>) -> Result<(), DeliveryError>;
}

/// What happened to delivery for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// No notifier was configured.
    Skipped,
    Delivered,
    /// The notifier failed; the snapshot itself is kept.
    Failed(String),
}

/// Run `notifier` if present. Failures are logged and returned as an outcome,
/// never as an error.
pub fn deliver(
    notifier: Option<&dyn Notifier>,
    path: &Path,
    message: Option<&str>,
) -> DeliveryOutcome {
    let Some(notifier) = notifier else {
        return DeliveryOutcome::Skipped;
    };

    tracing::info!(notifier = notifier.name(), path = %path.display(), "Delivering snapshot");
    match notifier.notify(path, message) {
        Ok(()) => DeliveryOutcome::Delivered,
        Err(e) => {
            tracing::warn!(
                notifier = notifier.name(),
                error = %e,
                "Snapshot delivery failed; snapshot kept at {}",
                path.display()
            );
            DeliveryOutcome::Failed(e.to_string())
        }
    }
}
