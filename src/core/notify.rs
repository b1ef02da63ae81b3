//! User-facing notifications.
//!
//! The store never shows anything itself. Flows that need to tell the user
//! something (login required, sale recorded) go through a [`Notifier`].

use std::fmt;
use tracing::{error, info, warn};

/// How prominent a notification is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Neutral information
    Info,
    /// An action completed
    Success,
    /// Something needs the user's attention
    Warning,
    /// An action failed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Destination for user-facing messages. Fire and forget.
pub trait Notifier {
    /// Shows `message` with the given severity.
    fn notify(&self, message: &str, severity: Severity);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => info!(%severity, "{}", message),
            Severity::Warning => warn!(%severity, "{}", message),
            Severity::Error => error!(%severity, "{}", message),
        }
    }
}
