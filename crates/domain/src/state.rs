//! Request lifecycle state for frontend binding.
//!
//! This module defines the state machine for the single "current datetime"
//! query, enabling a frontend to display appropriate feedback at each stage.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Lifecycle of the outstanding or most recent datetime request.
///
/// This enum enables a frontend to show appropriate feedback:
/// - `Idle`: nothing fetched yet, show the call-to-action
/// - `Loading`: request in flight, show a spinner and disable the trigger
/// - `Success`: timestamp received, show it
/// - `Failure`: request failed, show the error message
///
/// A failed request keeps the previously fetched timestamp around as
/// `last_known`, so the frontend can display the stale value alongside the
/// new error. `Loading` carries it too, which is what makes the retention
/// across `Success -> Loading -> Failure` possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum RequestState {
    /// No request has been sent yet.
    #[default]
    Idle,

    /// Request is in progress.
    Loading {
        /// When the request started (for elapsed time display).
        /// Skipped in serialization as Instant is not serializable.
        #[serde(skip)]
        started_at: Option<Instant>,
        /// Timestamp from the last successful request, if any.
        last_known: Option<String>,
    },

    /// Request completed successfully.
    Success {
        /// The retrieved date/time text.
        timestamp: String,
    },

    /// Request failed.
    Failure {
        /// Error category for display.
        kind: RequestErrorKind,
        /// Human-readable error message.
        message: String,
        /// Timestamp from the last successful request, if any.
        last_known: Option<String>,
    },
}

impl RequestState {
    /// Creates a new `Loading` state, carrying forward the last successful
    /// timestamp.
    #[must_use]
    pub fn loading(last_known: Option<String>) -> Self {
        Self::Loading {
            started_at: Some(Instant::now()),
            last_known,
        }
    }

    /// Creates a `Success` state from a retrieved timestamp.
    #[must_use]
    pub fn success(timestamp: impl Into<String>) -> Self {
        Self::Success {
            timestamp: timestamp.into(),
        }
    }

    /// Creates a `Failure` state, retaining the last successful timestamp.
    #[must_use]
    pub fn failure(
        kind: RequestErrorKind,
        message: impl Into<String>,
        last_known: Option<String>,
    ) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
            last_known,
        }
    }

    /// Returns true if the state is `Idle`.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if a request is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Returns true if the last request succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if the last request failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns true if the machine has reached a terminal outcome for the
    /// most recent trigger.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Success { .. } | Self::Failure { .. })
    }

    /// Returns the most recently retrieved timestamp, if any.
    ///
    /// In `Success` this is the fresh value; in `Loading` and `Failure` it
    /// is the stale value carried over from the last success.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Success { timestamp } => Some(timestamp),
            Self::Loading { last_known, .. } | Self::Failure { last_known, .. } => {
                last_known.as_deref()
            }
        }
    }

    /// Returns the error message if in `Failure` state.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns the error category if in `Failure` state.
    #[must_use]
    pub const fn error_kind(&self) -> Option<RequestErrorKind> {
        match self {
            Self::Failure { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Returns the elapsed time if loading.
    #[must_use]
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        match self {
            Self::Loading {
                started_at: Some(t),
                ..
            } => Some(t.elapsed()),
            _ => None,
        }
    }
}

/// Categories of request failures for user-friendly display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestErrorKind {
    /// The service is unreachable or the transport failed before a
    /// response was obtained.
    Network,

    /// A response was received but its status code indicates failure.
    Protocol,

    /// A success response was received but its body could not be parsed
    /// as the expected object.
    Format,
}

impl RequestErrorKind {
    /// Returns a human-readable title for this error category.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Network => "Network Error",
            Self::Protocol => "Service Error",
            Self::Format => "Unexpected Response",
        }
    }
}
