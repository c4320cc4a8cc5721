//! Time service port

use async_trait::async_trait;
use thiserror::Error;
use timeview_domain::{DateTimePayload, RequestErrorKind};

/// Errors a [`TimeService`] implementation can report.
///
/// The three variants mirror the failure taxonomy the frontend cares
/// about; the `Display` strings are the human-readable messages persisted
/// into the `Failure` state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeServiceError {
    /// The endpoint is unreachable or the transport failed before a
    /// response was obtained.
    #[error("network error: {message}")]
    Network {
        /// Transport-level description.
        message: String,
    },

    /// A response was received but its status code indicates failure.
    #[error("service responded with status {status}")]
    Protocol {
        /// The HTTP status code.
        status: u16,
    },

    /// A success response was received but the body could not be parsed
    /// as the expected object.
    #[error("malformed response: {message}")]
    Format {
        /// Parse-level description.
        message: String,
    },
}

impl TimeServiceError {
    /// Maps this error to its display category.
    #[must_use]
    pub const fn kind(&self) -> RequestErrorKind {
        match self {
            Self::Network { .. } => RequestErrorKind::Network,
            Self::Protocol { .. } => RequestErrorKind::Protocol,
            Self::Format { .. } => RequestErrorKind::Format,
        }
    }
}

/// Port for retrieving the current date/time from the remote service.
///
/// This trait abstracts the HTTP implementation, allowing the controller
/// to be tested against mock services. There is no cancellation method:
/// once started, a fetch cannot be aborted, only discarded on resolution.
#[async_trait]
pub trait TimeService: Send + Sync {
    /// Performs one retrieval of the current date/time.
    ///
    /// # Errors
    ///
    /// Returns a [`TimeServiceError`] on transport failure, a non-success
    /// status, or an unparseable body.
    async fn fetch_current(&self) -> Result<DateTimePayload, TimeServiceError>;
}
