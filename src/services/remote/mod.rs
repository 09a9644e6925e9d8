pub mod rest;

use async_trait::async_trait;

use crate::models::{Booking, BookingUpdate, Review, Role};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("booking service returned {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("booking service unreachable: {0}")]
    Unavailable(String),

    #[error("booking service timed out")]
    TimedOut,

    /// A success status with a body that did not decode. The server may
    /// already have applied the request.
    #[error("invalid response from booking service ({status}): {message}")]
    InvalidResponse { status: u16, message: String },
}

impl RemoteError {
    /// Only a request that never got an answer may be resubmitted as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Unavailable(_) | RemoteError::TimedOut)
    }
}

/// The marketplace REST API. The bearer token is opaque and passed through
/// untouched on every call.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Bookings the session user made (`Role::Customer`) or received
    /// (`Role::Provider`).
    async fn list_bookings(&self, token: &str, role: Role) -> Result<Vec<Booking>, RemoteError>;

    async fn fetch_booking(&self, token: &str, id: i64) -> Result<Booking, RemoteError>;

    async fn update_booking(
        &self,
        token: &str,
        id: i64,
        update: &BookingUpdate,
    ) -> Result<Booking, RemoteError>;

    async fn provider_reviews(
        &self,
        token: &str,
        provider_id: i64,
    ) -> Result<Vec<Review>, RemoteError>;
}
