use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::{BookingStatus, Role};
use crate::services::remote::RemoteError;
use crate::services::transitions::Field;

/// Why a booking transition did not happen.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot move booking from {from} to {to} as {role}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
        role: Role,
    },

    #[error("missing required field: {}", .0.as_str())]
    MissingRequiredField(Field),

    #[error("booking is already {0}")]
    TerminalState(BookingStatus),

    #[error("user {actor_id} is not the {role} on this booking")]
    NotParticipant { actor_id: i64, role: Role },

    #[error("booking update rejected by server ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    #[error("booking service unavailable: {0}")]
    RemoteUnavailable(String),
}

impl TransitionError {
    pub fn kind(&self) -> &'static str {
        match self {
            TransitionError::InvalidTransition { .. } => "invalid_transition",
            TransitionError::MissingRequiredField(_) => "missing_required_field",
            TransitionError::TerminalState(_) => "terminal_state",
            TransitionError::NotParticipant { .. } => "not_participant",
            TransitionError::RemoteRejected { .. } => "remote_rejected",
            TransitionError::RemoteUnavailable(_) => "remote_unavailable",
        }
    }

    /// Raised before any remote call was made.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            TransitionError::RemoteRejected { .. } | TransitionError::RemoteUnavailable(_)
        )
    }

    /// Only a request that never completed may be resubmitted as-is. A
    /// rejection needs a refetch of the booking first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransitionError::RemoteUnavailable(_))
    }
}

impl From<RemoteError> for TransitionError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Rejected { status, message }
            | RemoteError::InvalidResponse { status, message } => {
                TransitionError::RemoteRejected { status, message }
            }
            RemoteError::Unavailable(msg) => TransitionError::RemoteUnavailable(msg),
            RemoteError::TimedOut => TransitionError::RemoteUnavailable("request timed out".into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::Transition(e) => e.kind(),
            AppError::Remote(RemoteError::Rejected { .. }) => "remote_rejected",
            AppError::Remote(RemoteError::TimedOut) => "remote_timeout",
            AppError::Remote(RemoteError::InvalidResponse { .. }) => "invalid_response",
            AppError::Remote(_) => "remote_unavailable",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized => "unauthorized",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            AppError::Transition(e) => e.is_retryable(),
            AppError::Remote(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Transition(e) => match e {
                TransitionError::InvalidTransition { .. } => StatusCode::CONFLICT,
                TransitionError::TerminalState(_) => StatusCode::CONFLICT,
                TransitionError::MissingRequiredField(_) => StatusCode::UNPROCESSABLE_ENTITY,
                TransitionError::NotParticipant { .. } => StatusCode::FORBIDDEN,
                TransitionError::RemoteRejected { .. } => StatusCode::CONFLICT,
                TransitionError::RemoteUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            AppError::Remote(e) => match e {
                RemoteError::Rejected { status, .. } => StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                RemoteError::TimedOut => StatusCode::GATEWAY_TIMEOUT,
                RemoteError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                RemoteError::InvalidResponse { .. } => StatusCode::BAD_GATEWAY,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        };

        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed upstream");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "retryable": self.retryable(),
        });
        (status, axum::Json(body)).into_response()
    }
}
