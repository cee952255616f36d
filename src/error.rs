use crate::domain::contact::{
    ContactReply, MSG_CONNECTION_ERROR, MSG_REQUEST_TIMED_OUT, MSG_SEND_FAILED, MSG_SERVICE_UNAVAILABLE,
    MSG_TIMED_OUT,
};
use crate::services::contact_service::ContactError;
use crate::services::mail::TransportError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Origin not allowed: {0}")]
    OriginRejected(String),
    #[error("Request exceeded the outer timeout")]
    RequestTimeout,
    #[error(transparent)]
    Contact(#[from] ContactError),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Status and caller-facing message. Internal detail never leaves this function.
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::OriginRejected(_) => (StatusCode::FORBIDDEN, "Not allowed by CORS".to_string()),
            Self::RequestTimeout => (StatusCode::REQUEST_TIMEOUT, MSG_REQUEST_TIMED_OUT.to_string()),
            Self::Contact(ContactError::Unavailable(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_SERVICE_UNAVAILABLE.to_string())
            }
            Self::Contact(ContactError::Delivery(TransportError::ConnectionRefused(_))) => {
                (StatusCode::BAD_GATEWAY, MSG_CONNECTION_ERROR.to_string())
            }
            Self::Contact(ContactError::Delivery(TransportError::TimedOut)) => {
                (StatusCode::GATEWAY_TIMEOUT, MSG_TIMED_OUT.to_string())
            }
            Self::Contact(ContactError::Delivery(TransportError::Other(_)) | ContactError::Compose(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_SEND_FAILED.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::BadRequest(msg) => tracing::debug!(message = %msg, "Bad request"),
            Self::OriginRejected(origin) => tracing::warn!(origin = %origin, "Blocked by CORS"),
            Self::RequestTimeout => tracing::warn!("Request timed out"),
            Self::Contact(e) => tracing::debug!(error = %e, "Contact relay failed"),
        }

        let (status, message) = self.status_and_message();
        (status, Json(ContactReply::new(message))).into_response()
    }
}
