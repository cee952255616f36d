use crate::domain::email::OutboundEmail;
use async_trait::async_trait;
use thiserror::Error;

/// Closed set of ways a delivery attempt can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection to mail server failed: {0}")]
    ConnectionRefused(String),
    #[error("mail server did not respond in time")]
    TimedOut,
    #[error("mail transport error: {0}")]
    Other(String),
}

#[async_trait]
pub trait MailTransport: Send + Sync + std::fmt::Debug {
    /// Checks that a session can be opened and authenticated.
    ///
    /// # Errors
    /// Returns the classified failure if the server cannot be reached or rejects the session.
    async fn verify(&self) -> Result<(), TransportError>;

    /// Delivers exactly one message. No retries.
    ///
    /// # Errors
    /// Returns the classified failure if the message was not accepted.
    async fn send(&self, email: &OutboundEmail) -> Result<(), TransportError>;
}
