use crate::domain::contact::Submission;
use crate::domain::email::{ComposeError, ComposePolicy};
use crate::services::mail::{MailTransport, TransportError};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, timeout_at};

#[derive(Clone, Debug)]
struct Metrics {
    submissions_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("contact-relay");
        Self {
            submissions_total: meter
                .u64_counter("contact_submissions_total")
                .with_description("Contact form submissions by outcome")
                .build(),
        }
    }

    fn record(&self, outcome: &'static str) {
        self.submissions_total.add(1, &[KeyValue::new("outcome", outcome)]);
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("mail service unavailable: {0}")]
    Unavailable(TransportError),
    #[error("delivery failed: {0}")]
    Delivery(TransportError),
    #[error("cannot compose email: {0}")]
    Compose(#[from] ComposeError),
}

impl ContactError {
    const fn outcome(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Delivery(TransportError::ConnectionRefused(_)) => "connection_error",
            Self::Delivery(TransportError::TimedOut) => "timeout",
            Self::Delivery(TransportError::Other(_)) | Self::Compose(_) => "send_failed",
        }
    }
}

/// Relays contact submissions to the site owner's inbox.
#[derive(Clone, Debug)]
pub struct ContactService {
    transport: Arc<dyn MailTransport>,
    policy: ComposePolicy,
    verify_first: bool,
    ceiling: Duration,
    metrics: Metrics,
}

impl ContactService {
    #[must_use]
    pub fn new(transport: Arc<dyn MailTransport>, policy: ComposePolicy, verify_first: bool, ceiling: Duration) -> Self {
        Self { transport, policy, verify_first, ceiling, metrics: Metrics::new() }
    }

    pub fn record_rejected(&self) {
        self.metrics.record("rejected");
    }

    /// Verifies the transport (when enabled), then sends one email for the submission.
    ///
    /// # Errors
    /// Returns `ContactError::Unavailable` if verification fails and `ContactError::Delivery`
    /// with the classified transport failure if the send fails. Both phases share one
    /// deadline; running past it is `Delivery(TimedOut)` once the send has started.
    #[tracing::instrument(skip(self, submission), err(level = "debug"))]
    pub async fn submit(&self, submission: &Submission) -> Result<(), ContactError> {
        let result = self.relay(submission).await;
        match &result {
            Ok(()) => {
                tracing::info!("Contact email sent");
                self.metrics.record("sent");
            }
            Err(ContactError::Compose(e)) => {
                tracing::error!(error = %e, "Cannot compose contact email");
                self.metrics.record("send_failed");
            }
            // transport failures are logged with their detail by the adapter
            Err(e) => self.metrics.record(e.outcome()),
        }
        result
    }

    async fn relay(&self, submission: &Submission) -> Result<(), ContactError> {
        let deadline = Instant::now() + self.ceiling;

        if self.verify_first {
            bounded(deadline, self.transport.verify()).await.map_err(ContactError::Unavailable)?;
        }

        let email = self.policy.compose(submission)?;
        bounded(deadline, self.transport.send(&email)).await.map_err(ContactError::Delivery)
    }
}

async fn bounded<F>(deadline: Instant, attempt: F) -> Result<(), TransportError>
where
    F: Future<Output = Result<(), TransportError>>,
{
    timeout_at(deadline, attempt).await.unwrap_or(Err(TransportError::TimedOut))
}
