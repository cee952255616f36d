use crate::domain::contact::{MSG_SENT, Submission};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

pub const MSG_SERVER_ERROR: &str = "Server error. Try again later.";
pub const MSG_SOMETHING_WRONG: &str = "Something went wrong";

static DUPLICATE_SLASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:]/)/+").expect("slash pattern is valid"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The relay answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// No usable response arrived.
    #[error("Something went wrong")]
    Network(String),
}

#[derive(Debug, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    message: Option<String>,
}

/// Thin JSON client for `POST {base}/contact`.
#[derive(Debug, Clone)]
pub struct ContactClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ContactClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self { http, endpoint: contact_endpoint(base_url) }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one submission and returns the relay's confirmation message.
    ///
    /// # Errors
    /// `ClientError::Rejected` carries the server's message (or a generic fallback when the
    /// error body is unreadable); `ClientError::Network` means no response was received.
    #[tracing::instrument(skip(self, submission), fields(endpoint = %self.endpoint), err(level = "warn"))]
    pub async fn send(&self, submission: &Submission) -> Result<String, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        let message = response.json::<ReplyBody>().await.ok().and_then(|b| b.message).filter(|m| !m.is_empty());

        if status.is_success() {
            Ok(message.unwrap_or_else(|| MSG_SENT.to_string()))
        } else {
            Err(ClientError::Rejected {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| MSG_SERVER_ERROR.to_string()),
            })
        }
    }
}

/// Joins the base URL with `/contact`, collapsing doubled slashes outside the scheme.
#[must_use]
pub fn contact_endpoint(base_url: &str) -> String {
    let joined = format!("{base_url}/contact");
    DUPLICATE_SLASHES.replace_all(&joined, "$1").into_owned()
}
