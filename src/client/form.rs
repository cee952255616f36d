use crate::client::http::ContactClient;
use crate::domain::contact::Submission;
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// How long the success acknowledgment stays up.
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(3);

pub const MSG_ALREADY_SENDING: &str = "A message is already being sent.";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

/// The in-progress, unsubmitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Draft {
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn to_submission(&self) -> Submission {
        Submission::new(self.name.clone(), self.email.clone(), self.message.clone())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your name.")]
    Name,
    #[error("Please enter a valid email.")]
    Email,
    #[error("Please enter a message.")]
    Message,
}

/// Checks the draft in field order and stops at the first problem.
///
/// # Errors
/// Returns the first failing field.
pub fn validate(draft: &Draft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::Name);
    }
    if draft.email.trim().is_empty() || !EMAIL_PATTERN.is_match(&draft.email) {
        return Err(ValidationError::Email);
    }
    if draft.message.trim().is_empty() {
        return Err(ValidationError::Message);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Sending,
    Success,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub ok: bool,
    pub message: String,
}

impl SubmissionResult {
    fn ok(message: String) -> Self {
        Self { ok: true, message }
    }

    fn failed(message: String) -> Self {
        Self { ok: false, message }
    }
}

/// Owns the draft and drives it through `Idle -> Sending -> Success | Error`.
///
/// Views subscribe to status changes via [`FormController::subscribe`]. The success
/// acknowledgment reverts to `Idle` after a fixed window; that timer is cancelled when a
/// new submission starts or the controller is dropped.
#[derive(Debug)]
pub struct FormController {
    draft: Draft,
    client: ContactClient,
    status: Arc<watch::Sender<FormStatus>>,
    dismiss: Option<CancellationToken>,
    dismiss_after: Duration,
}

impl FormController {
    #[must_use]
    pub fn new(client: ContactClient) -> Self {
        let (status, _) = watch::channel(FormStatus::Idle);
        Self {
            draft: Draft::default(),
            client,
            status: Arc::new(status),
            dismiss: None,
            dismiss_after: SUCCESS_DISMISS_AFTER,
        }
    }

    #[must_use]
    pub const fn with_dismiss_after(mut self, dismiss_after: Duration) -> Self {
        self.dismiss_after = dismiss_after;
        self
    }

    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.status.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    /// A view disables its submit control while this is true.
    #[must_use]
    pub fn is_sending(&self) -> bool {
        *self.status.borrow() == FormStatus::Sending
    }

    /// Validates the draft and, if it passes, sends it to the relay.
    ///
    /// Refused without a request while a previous submission is still `Sending`.
    pub async fn submit(&mut self) -> SubmissionResult {
        if self.is_sending() {
            return SubmissionResult::failed(MSG_ALREADY_SENDING.to_string());
        }

        if let Err(e) = validate(&self.draft) {
            let message = e.to_string();
            self.set_status(FormStatus::Error(message.clone()));
            return SubmissionResult::failed(message);
        }

        self.cancel_dismiss();
        self.set_status(FormStatus::Sending);

        match self.client.send(&self.draft.to_submission()).await {
            Ok(message) => {
                self.draft.clear();
                self.set_status(FormStatus::Success);
                self.schedule_dismiss();
                SubmissionResult::ok(message)
            }
            Err(e) => {
                let message = e.to_string();
                self.set_status(FormStatus::Error(message.clone()));
                SubmissionResult::failed(message)
            }
        }
    }

    /// Returns to `Idle`, keeping the draft. Recovers a controller whose submit future was
    /// dropped mid-flight and left it `Sending`.
    pub fn reset(&mut self) {
        self.cancel_dismiss();
        self.set_status(FormStatus::Idle);
    }

    fn set_status(&self, status: FormStatus) {
        self.status.send_modify(|s| *s = status);
    }

    fn schedule_dismiss(&mut self) {
        self.cancel_dismiss();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let status = Arc::clone(&self.status);
        let after = self.dismiss_after;

        tokio::spawn(async move {
            tokio::select! {
                () = cancelled.cancelled() => {}
                () = tokio::time::sleep(after) => {
                    status.send_if_modified(|s| {
                        if *s == FormStatus::Success {
                            *s = FormStatus::Idle;
                            true
                        } else {
                            false
                        }
                    });
                }
            }
        });

        self.dismiss = Some(token);
    }

    fn cancel_dismiss(&mut self) {
        if let Some(token) = self.dismiss.take() {
            token.cancel();
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.cancel_dismiss();
    }
}
