use crate::config::SenderMode;
use crate::domain::contact::Submission;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    #[must_use]
    pub fn new(name: Option<&str>, address: &str) -> Self {
        Self { name: name.map(str::to_string), address: address.to_string() }
    }
}

/// A fully composed message, independent of the transport that delivers it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: Mailbox,
    pub reply_to: Option<Mailbox>,
    pub to: Mailbox,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ComposeError {
    #[error("no recipient configured (EMAIL_TO / EMAIL_USER)")]
    MissingRecipient,
    #[error("relay sender mode requires EMAIL_USER")]
    MissingSender,
}

/// How a submission becomes an email.
#[derive(Debug, Clone)]
pub struct ComposePolicy {
    pub sender_mode: SenderMode,
    pub account: Option<String>,
    pub recipient: Option<String>,
    pub escape_html: bool,
}

impl ComposePolicy {
    /// Composes the notification for one submission.
    ///
    /// Visitor input is embedded into the HTML part verbatim unless `escape_html` is set.
    ///
    /// # Errors
    /// Returns an error if the recipient or (in relay mode) the sender account is not configured.
    pub fn compose(&self, submission: &Submission) -> Result<OutboundEmail, ComposeError> {
        let recipient = self.recipient.as_deref().ok_or(ComposeError::MissingRecipient)?;

        let (from, reply_to) = match self.sender_mode {
            SenderMode::Visitor => (Mailbox::new(Some(&submission.name), &submission.email), None),
            SenderMode::Relay => {
                let account = self.account.as_deref().ok_or(ComposeError::MissingSender)?;
                (
                    Mailbox::new(Some(&submission.name), account),
                    Some(Mailbox::new(Some(&submission.name), &submission.email)),
                )
            }
        };

        let text = format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}",
            submission.name, submission.email, submission.message
        );

        let (name, email, message) = if self.escape_html {
            (
                ammonia::clean_text(&submission.name),
                ammonia::clean_text(&submission.email),
                ammonia::clean_text(&submission.message),
            )
        } else {
            (submission.name.clone(), submission.email.clone(), submission.message.clone())
        };
        let html = format!(
            "<p><strong>Name:</strong> {name}</p><p><strong>Email:</strong> {email}</p><p>{message}</p>"
        );

        Ok(OutboundEmail {
            from,
            reply_to,
            to: Mailbox::new(None, recipient),
            subject: format!("New Contact Form: {}", submission.name),
            text,
            html,
        })
    }
}

impl Default for ComposePolicy {
    fn default() -> Self {
        Self { sender_mode: SenderMode::Relay, account: None, recipient: None, escape_html: false }
    }
}
