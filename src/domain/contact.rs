use serde::{Deserialize, Serialize};

pub const MSG_SENT: &str = "Message sent successfully.";
pub const MSG_FIELDS_REQUIRED: &str = "All fields are required.";
pub const MSG_SERVICE_UNAVAILABLE: &str = "Email service not available. Try again later.";
pub const MSG_CONNECTION_ERROR: &str = "Unable to connect to email server (connection error).";
pub const MSG_TIMED_OUT: &str = "Email send timed out.";
pub const MSG_SEND_FAILED: &str = "Failed to send message.";
pub const MSG_REQUEST_TIMED_OUT: &str = "Request timed out.";

/// A visitor's contact form entry. Lives for exactly one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Submission {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into(), message: message.into() }
    }

    /// Builds a submission from optional wire fields, rejecting any that is absent or empty.
    ///
    /// # Errors
    /// Returns the field-required message when a field is missing.
    pub fn from_parts(
        name: Option<String>,
        email: Option<String>,
        message: Option<String>,
    ) -> Result<Self, &'static str> {
        match (name, email, message) {
            (Some(name), Some(email), Some(message))
                if !name.is_empty() && !email.is_empty() && !message.is_empty() =>
            {
                Ok(Self { name, email, message })
            }
            _ => Err(MSG_FIELDS_REQUIRED),
        }
    }
}

/// The only body that ever crosses the HTTP boundary: `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactReply {
    pub message: String,
}

impl ContactReply {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_accepts_complete_entry() {
        let submission = Submission::from_parts(
            Some("Jane".into()),
            Some("jane@example.com".into()),
            Some("Hello".into()),
        )
        .unwrap();
        assert_eq!(submission, Submission::new("Jane", "jane@example.com", "Hello"));
    }

    #[test]
    fn test_from_parts_rejects_empty_name() {
        let res = Submission::from_parts(Some(String::new()), Some("jane@example.com".into()), Some("Hello".into()));
        assert_eq!(res.unwrap_err(), MSG_FIELDS_REQUIRED);
    }

    #[test]
    fn test_from_parts_rejects_missing_fields() {
        assert!(Submission::from_parts(None, Some("a@b.c".into()), Some("Hi".into())).is_err());
        assert!(Submission::from_parts(Some("Jane".into()), None, Some("Hi".into())).is_err());
        assert!(Submission::from_parts(Some("Jane".into()), Some("a@b.c".into()), None).is_err());
    }

    #[test]
    fn test_reply_serializes_message_only() {
        let body = serde_json::to_value(ContactReply::new(MSG_SENT)).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "Message sent successfully." }));
    }
}
