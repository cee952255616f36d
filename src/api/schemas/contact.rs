use crate::domain::contact::Submission;
use serde::Deserialize;

/// Wire shape of `POST /contact`. Fields are optional so absence is reported as a
/// validation failure rather than a decoding one.
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactRequest {
    /// Validates the contact payload.
    ///
    /// # Errors
    /// Returns the caller-facing message if any field is missing or empty.
    pub fn validate(self) -> Result<Submission, String> {
        Submission::from_parts(self.name, self.email, self.message).map_err(str::to_string)
    }
}
