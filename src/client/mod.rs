//! Browser-side half of the contact flow: draft state, local validation, the HTTP call,
//! and the status a view renders.

pub mod form;
pub mod http;

pub use form::{
    Draft, Field, FormController, FormStatus, MSG_ALREADY_SENDING, SubmissionResult, ValidationError, validate,
};
pub use http::{ClientError, ContactClient};
