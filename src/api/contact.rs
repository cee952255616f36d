use crate::api::AppState;
use crate::api::schemas::contact::ContactRequest;
use crate::domain::contact::{ContactReply, MSG_FIELDS_REQUIRED, MSG_SENT};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn submit(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable contact payload");
            state.contact_service.record_rejected();
            return Err(AppError::BadRequest(MSG_FIELDS_REQUIRED.to_string()));
        }
    };

    let submission = payload.validate().map_err(|msg| {
        state.contact_service.record_rejected();
        AppError::BadRequest(msg)
    })?;

    state.contact_service.submit(&submission).await?;
    Ok((StatusCode::OK, Json(ContactReply::new(MSG_SENT))))
}
