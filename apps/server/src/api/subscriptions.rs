use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    routing::post,
    Form, Json, Router,
};
use ratecast_core::errors::{Error as CoreError, ValidationError};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Debug, Deserialize)]
struct SubscribeForm {
    email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailsResponse {
    failed_emails: Vec<String>,
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SubscribeForm>, FormRejection>,
) -> ApiResult<()> {
    let Form(form) = form.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let email = form
        .email
        .ok_or_else(|| CoreError::from(ValidationError::MissingField("email".to_string())))?;

    state
        .subscriber_service
        .subscribe(&state.request_context(), &email)
        .await?;
    tracing::info!("Subscribed {}", email);
    Ok(())
}

async fn send_emails(State(state): State<Arc<AppState>>) -> ApiResult<Json<SendEmailsResponse>> {
    let result = state
        .notification_service
        .broadcast(&state.request_context())
        .await?;
    Ok(Json(SendEmailsResponse {
        failed_emails: result.failed_recipients,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/subscribe", post(subscribe))
        .route("/sendEmails", post(send_emails))
}
