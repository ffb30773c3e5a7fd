use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ratecast_core::errors::Error as CoreError;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::AlreadySubscribed(_) => StatusCode::CONFLICT,
                CoreError::DeadlineExceeded => StatusCode::REQUEST_TIMEOUT,
                CoreError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            ApiError::Core(CoreError::AllDeliveriesFailed { failed_recipients }) => {
                Some(json!({ "failedEmails": failed_recipients }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::info!("client error: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
            details: self.details(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Response for a handler that panicked.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    let body = Json(ErrorBody {
        code: status.as_u16(),
        message: "Internal server error".to_string(),
        details: None,
    });
    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratecast_core::errors::ValidationError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                CoreError::Validation(ValidationError::InvalidEmail("x".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::AlreadySubscribed("a@x.io".into()),
                StatusCode::CONFLICT,
            ),
            (CoreError::DeadlineExceeded, StatusCode::REQUEST_TIMEOUT),
            (CoreError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
            (
                CoreError::Store("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CoreError::AllDeliveriesFailed {
                    failed_recipients: vec![],
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(
            ApiError::BadRequest("bad form".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_panic_response_hides_panic_message() {
        let response = panic_response(Box::new("secret state"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
