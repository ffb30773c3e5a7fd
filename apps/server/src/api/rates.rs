use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use ratecast_core::errors::{Error as CoreError, ValidationError};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Debug, Deserialize)]
struct RateParams {
    crypto_currency: Option<String>,
    fiat_currency: Option<String>,
}

fn required(value: Option<String>, field: &str) -> ApiResult<String> {
    value.ok_or_else(|| CoreError::from(ValidationError::MissingField(field.to_string())).into())
}

async fn get_rate(
    State(state): State<Arc<AppState>>,
    params: Result<Query<RateParams>, QueryRejection>,
) -> ApiResult<Json<f64>> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let crypto = required(params.crypto_currency, "crypto_currency")?;
    let fiat = required(params.fiat_currency, "fiat_currency")?;

    let ctx = state.request_context();
    let rate = state.rate_service.get_rate(&ctx, &crypto, &fiat).await?;
    tracing::info!("Rate {}/{} = {}", crypto, fiat, rate);
    Ok(Json(rate))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/rate", get(get_rate))
}
