use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, Router};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::panic_response, main_lib::AppState};

mod health;
mod rates;
mod subscriptions;

/// Headroom the outer timeout layer leaves after the request deadline, so
/// handlers report `DeadlineExceeded` with an error body first.
pub const TIMEOUT_LAYER_SLACK: Duration = Duration::from_secs(1);

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let layer_timeout = state.request_timeout + TIMEOUT_LAYER_SLACK;

    let api = Router::new()
        .merge(health::router())
        .merge(rates::router())
        .merge(subscriptions::router());

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        // Set must wrap Propagate so the generated id reaches the response
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(layer_timeout))
        .layer(TraceLayer::new_for_http())
}
