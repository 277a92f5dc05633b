use std::time::Duration;

use axum::{BoxError, Json, middleware, Router};
use axum::error_handling::HandleErrorLayer;
use axum::http::header;
use axum::routing::{get, IntoMakeService};
use http::{Method, StatusCode, Uri};
use log::{error, warn};
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::propagate_header::PropagateHeaderLayer;
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use crate::config::settings::Server;
use crate::error::errors::Error;
use crate::middleware::request_id_mw::{generate_request_id_mw, REQUEST_ID_HEADER};
use crate::pipeline::client::face_api_client::SUBSCRIPTION_KEY_HEADER;
use crate::response::common_response::{GeneralResponseBuilder, GeneralResponseResult, MessageResponse};
use crate::routes::match_route::new_match_route;
use crate::state::match_state::MatchState;

const DEFAULT_REQUEST_TIMEOUT: u64 = 60;
const DEFAULT_BODY_LIMIT_MB: usize = 16;

pub fn build_router(match_state: MatchState, server: &Server) -> Router {
    let request_timeout_duration = server.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
    let body_limit = server.body_limit_mb.unwrap_or(DEFAULT_BODY_LIMIT_MB) * 1024 * 1024;

    let sensitive_headers = [
        header::AUTHORIZATION,
        header::HeaderName::from_static(SUBSCRIPTION_KEY_HEADER),
    ];

    // innermost; its JSON reply still passes the request id and CORS layers
    let request_timeout = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(move |err: BoxError| async move {
            request_timeout_error(err, request_timeout_duration)
        }))
        .timeout(Duration::from_secs(request_timeout_duration));

    Router::new()
        .route("/health", get(healthcheck))
        .merge(new_match_route(body_limit))
        .with_state(match_state)
        .fallback(fallback)
        .layer(request_timeout)
        .layer(CompressionLayer::new())
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(REQUEST_ID_HEADER)))
        .layer(CorsLayer::permissive().allow_methods([Method::GET, Method::POST, Method::HEAD, Method::OPTIONS]))
        .layer(middleware::from_fn(generate_request_id_mw))
        .layer(SetSensitiveHeadersLayer::new(sensitive_headers))
}

fn request_timeout_error(err: BoxError, seconds: u64) -> Error {
    if err.is::<Elapsed>() {
        warn!("request exceeded the {seconds}s deadline");
        Error::request_timeout(seconds)
    } else {
        error!("unhandled middleware error: {err}");
        Error::unexpected(err)
    }
}

pub fn root_routes(match_state: MatchState, server: &Server) -> IntoMakeService<Router> {
    build_router(match_state, server).into_make_service()
}

async fn fallback(uri: Uri) -> (StatusCode, Json<MessageResponse>) {
    (StatusCode::NOT_FOUND, Json(MessageResponse {
        message: format!("No route for {uri}"),
    }))
}

async fn healthcheck() -> GeneralResponseResult<MessageResponse> {
    Ok(GeneralResponseBuilder::new()
        .status_code(StatusCode::OK)
        .body(MessageResponse {
            message: "OK".to_string(),
        })
        .build())
}
