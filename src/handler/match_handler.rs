use axum::debug_handler;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use log::{error, info, warn};
use opentelemetry::{global, KeyValue};
use opentelemetry::trace::{Span, Status, TraceContextExt, Tracer};
use uuid::Uuid;
use crate::error::errors::{BadRequestError, Error};
use crate::logger::logger::REQUEST_ID;
use crate::middleware::request_id_mw::request_id;
use crate::models::match_model::{MatchInput, MatchResultOutput};
use crate::response::common_response::{GeneralResponseBuilder, GeneralResponseResult};
use crate::state::match_state::MatchState;

pub const IMAGE_FIELD: &str = "image";

#[debug_handler(state = MatchState)]
pub async fn detect_and_identify(
    headers: HeaderMap,
    State(state): State<MatchState>,
    payload: Result<Multipart, MultipartRejection>,
) -> GeneralResponseResult<MatchResultOutput> {
    let request_id = request_id(&headers).unwrap_or_else(|| Uuid::new_v4().to_string());
    REQUEST_ID
        .scope(request_id.clone(), handle_detect_and_identify(request_id, state, payload))
        .await
}

async fn handle_detect_and_identify(
    request_id: String,
    state: MatchState,
    payload: Result<Multipart, MultipartRejection>,
) -> GeneralResponseResult<MatchResultOutput> {
    let tracer = global::tracer(state.app_name.to_string());
    let parent_ctx = opentelemetry::Context::new();
    let span = tracer
        .span_builder("detect-and-identify")
        .with_attributes(vec![KeyValue::new("request_id", request_id)])
        .start_with_context(&tracer, &parent_ctx);
    let child_ctx = parent_ctx.with_span(span);

    info!("received detect-and-identify request");

    let mut child = tracer.start_with_context("marshal-request", &child_ctx);
    let im_bytes = match read_image(payload).await {
        Ok(im_bytes) => im_bytes,
        Err(e) => {
            warn!("rejected request: {e}");
            child.set_status(Status::error(e.to_string()));
            child.end();
            return Err(e);
        }
    };
    child.end();

    let mut child = tracer.start_with_context("match-face", &child_ctx);
    let result = state.match_service.detect_and_identify(MatchInput { im_bytes }).await;
    match &result {
        Ok(_) => info!("completed detect-and-identify request"),
        Err(e) if e.status_code() == StatusCode::NOT_FOUND => info!("no match: {e}"),
        Err(e) => {
            error!("detect-and-identify failed: {e}");
            child.set_status(Status::error(e.to_string()));
        }
    }
    child.end();

    let output = result?;
    Ok(GeneralResponseBuilder::new()
        .status_code(StatusCode::OK)
        .body(output)
        .build()
    )
}

/// Extracts the single `image` field of the multipart body.
async fn read_image(payload: Result<Multipart, MultipartRejection>) -> Result<Bytes, Error> {
    let mut payload = match payload {
        Ok(payload) => payload,
        Err(e) => {
            warn!("request is not multipart: {}", e.body_text());
            return Err(Error::missing_image());
        }
    };

    let mut image: Option<Bytes> = None;
    while let Some(field) = payload
        .next_field()
        .await
        .map_err(|e| BadRequestError::InvalidPayload(e.body_text()))?
    {
        // plain text parts are not uploads, even when named `image`
        if field.name() != Some(IMAGE_FIELD) || field.file_name().is_none() {
            continue;
        }
        if image.is_some() {
            return Err(BadRequestError::DuplicateImage.into());
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| BadRequestError::InvalidPayload(e.body_text()))?;
        if data.is_empty() {
            return Err(BadRequestError::EmptyImage.into());
        }
        image = Some(data);
    }

    image.ok_or_else(Error::missing_image)
}
