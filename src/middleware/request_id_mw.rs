use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::{header, HeaderMap};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Keeps a caller supplied `x-request-id`, otherwise generates one.
pub async fn generate_request_id_mw(mut req: Request, next: Next) -> Response {
    if request_id(req.headers()).is_none() {
        let request_id = Uuid::new_v4().to_string();
        if let Ok(value) = header::HeaderValue::from_str(&request_id) {
            req.headers_mut().insert(header::HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
    }

    next.run(req).await
}

pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}
