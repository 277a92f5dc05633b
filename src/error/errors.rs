use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::{Map, Value};

pub const MISSING_IMAGE_MESSAGE: &str = "No se proporcionó ninguna imagen.";
pub const NO_FACE_MESSAGE: &str = "No se detectaron rostros en la imagen.";
pub const NO_MATCH_MESSAGE: &str = "No se encontraron coincidencias en el grupo.";
pub const MISSING_FACE_ID_MESSAGE: &str = "No se pudo obtener un faceId de la imagen.";

/// Key used for the single field of a failure body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyKey {
    Error,
    Message,
}

impl BodyKey {
    fn as_str(&self) -> &'static str {
        match self {
            BodyKey::Error => "error",
            BodyKey::Message => "message",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    BadRequest(#[from] BadRequestError),

    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    #[error("Error en la solicitud: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Server(#[from] ServerError),
}

impl Error {
    fn get_codes(&self) -> (StatusCode, BodyKey) {
        match *self {
            // 4XX
            Error::BadRequest(_) => (StatusCode::BAD_REQUEST, BodyKey::Error),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, BodyKey::Message),

            // 5XX
            Error::Upstream(_) => (StatusCode::INTERNAL_SERVER_ERROR, BodyKey::Error),
            Error::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, BodyKey::Error),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.get_codes().0
    }

    pub fn missing_image() -> Self {
        Error::BadRequest(BadRequestError::MissingImage)
    }

    pub fn no_face_detected() -> Self {
        Error::NotFound(NotFoundError::NoFaceDetected)
    }

    pub fn no_match_found() -> Self {
        Error::NotFound(NotFoundError::NoMatchFound)
    }

    pub fn detection_malformed() -> Self {
        Error::Server(ServerError::DetectionMalformed)
    }

    pub fn request_timeout(seconds: u64) -> Self {
        Error::Server(ServerError::RequestTimeout(seconds))
    }

    pub fn unexpected(cause: impl ToString) -> Self {
        Error::Server(ServerError::Unexpected(cause.to_string()))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, key) = self.get_codes();
        let mut body = Map::new();
        body.insert(key.as_str().to_string(), Value::String(self.to_string()));

        (status_code, Json(Value::Object(body))).into_response()
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BadRequestError {
    #[error("{}", MISSING_IMAGE_MESSAGE)]
    MissingImage,
    #[error("La imagen está vacía.")]
    EmptyImage,
    #[error("Solo se permite una imagen por solicitud.")]
    DuplicateImage,
    #[error("Solicitud multipart inválida: {0}")]
    InvalidPayload(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NotFoundError {
    #[error("{}", NO_FACE_MESSAGE)]
    NoFaceDetected,
    #[error("{}", NO_MATCH_MESSAGE)]
    NoMatchFound,
}

/// Failure of one outbound call to the face service.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("timeout calling {url}: {message}")]
    Timeout { url: String, message: String },
    #[error("network error calling {url}: {message}")]
    Network { url: String, message: String },
    #[error("{status} from {url}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ServerError {
    #[error("{}", MISSING_FACE_ID_MESSAGE)]
    DetectionMalformed,
    #[error("La solicitud excedió el tiempo máximo de {0} segundos.")]
    RequestTimeout(u64),
    #[error("Error inesperado: {0}")]
    Unexpected(String),
}
