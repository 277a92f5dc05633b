use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use bytes::Bytes;
use crate::error::errors::UpstreamError;
use crate::pipeline::client::face_api_client::{DetectedFace, FaceApiClient, IdentifyCandidate, IdentifyRequest, IdentifyResult, PersonProfile};
use crate::pipeline::model_config::config::FaceDetectionConfig;

/// Canned face service replies with per-endpoint call counters.
pub struct StubFaceClient {
    pub detect_reply: Result<Vec<DetectedFace>, UpstreamError>,
    pub identify_reply: Result<Vec<IdentifyResult>, UpstreamError>,
    pub person_reply: Result<PersonProfile, UpstreamError>,
    pub detect_delay: Option<Duration>,
    pub detect_calls: AtomicUsize,
    pub identify_calls: AtomicUsize,
    pub person_calls: AtomicUsize,
}

impl StubFaceClient {
    /// f1 → p1 (0.82) → Jane Doe / case-1234.
    pub fn matching() -> Self {
        StubFaceClient {
            detect_reply: Ok(vec![DetectedFace { face_id: Some("f1".to_string()) }]),
            identify_reply: Ok(vec![IdentifyResult {
                face_id: Some("f1".to_string()),
                candidates: vec![IdentifyCandidate { person_id: "p1".to_string(), confidence: 0.82 }],
            }]),
            person_reply: Ok(PersonProfile {
                person_id: Some("p1".to_string()),
                name: Some("Jane Doe".to_string()),
                user_data: Some(serde_json::Value::String("case-1234".to_string())),
            }),
            detect_delay: None,
            detect_calls: AtomicUsize::new(0),
            identify_calls: AtomicUsize::new(0),
            person_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_faces(mut self, faces: Vec<DetectedFace>) -> Self {
        self.detect_reply = Ok(faces);
        self
    }

    /// Detect answers only after `delay`.
    pub fn with_detect_delay(mut self, delay: Duration) -> Self {
        self.detect_delay = Some(delay);
        self
    }

    pub fn with_detect_error(mut self, err: UpstreamError) -> Self {
        self.detect_reply = Err(err);
        self
    }

    pub fn with_identify_results(mut self, results: Vec<IdentifyResult>) -> Self {
        self.identify_reply = Ok(results);
        self
    }

    pub fn with_identify_error(mut self, err: UpstreamError) -> Self {
        self.identify_reply = Err(err);
        self
    }

    pub fn with_person(mut self, person: PersonProfile) -> Self {
        self.person_reply = Ok(person);
        self
    }

    pub fn with_person_error(mut self, err: UpstreamError) -> Self {
        self.person_reply = Err(err);
        self
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.detect_calls.load(Ordering::SeqCst),
            self.identify_calls.load(Ordering::SeqCst),
            self.person_calls.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl FaceApiClient for StubFaceClient {
    async fn detect(&self, _image: Bytes, _config: &FaceDetectionConfig) -> Result<Vec<DetectedFace>, UpstreamError> {
        self.detect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.detect_delay {
            tokio::time::sleep(delay).await;
        }
        self.detect_reply.clone()
    }

    async fn identify(&self, _request: &IdentifyRequest) -> Result<Vec<IdentifyResult>, UpstreamError> {
        self.identify_calls.fetch_add(1, Ordering::SeqCst);
        self.identify_reply.clone()
    }

    async fn get_person(&self, _large_person_group_id: &str, _person_id: &str) -> Result<PersonProfile, UpstreamError> {
        self.person_calls.fetch_add(1, Ordering::SeqCst);
        self.person_reply.clone()
    }
}

pub fn network_error(path: &str) -> UpstreamError {
    UpstreamError::Network {
        url: format!("http://face.test/face/v1.0/{path}"),
        message: "connection reset".to_string(),
    }
}
