use std::sync::Arc;
use bytes::Bytes;
use serde_json::Value;
use crate::error::errors::Error;
use crate::pipeline::client::face_api_client::FaceApiClient;
use crate::pipeline::model_config::config::{FaceDetectionConfig, FaceIdentificationConfig};
use crate::pipeline::module::face_detection::FaceDetection;
use crate::pipeline::module::face_identification::FaceIdentification;
use crate::pipeline::module::person_profile::PersonProfileLookup;

/// Detect → identify → resolve profile, each step fed by the previous one.
#[derive(Clone)]
pub struct MatchPipeline {
    face_detection: FaceDetection,
    face_identification: FaceIdentification,
    person_profile: PersonProfileLookup,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaceMatch {
    pub person_id: String,
    pub name: Option<String>,
    pub user_data: Option<Value>,
    pub confidence: f64,
}

impl MatchPipeline {
    pub fn new(client: Arc<dyn FaceApiClient>) -> Self {
        let face_identification = FaceIdentification::new(client.clone(), FaceIdentificationConfig::new());
        let person_profile = PersonProfileLookup::new(client.clone(), face_identification.large_person_group_id());

        MatchPipeline {
            face_detection: FaceDetection::new(client, FaceDetectionConfig::new()),
            face_identification,
            person_profile,
        }
    }

    pub async fn run(&self, im_bytes: &Bytes) -> Result<FaceMatch, Error> {
        let face_id = self.face_detection.detect(im_bytes).await?;
        let candidate = self.face_identification.identify(&face_id).await?;
        let profile = self.person_profile.resolve(&candidate.person_id).await?;

        Ok(FaceMatch {
            person_id: candidate.person_id,
            name: profile.name,
            user_data: profile.user_data,
            confidence: candidate.confidence,
        })
    }
}
