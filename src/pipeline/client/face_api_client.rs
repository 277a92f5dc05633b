use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::errors::UpstreamError;
use crate::pipeline::model_config::config::{FaceDetectionConfig, FaceIdentificationConfig};

pub const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

/// One entry of the detect response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    #[serde(default)]
    pub face_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyRequest {
    pub face_ids: Vec<String>,
    pub large_person_group_id: String,
    pub max_num_of_candidates_returned: u32,
    pub confidence_threshold: f64,
}

impl IdentifyRequest {
    pub fn new(face_id: &str, config: &FaceIdentificationConfig) -> Self {
        IdentifyRequest {
            face_ids: vec![face_id.to_string()],
            large_person_group_id: config.large_person_group_id.clone(),
            max_num_of_candidates_returned: config.max_num_of_candidates_returned,
            confidence_threshold: config.confidence_threshold,
        }
    }
}

/// Identification outcome for one submitted face.
#[allow(dead_code)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyResult {
    #[serde(default)]
    pub face_id: Option<String>,
    pub candidates: Vec<IdentifyCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyCandidate {
    pub person_id: String,
    pub confidence: f64,
}

/// Person record stored in a large person group.
#[allow(dead_code)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_data: Option<Value>,
}

/// Outbound calls against the face service. Each call is a single round trip.
#[async_trait]
pub trait FaceApiClient: Send + Sync {
    async fn detect(&self, image: Bytes, config: &FaceDetectionConfig) -> Result<Vec<DetectedFace>, UpstreamError>;

    async fn identify(&self, request: &IdentifyRequest) -> Result<Vec<IdentifyResult>, UpstreamError>;

    async fn get_person(&self, large_person_group_id: &str, person_id: &str) -> Result<PersonProfile, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    #[test]
    fn test_identify_request_wire_format() {
        let request = IdentifyRequest::new("f1", &FaceIdentificationConfig::new());
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body, json!({
            "faceIds": ["f1"],
            "largePersonGroupId": "requisitoriadosgroup",
            "maxNumOfCandidatesReturned": 1,
            "confidenceThreshold": 0.6,
        }));
    }

    #[test]
    fn test_detected_face_without_id() {
        let faces: Vec<DetectedFace> = serde_json::from_value(json!([
            { "faceRectangle": { "top": 1, "left": 2, "width": 3, "height": 4 } }
        ])).unwrap();

        assert_eq!(faces.len(), 1);
        assert!(faces[0].face_id.is_none());
    }

    #[test]
    fn test_identify_result_requires_candidates() {
        let result = serde_json::from_value::<Vec<IdentifyResult>>(json!([{ "faceId": "f1" }]));
        assert!(result.is_err());
    }

    #[test]
    fn test_person_profile_with_structured_user_data() {
        let profile: PersonProfile = serde_json::from_value(json!({
            "personId": "p1",
            "name": "Jane Doe",
            "userData": { "case": 1234 },
            "persistedFaceIds": ["a", "b"],
        })).unwrap();

        assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
        assert_eq!(profile.user_data, Some(json!({ "case": 1234 })));
    }

    #[test]
    fn test_person_profile_null_user_data() {
        let profile: PersonProfile = serde_json::from_value(json!({
            "personId": "p1",
            "name": "Jane Doe",
            "userData": null,
        })).unwrap();

        assert!(profile.user_data.is_none());
    }
}
