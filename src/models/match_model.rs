use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::pipeline::match_pipeline::match_pipeline::FaceMatch;

pub const MATCH_FOUND_MESSAGE: &str = "Coincidencia encontrada";

#[derive(Clone)]
pub struct MatchInput {
    pub im_bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultOutput {
    pub message: String,
    pub person_id: String,
    pub name: Option<String>,
    pub user_data: Option<Value>,
    pub confidence: f64,
}

impl From<FaceMatch> for MatchResultOutput {
    fn from(face_match: FaceMatch) -> Self {
        MatchResultOutput {
            message: MATCH_FOUND_MESSAGE.to_string(),
            person_id: face_match.person_id,
            name: face_match.name,
            user_data: face_match.user_data,
            confidence: face_match.confidence,
        }
    }
}
