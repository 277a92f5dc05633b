pub const LARGE_PERSON_GROUP_ID: &str = "requisitoriadosgroup";

#[derive(Debug, Clone)]
pub struct FaceDetectionConfig {
    pub recognition_model: String,
    pub detection_model: String,
    pub return_face_id: bool,
}

impl FaceDetectionConfig {
    pub fn new() -> Self {
        FaceDetectionConfig {
            recognition_model: "recognition_04".to_string(),
            detection_model: "detection_03".to_string(),
            return_face_id: true,
        }
    }

    /// Query string sent with the detect call.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("returnFaceId", self.return_face_id.to_string()),
            ("recognitionModel", self.recognition_model.clone()),
            ("detectionModel", self.detection_model.clone()),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct FaceIdentificationConfig {
    pub large_person_group_id: String,
    pub max_num_of_candidates_returned: u32,
    pub confidence_threshold: f64,
}

impl FaceIdentificationConfig {
    pub fn new() -> Self {
        FaceIdentificationConfig {
            large_person_group_id: LARGE_PERSON_GROUP_ID.to_string(),
            max_num_of_candidates_returned: 1,
            confidence_threshold: 0.6,
        }
    }
}
