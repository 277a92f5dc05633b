use std::sync::Arc;
use bytes::Bytes;
use log::{error, info};
use crate::error::errors::Error;
use crate::pipeline::client::face_api_client::FaceApiClient;
use crate::pipeline::model_config::config::FaceDetectionConfig;

#[derive(Clone)]
pub struct FaceDetection {
    client: Arc<dyn FaceApiClient>,
    config: FaceDetectionConfig,
}

impl FaceDetection {
    pub fn new(client: Arc<dyn FaceApiClient>, config: FaceDetectionConfig) -> Self {
        FaceDetection {
            client,
            config,
        }
    }

    /// Returns the face id of the first detected face.
    pub async fn detect(&self, im_bytes: &Bytes) -> Result<String, Error> {
        let faces = self.client.detect(im_bytes.clone(), &self.config).await.map_err(|e| {
            error!("face detection call failed: {e}");
            Error::from(e)
        })?;

        let first_face = match faces.first() {
            Some(face) => face,
            None => {
                info!("no face detected");
                return Err(Error::no_face_detected());
            }
        };
        info!("detected {} face(s)", faces.len());

        match first_face.face_id.as_deref() {
            Some(face_id) if !face_id.is_empty() => Ok(face_id.to_string()),
            _ => {
                error!("detection response has no faceId");
                Err(Error::detection_malformed())
            }
        }
    }
}
