use std::sync::Arc;
use log::{error, info, warn};
use crate::error::errors::Error;
use crate::pipeline::client::face_api_client::{FaceApiClient, IdentifyCandidate, IdentifyRequest};
use crate::pipeline::model_config::config::FaceIdentificationConfig;

#[derive(Clone)]
pub struct FaceIdentification {
    client: Arc<dyn FaceApiClient>,
    config: FaceIdentificationConfig,
}

impl FaceIdentification {
    pub fn new(client: Arc<dyn FaceApiClient>, config: FaceIdentificationConfig) -> Self {
        FaceIdentification {
            client,
            config,
        }
    }

    pub fn large_person_group_id(&self) -> &str {
        &self.config.large_person_group_id
    }

    /// Best candidate for `face_id` within the configured group.
    pub async fn identify(&self, face_id: &str) -> Result<IdentifyCandidate, Error> {
        let request = IdentifyRequest::new(face_id, &self.config);
        let results = self.client.identify(&request).await.map_err(|e| {
            error!("face identification call failed: {e}");
            Error::from(e)
        })?;

        // only the first result/candidate is considered
        let candidate = match results.into_iter().next().and_then(|r| r.candidates.into_iter().next()) {
            Some(candidate) => candidate,
            None => {
                info!("no candidate in group {}", self.config.large_person_group_id);
                return Err(Error::no_match_found());
            }
        };

        if candidate.confidence < self.config.confidence_threshold {
            warn!(
                "candidate {} below threshold ({} < {})",
                candidate.person_id, candidate.confidence, self.config.confidence_threshold
            );
            return Err(Error::no_match_found());
        }

        info!("identified person {} with confidence {}", candidate.person_id, candidate.confidence);
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::errors::NotFoundError;
    use crate::pipeline::client::face_api_client::IdentifyResult;
    use crate::pipeline::client::stub_face_client::{network_error, StubFaceClient};
    use super::*;

    fn identification_with(stub: StubFaceClient) -> FaceIdentification {
        FaceIdentification::new(Arc::new(stub), FaceIdentificationConfig::new())
    }

    fn result_with(candidates: Vec<IdentifyCandidate>) -> IdentifyResult {
        IdentifyResult { face_id: Some("f1".to_string()), candidates }
    }

    fn candidate(person_id: &str, confidence: f64) -> IdentifyCandidate {
        IdentifyCandidate { person_id: person_id.to_string(), confidence }
    }

    #[tokio::test]
    async fn test_first_candidate() {
        let identification = identification_with(StubFaceClient::matching().with_identify_results(vec![
            result_with(vec![candidate("p1", 0.9), candidate("p2", 0.95)]),
        ]));

        assert_eq!(identification.identify("f1").await.unwrap(), candidate("p1", 0.9));
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let identification = identification_with(StubFaceClient::matching().with_identify_results(vec![
            result_with(vec![candidate("p1", 0.6)]),
        ]));

        assert_eq!(identification.identify("f1").await.unwrap().confidence, 0.6);
    }

    #[tokio::test]
    async fn test_below_threshold() {
        let identification = identification_with(StubFaceClient::matching().with_identify_results(vec![
            result_with(vec![candidate("p1", 0.59)]),
        ]));

        let err = identification.identify("f1").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(NotFoundError::NoMatchFound)));
    }

    #[tokio::test]
    async fn test_empty_results_and_candidates() {
        for results in [vec![], vec![result_with(vec![])]] {
            let identification = identification_with(StubFaceClient::matching().with_identify_results(results));

            let err = identification.identify("f1").await.unwrap_err();
            assert!(matches!(err, Error::NotFound(NotFoundError::NoMatchFound)));
        }
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let identification = identification_with(StubFaceClient::matching().with_identify_error(network_error("identify")));

        let err = identification.identify("f1").await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }
}
