use std::sync::Arc;
use log::info;
use crate::error::errors::Error;
use crate::models::match_model::{MatchInput, MatchResultOutput};
use crate::pipeline::match_pipeline::match_pipeline::MatchPipeline;

#[derive(Clone)]
pub struct MatchService {
    match_pipeline: Arc<MatchPipeline>,
}

impl MatchService {
    pub fn new(match_pipeline: &Arc<MatchPipeline>) -> Self {
        MatchService {
            match_pipeline: Arc::clone(match_pipeline),
        }
    }

    pub async fn detect_and_identify(&self, input: MatchInput) -> Result<MatchResultOutput, Error> {
        let result = self.match_pipeline.run(&input.im_bytes).await?;
        drop(input.im_bytes);

        info!("matched person {} (confidence {})", result.person_id, result.confidence);
        Ok(MatchResultOutput::from(result))
    }
}
