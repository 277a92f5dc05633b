use std::sync::Arc;
use crate::pipeline::match_pipeline::match_pipeline::MatchPipeline;
use crate::service::match_service::MatchService;

#[derive(Clone)]
pub struct MatchState {
    pub match_service: MatchService,
    pub app_name: Arc<str>,
}

impl MatchState {
    pub fn new(pipeline: &Arc<MatchPipeline>, app_name: &str) -> Self {
        Self {
            match_service: MatchService::new(pipeline),
            app_name: Arc::from(app_name),
        }
    }
}
