pub mod client;
pub mod match_pipeline;
pub mod model_config;
pub mod module;
