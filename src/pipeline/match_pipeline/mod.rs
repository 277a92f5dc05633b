pub mod match_pipeline;
