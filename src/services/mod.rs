pub mod cache;
pub mod classifier;
pub mod composer;
pub mod key_points;
pub mod llm;
pub mod orchestrator;
pub mod prompts;
pub mod segmenter;
pub mod strategy;
