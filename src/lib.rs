pub mod config;
pub mod discovery;
pub mod staging;
pub mod builder;
pub mod manifest;
pub mod pipeline;
pub mod cli;

pub use config::StageConfig;
pub use manifest::GameManifest;
pub use pipeline::{StagePipeline, StageReport};
