pub mod assemble;
pub mod calendar;
pub mod config;
pub mod dataset;
pub mod derive;
pub mod detect;
pub mod engine;
pub mod error;
pub mod geo;
pub mod registry;
pub mod storage;

pub use config::AppConfig;
pub use dataset::Dataset;
pub use engine::{PipelineEngine, PipelineResult};
pub use error::Error;
pub use registry::UserRegistry;
