pub mod debouncer;
pub mod orchestrator;
pub mod service;

pub use debouncer::Debouncer;
pub use orchestrator::{FetchJob, FetchOrchestrator, FetchOutcome, StageDelays};
pub use service::MetadataService;
