pub mod application;
pub mod domain;
pub mod worker;

pub use application::{FetchOutcome, MetadataService};
pub use domain::{CallbackEvent, PosterCallback, PosterRequest, Resolution};
pub use worker::{FetchQueue, FetchWorker};
