pub mod callback;
pub mod generation;
pub mod request;

pub use callback::{CallbackEvent, PosterCallback};
pub use generation::{GenerationToken, GenerationTracker};
pub use request::{PosterRequest, Resolution};
