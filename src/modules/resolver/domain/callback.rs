use crate::log_debug;
use crate::modules::catalog::domain::entities::{BasicDetails, DetailedMovieInfo};
use tokio::sync::mpsc::UnboundedSender;

/// Receiver of resolution results for one request.
///
/// Methods are called from worker tasks. Implementations that need to run on
/// a particular task should forward the values, e.g. through the channel
/// adapter below.
pub trait PosterCallback: Send + Sync {
    /// Poster URL, or `None` when the lookup ended without a usable image
    fn on_image_url(&self, url: Option<String>);

    fn on_backdrop_url(&self, _url: String) {}

    fn on_basic_details(&self, _details: BasicDetails) {}

    /// Terminal notification for a scheduled lookup
    fn on_detailed_info(&self, info: Option<DetailedMovieInfo>);
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackEvent {
    ImageUrl(Option<String>),
    BackdropUrl(String),
    BasicDetails(BasicDetails),
    DetailedInfo(Option<Box<DetailedMovieInfo>>),
}

impl CallbackEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallbackEvent::DetailedInfo(_))
    }
}

impl PosterCallback for UnboundedSender<CallbackEvent> {
    fn on_image_url(&self, url: Option<String>) {
        forward(self, CallbackEvent::ImageUrl(url));
    }

    fn on_backdrop_url(&self, url: String) {
        forward(self, CallbackEvent::BackdropUrl(url));
    }

    fn on_basic_details(&self, details: BasicDetails) {
        forward(self, CallbackEvent::BasicDetails(details));
    }

    fn on_detailed_info(&self, info: Option<DetailedMovieInfo>) {
        forward(self, CallbackEvent::DetailedInfo(info.map(Box::new)));
    }
}

fn forward(sender: &UnboundedSender<CallbackEvent>, event: CallbackEvent) {
    if sender.send(event).is_err() {
        log_debug!("Callback receiver dropped, discarding event");
    }
}
