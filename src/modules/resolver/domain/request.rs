use crate::modules::cache::domain::CacheEntry;

/// One poster lookup as submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PosterRequest {
    /// Raw video title, possibly noisy
    pub title: String,
    /// Free text that may carry an explicit catalog id
    pub description: Option<String>,
    /// Stable caller-side id, enables the persistent cache
    pub video_id: Option<String>,
}

impl PosterRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }
}

/// Immediate outcome of `resolve_poster`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Served from cache, callbacks already fired
    Cached(CacheEntry),
    /// A fetch job was scheduled under this generation
    Scheduled { generation: u64 },
    /// Nothing to look up, a null poster was reported
    NoResult,
}

impl Resolution {
    pub fn is_cached(&self) -> bool {
        matches!(self, Resolution::Cached(_))
    }
}
