use crate::{
    modules::cache::domain::entities::{CacheEntry, CacheField},
    shared::errors::AppResult,
};

/// Durable video-id keyed store for artwork URLs and genres.
///
/// Reads only return fresh rows. Stale rows stay on disk until
/// `purge_expired` runs. Calls block on the database and are expected to run
/// on a blocking-friendly thread.
pub trait PosterCacheRepository: Send + Sync {
    /// Fresh poster row for the video, with the fresh genre if there is one
    fn get_entry(&self, video_id: &str) -> AppResult<Option<CacheEntry>>;

    fn get_field(&self, video_id: &str, field: CacheField) -> AppResult<Option<String>>;

    fn get_poster_url(&self, video_id: &str) -> AppResult<Option<String>> {
        self.get_field(video_id, CacheField::PosterUrl)
    }

    fn get_backdrop_url(&self, video_id: &str) -> AppResult<Option<String>> {
        self.get_field(video_id, CacheField::BackdropUrl)
    }

    fn get_genre(&self, video_id: &str) -> AppResult<Option<String>> {
        self.get_field(video_id, CacheField::Genre)
    }

    /// Upsert the provided URLs. Omitted fields keep their stored value and
    /// the row timestamp is refreshed.
    fn put(
        &self,
        video_id: &str,
        poster_url: Option<&str>,
        backdrop_url: Option<&str>,
    ) -> AppResult<()>;

    fn put_genre(&self, video_id: &str, genre: &str) -> AppResult<()>;

    /// Delete stale rows across all tables, returning how many were removed
    fn purge_expired(&self) -> AppResult<usize>;
}
