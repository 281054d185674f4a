use crate::modules::catalog::domain::entities::DetailedMovieInfo;
use dashmap::DashMap;

/// Process-lifetime store of detailed metadata keyed by stable video id.
///
/// Storing a record also projects its first genre into a separate
/// primary-genre map that outlives later record replacement without genres.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    details: DashMap<String, DetailedMovieInfo>,
    primary_genres: DashMap<String, String>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, video_id: &str, info: DetailedMovieInfo) {
        if let Some(genre) = info.primary_genre() {
            self.primary_genres
                .insert(video_id.to_string(), genre.to_string());
        }
        self.details.insert(video_id.to_string(), info);
    }

    pub fn get(&self, video_id: &str) -> Option<DetailedMovieInfo> {
        self.details.get(video_id).map(|entry| entry.value().clone())
    }

    /// Mutates only the certification of an existing record.
    /// Returns false when there is no record for the video.
    pub fn update_certification(&self, video_id: &str, certification: &str) -> bool {
        match self.details.get_mut(video_id) {
            Some(mut entry) => {
                entry.certification = Some(certification.to_string());
                true
            }
            None => false,
        }
    }

    pub fn primary_genre(&self, video_id: &str) -> Option<String> {
        self.primary_genres
            .get(video_id)
            .map(|g| g.value().clone())
            .or_else(|| {
                self.details
                    .get(video_id)
                    .and_then(|info| info.primary_genre().map(str::to_string))
            })
    }

    /// All genres of the stored record, empty when unknown
    pub fn all_genres(&self, video_id: &str) -> Vec<String> {
        self.details
            .get(video_id)
            .map(|info| info.genres.clone())
            .unwrap_or_default()
    }

    pub fn has_genre_data(&self, video_id: &str) -> bool {
        self.primary_genres.contains_key(video_id)
    }

    pub fn videos_with_genre_data(&self) -> Vec<String> {
        self.primary_genres
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn clear(&self) {
        self.details.clear();
        self.primary_genres.clear();
    }
}
