use super::movie::{MovieDetails, MovieSummary};
use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const NO_OVERVIEW: &str = "No overview available";

const MAX_CAST: usize = 10;

/// Builds absolute image URLs from catalog-relative paths
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUrls {
    pub poster_base: String,
    pub backdrop_base: String,
}

impl ImageUrls {
    pub fn new(poster_base: impl Into<String>, backdrop_base: impl Into<String>) -> Self {
        Self {
            poster_base: poster_base.into(),
            backdrop_base: backdrop_base.into(),
        }
    }

    pub fn poster(&self, path: Option<&str>) -> Option<String> {
        join_path(&self.poster_base, path)
    }

    pub fn backdrop(&self, path: Option<&str>) -> Option<String> {
        join_path(&self.backdrop_base, path)
    }
}

fn join_path(base: &str, path: Option<&str>) -> Option<String> {
    match path {
        Some(p) if !p.is_empty() => Some(format!("{}{}", base, p)),
        _ => None,
    }
}

/// Year portion of a `YYYY-MM-DD` release date
pub fn release_year(release_date: Option<&str>) -> String {
    release_date
        .filter(|d| d.chars().count() >= 4)
        .map(|d| d.chars().take(4).collect())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Partial result delivered as soon as a match is selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicDetails {
    pub title: String,
    pub overview: String,
    pub poster_url: String,
    /// One decimal place, e.g. `"8.2"`
    pub rating: String,
    pub year: String,
}

impl BasicDetails {
    pub fn from_summary(summary: &MovieSummary, poster_url: &str) -> Self {
        Self {
            title: summary
                .title
                .clone()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            overview: summary
                .overview
                .clone()
                .unwrap_or_else(|| NO_OVERVIEW.to_string()),
            poster_url: poster_url.to_string(),
            rating: format!("{:.1}", summary.vote_average),
            year: release_year(summary.release_date.as_deref()),
        }
    }
}

/// Rich metadata for one resolved movie.
///
/// Built once per successful detailed fetch. `certification` is the only
/// field that changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedMovieInfo {
    pub title: String,
    pub overview: String,
    /// Empty when the catalog has no poster
    pub poster_url: String,
    /// Empty when the catalog has no backdrop
    pub backdrop_url: String,
    /// e.g. `"8.2/10"`
    pub rating: String,
    /// Release year or `"Unknown"`
    pub release_date: String,
    /// `"136 minutes"` or `"Unknown"`
    pub runtime: String,
    pub status: String,
    pub tagline: String,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub production_countries: Vec<String>,
    pub spoken_languages: Vec<String>,
    /// Top billed, formatted `"name as character"`
    pub cast: Vec<String>,
    pub director: String,
    pub writer: String,
    pub certification: Option<String>,
}

impl DetailedMovieInfo {
    pub fn from_details(details: &MovieDetails, images: &ImageUrls) -> Self {
        let summary = &details.summary;

        let cast = details
            .cast
            .iter()
            .take(MAX_CAST)
            .filter_map(|member| match (&member.name, &member.character) {
                (Some(name), Some(character)) => Some(format!("{} as {}", name, character)),
                _ => None,
            })
            .collect();

        // Last credited director wins; writers accumulate in credit order
        let mut director = None;
        let mut writers: Vec<&str> = Vec::new();
        for member in &details.crew {
            let Some(name) = member.name.as_deref() else {
                continue;
            };
            match member.job.as_deref() {
                Some("Director") => director = Some(name),
                Some("Writer") | Some("Screenplay") => writers.push(name),
                _ => {}
            }
        }

        let writer = if writers.is_empty() {
            UNKNOWN.to_string()
        } else {
            writers.join(", ")
        };

        let runtime = if details.runtime > 0 {
            format!("{} minutes", details.runtime)
        } else {
            UNKNOWN.to_string()
        };

        Self {
            title: summary
                .title
                .clone()
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            overview: summary
                .overview
                .clone()
                .unwrap_or_else(|| NO_OVERVIEW.to_string()),
            poster_url: images
                .poster(summary.poster_path.as_deref())
                .unwrap_or_default(),
            backdrop_url: images
                .backdrop(summary.backdrop_path.as_deref())
                .unwrap_or_default(),
            rating: format!("{:.1}/10", summary.vote_average),
            release_date: release_year(summary.release_date.as_deref()),
            runtime,
            status: details
                .status
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            tagline: details.tagline.clone().unwrap_or_default(),
            genres: details.genres.clone(),
            production_companies: details.production_companies.clone(),
            production_countries: details.production_countries.clone(),
            spoken_languages: details.spoken_languages.clone(),
            cast,
            director: director.unwrap_or(UNKNOWN).to_string(),
            writer,
            certification: None,
        }
    }

    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }
}
