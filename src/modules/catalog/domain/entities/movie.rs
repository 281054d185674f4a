use serde::{Deserialize, Serialize};

/// One ranked search hit, or the shallow record returned by fetch-by-id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub release_date: Option<String>,
}

impl MovieSummary {
    /// A summary is usable only when it carries a non-empty poster path
    pub fn has_poster(&self) -> bool {
        self.poster_path
            .as_deref()
            .map(|p| !p.is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CastCredit {
    pub name: Option<String>,
    pub character: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrewCredit {
    pub name: Option<String>,
    pub job: Option<String>,
}

/// Full record from the details-with-credits call
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MovieDetails {
    pub summary: MovieSummary,
    /// Minutes; zero when unknown
    pub runtime: u32,
    pub status: Option<String>,
    pub tagline: Option<String>,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub production_countries: Vec<String>,
    pub spoken_languages: Vec<String>,
    /// Billing order as returned by the catalog
    pub cast: Vec<CastCredit>,
    pub crew: Vec<CrewCredit>,
}

/// Release certifications for one country, in catalog order (may contain empty strings)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountryRelease {
    pub country: String,
    pub certifications: Vec<String>,
}
