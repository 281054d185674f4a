use serde::Deserialize;

// Response envelopes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub results: Option<Vec<TmdbMovie>>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u32>,
}

// Search and popular-chart entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u32>>,
}

// `/movie/{id}`, optionally with `append_to_response=credits`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub status: Option<String>, // "Released", "Post Production", ...
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub production_companies: Option<Vec<ProductionCompany>>,
    #[serde(default)]
    pub production_countries: Option<Vec<ProductionCountry>>,
    #[serde(default)]
    pub spoken_languages: Option<Vec<SpokenLanguage>>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductionCompany {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductionCountry {
    #[serde(default)]
    pub iso_3166_1: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

// Credits
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Option<Vec<CastMember>>,
    #[serde(default)]
    pub crew: Option<Vec<CrewMember>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrewMember {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

// Release dates and certifications
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseDatesResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub results: Option<Vec<ReleaseDateResult>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseDateResult {
    pub iso_3166_1: String,
    #[serde(default)]
    pub release_dates: Option<Vec<ReleaseDate>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub r#type: Option<u8>,
}
