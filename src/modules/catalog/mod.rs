pub mod domain;
pub mod infrastructure;

pub use domain::{
    select_certification, BasicDetails, CatalogClient, CountryRelease, DetailedMovieInfo,
    ImageUrls, MovieDetails, MovieSummary,
};
pub use infrastructure::TmdbClient;
