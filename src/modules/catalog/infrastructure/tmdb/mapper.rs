use super::models::{ReleaseDateResult, TmdbMovie, TmdbMovieDetails};
use crate::modules::catalog::domain::entities::{
    CastCredit, CountryRelease, CrewCredit, MovieDetails, MovieSummary,
};

/// Converts TMDB wire records into catalog domain records
#[derive(Debug, Clone, Default)]
pub struct TmdbMapper;

impl TmdbMapper {
    pub fn new() -> Self {
        Self
    }

    pub fn map_movie(&self, movie: TmdbMovie) -> MovieSummary {
        MovieSummary {
            id: movie.id,
            title: movie.title,
            overview: movie.overview,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            vote_average: movie.vote_average.unwrap_or(0.0),
            release_date: movie.release_date,
        }
    }

    pub fn map_movies(&self, movies: Option<Vec<TmdbMovie>>) -> Vec<MovieSummary> {
        movies
            .unwrap_or_default()
            .into_iter()
            .map(|m| self.map_movie(m))
            .collect()
    }

    /// Shallow projection used by fetch-by-id
    pub fn map_details_to_summary(&self, details: TmdbMovieDetails) -> MovieSummary {
        MovieSummary {
            id: details.id,
            title: details.title,
            overview: details.overview,
            poster_path: details.poster_path,
            backdrop_path: details.backdrop_path,
            vote_average: details.vote_average.unwrap_or(0.0),
            release_date: details.release_date,
        }
    }

    pub fn map_details(&self, details: TmdbMovieDetails) -> MovieDetails {
        let genres = named(details.genres.as_deref(), |g| g.name.as_deref());
        let production_companies =
            named(details.production_companies.as_deref(), |c| c.name.as_deref());
        let production_countries =
            named(details.production_countries.as_deref(), |c| c.name.as_deref());
        let spoken_languages = named(details.spoken_languages.as_deref(), |l| l.name.as_deref());

        let (cast, crew) = match &details.credits {
            Some(credits) => (
                credits
                    .cast
                    .iter()
                    .flatten()
                    .map(|c| CastCredit {
                        name: c.name.clone(),
                        character: c.character.clone(),
                    })
                    .collect(),
                credits
                    .crew
                    .iter()
                    .flatten()
                    .map(|c| CrewCredit {
                        name: c.name.clone(),
                        job: c.job.clone(),
                    })
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        MovieDetails {
            runtime: details.runtime.unwrap_or(0),
            status: details.status.clone(),
            tagline: details.tagline.clone(),
            genres,
            production_companies,
            production_countries,
            spoken_languages,
            cast,
            crew,
            summary: self.map_details_to_summary(details),
        }
    }

    pub fn map_release_dates(&self, results: Option<Vec<ReleaseDateResult>>) -> Vec<CountryRelease> {
        results
            .unwrap_or_default()
            .into_iter()
            .map(|r| CountryRelease {
                country: r.iso_3166_1,
                certifications: r
                    .release_dates
                    .unwrap_or_default()
                    .into_iter()
                    .map(|d| d.certification.unwrap_or_default())
                    .collect(),
            })
            .collect()
    }
}

fn named<T>(items: Option<&[T]>, name: impl Fn(&T) -> Option<&str>) -> Vec<String> {
    items
        .unwrap_or_default()
        .iter()
        .filter_map(|item| name(item).map(str::to_string))
        .collect()
}
