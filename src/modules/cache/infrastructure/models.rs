/// Diesel models for the poster_cache and genre_cache tables
use crate::schema::{genre_cache, poster_cache};
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = poster_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PosterCacheRow {
    pub video_id: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub cached_at: i64,
}

/// Insert model; `None` columns are stored as NULL
#[derive(Insertable, Debug)]
#[diesel(table_name = poster_cache)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewPosterCacheRow<'a> {
    pub video_id: &'a str,
    pub poster_url: Option<&'a str>,
    pub backdrop_url: Option<&'a str>,
    pub cached_at: i64,
}

/// Update model; `None` columns are left untouched
#[derive(AsChangeset, Debug)]
#[diesel(table_name = poster_cache)]
pub struct PosterCacheChanges<'a> {
    pub poster_url: Option<&'a str>,
    pub backdrop_url: Option<&'a str>,
    pub cached_at: i64,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = genre_cache)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GenreCacheRow {
    pub video_id: String,
    pub genre: Option<String>,
    pub cached_at: i64,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = genre_cache)]
pub struct NewGenreCacheRow<'a> {
    pub video_id: &'a str,
    pub genre: &'a str,
    pub cached_at: i64,
}
