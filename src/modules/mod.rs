// Feature modules

pub mod cache; // Two-tier artwork cache (SQLite + memory)
pub mod catalog; // TMDB catalog client and movie entities
pub mod matching; // Title cleaning, id extraction and best-match selection
pub mod registry; // In-process detailed metadata registry
pub mod resolver; // Debounced lookup pipeline and service facade
