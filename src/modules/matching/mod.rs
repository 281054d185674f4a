pub mod domain;

pub use domain::{
    clean_title, extract_external_id, find_best_match, lookup_key, MatchCandidate, MatchTier,
    TitleMatcher,
};
