pub mod best_match;
pub mod similarity_strategy;
pub mod title_normalizer;

pub use best_match::{find_best_match, MatchCandidate, MatchTier, TitleMatcher};
pub use similarity_strategy::{SimilarityStrategy, WordOverlapStrategy};
pub use title_normalizer::{
    clean_title, extract_external_id, extract_id_from_text, lookup_key, TitleNormalizer,
};
