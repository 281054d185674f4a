use super::similarity_strategy::{SimilarityStrategy, WordOverlapStrategy};
use crate::modules::catalog::domain::entities::MovieSummary;

/// Minimum similarity for the fuzzy tier
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Anything the matcher can rank by title
pub trait MatchCandidate {
    fn candidate_title(&self) -> Option<&str>;
}

impl MatchCandidate for MovieSummary {
    fn candidate_title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl MatchCandidate for String {
    fn candidate_title(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl MatchCandidate for &str {
    fn candidate_title(&self) -> Option<&str> {
        Some(*self)
    }
}

/// Which tier selected the candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Contains,
    Similar,
    FirstResult,
}

/// Ranks candidates against a cleaned query
pub struct TitleMatcher {
    strategy: Box<dyn SimilarityStrategy>,
    threshold: f64,
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self::new(Box::new(WordOverlapStrategy), SIMILARITY_THRESHOLD)
    }
}

impl TitleMatcher {
    pub fn new(strategy: Box<dyn SimilarityStrategy>, threshold: f64) -> Self {
        Self {
            strategy,
            threshold,
        }
    }

    /// Pick a candidate in three tiers, in candidate order within each tier:
    /// case-insensitive equality, candidate contains the query, similarity
    /// above the threshold. Falls back to the first candidate; `None` only
    /// for an empty list.
    pub fn find_best_match<'a, T: MatchCandidate>(
        &self,
        query: &str,
        candidates: &'a [T],
    ) -> Option<(&'a T, MatchTier)> {
        let first = candidates.first()?;
        let query = query.to_lowercase();

        let lowered: Vec<Option<String>> = candidates
            .iter()
            .map(|c| c.candidate_title().map(str::to_lowercase))
            .collect();

        let tier = |pred: &dyn Fn(&str) -> bool| {
            candidates
                .iter()
                .zip(&lowered)
                .find(|(_, title)| title.as_deref().map(pred).unwrap_or(false))
                .map(|(candidate, _)| candidate)
        };

        if let Some(c) = tier(&|title: &str| title == query) {
            return Some((c, MatchTier::Exact));
        }
        if let Some(c) = tier(&|title: &str| title.contains(query.as_str())) {
            return Some((c, MatchTier::Contains));
        }
        if let Some(c) =
            tier(&|title: &str| self.strategy.calculate(&query, title) > self.threshold)
        {
            return Some((c, MatchTier::Similar));
        }

        Some((first, MatchTier::FirstResult))
    }
}

/// Best match with the default word-overlap matcher
pub fn find_best_match<'a, T: MatchCandidate>(query: &str, candidates: &'a [T]) -> Option<&'a T> {
    TitleMatcher::default()
        .find_best_match(query, candidates)
        .map(|(candidate, _)| candidate)
}
