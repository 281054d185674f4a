/// Strategy for calculating similarity between two strings
///
/// This trait enables different similarity algorithms to be used interchangeably,
/// making the matcher testable and extensible.
pub trait SimilarityStrategy: Send + Sync {
    /// Returns a value between 0.0 (completely different) and 1.0 (identical)
    fn calculate(&self, query: &str, target: &str) -> f64;

    /// Get the name of this strategy for logging/debugging
    fn name(&self) -> &'static str;
}

/// Word-overlap similarity.
///
/// Counts query words that match some target word (equal, or one contains
/// the other) and divides by the larger word count. Inputs are compared as
/// given; callers lower-case both sides first.
#[derive(Debug, Clone, Default)]
pub struct WordOverlapStrategy;

impl SimilarityStrategy for WordOverlapStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        let query_words: Vec<&str> = query.split_whitespace().collect();
        let target_words: Vec<&str> = target.split_whitespace().collect();

        let denominator = query_words.len().max(target_words.len());
        if denominator == 0 {
            return 0.0;
        }

        let matches = query_words
            .iter()
            .filter(|q| {
                target_words
                    .iter()
                    .any(|t| q == &t || q.contains(t) || t.contains(*q))
            })
            .count();

        matches as f64 / denominator as f64
    }

    fn name(&self) -> &'static str {
        "WordOverlap"
    }
}
