/// Title cleaning, explicit id extraction and best-match selection
use marquee::modules::matching::{lookup_key, MatchTier, TitleMatcher};
use marquee::{clean_title, extract_external_id, find_best_match};

// ================================================================================================
// TITLE CLEANING
// ================================================================================================

#[test]
fn cleans_year_and_trailer_suffixes() {
    assert_eq!(clean_title("Inception (2010) [Official Trailer]"), "Inception");
    assert_eq!(clean_title("Dune (Official Trailer HD)"), "Dune");
    assert_eq!(clean_title("Arrival (4K)"), "Arrival");
}

#[test]
fn cuts_at_pipe_and_hyphen() {
    assert_eq!(clean_title("Heat | Full Movie"), "Heat");
    assert_eq!(clean_title("Alien - Director's Cut"), "Alien");
    // Titles with a hyphen lose their tail
    assert_eq!(clean_title("Spider-Man"), "Spider");
}

#[test]
fn clean_title_of_noise_is_empty() {
    assert_eq!(clean_title("   "), "");
    assert_eq!(clean_title("| trailer"), "");
}

#[test]
fn lookup_key_is_trimmed_lowercase() {
    assert_eq!(lookup_key("  The Matrix "), "the matrix");
}

// ================================================================================================
// EXPLICIT IDS
// ================================================================================================

#[test]
fn description_id_wins_over_title_id() {
    assert_eq!(
        extract_external_id("clip movie: 11", Some("uploaded by x, tmdb_id: 603")),
        Some(603)
    );
    assert_eq!(extract_external_id("clip movie: 11", Some("no id here")), Some(11));
    assert_eq!(extract_external_id("TMDB:  949", None), Some(949));
    assert_eq!(extract_external_id("The Matrix", None), None);
}

// ================================================================================================
// BEST MATCH
// ================================================================================================

#[test]
fn exact_match_beats_earlier_containing_title() {
    let candidates = vec!["The Matrix Reloaded", "The Matrix"];
    assert_eq!(find_best_match("the matrix", &candidates), Some(&"The Matrix"));

    let candidates = vec!["The Matrix", "The Matrix Reloaded"];
    assert_eq!(find_best_match("the matrix", &candidates), Some(&"The Matrix"));
}

#[test]
fn tiers_are_reported() {
    let matcher = TitleMatcher::default();

    let candidates = vec!["Alien".to_string(), "Aliens Extended".to_string()];
    let (_, tier) = matcher.find_best_match("aliens", &candidates).unwrap();
    assert_eq!(tier, MatchTier::Contains);

    let candidates = vec!["Totally Different".to_string(), "Blade Runner 2049".to_string()];
    let (hit, tier) = matcher.find_best_match("blade runner", &candidates).unwrap();
    assert_eq!(hit, "Blade Runner 2049");
    assert_eq!(tier, MatchTier::Contains);

    let candidates = vec!["Zzz".to_string(), "Runner Blade".to_string()];
    let (hit, tier) = matcher.find_best_match("blade runner", &candidates).unwrap();
    assert_eq!(hit, "Runner Blade");
    assert_eq!(tier, MatchTier::Similar);
}

#[test]
fn falls_back_to_first_candidate() {
    let candidates = vec!["Amelie", "Brazil"];
    assert_eq!(find_best_match("heat", &candidates), Some(&"Amelie"));

    let empty: Vec<&str> = Vec::new();
    assert_eq!(find_best_match("heat", &empty), None);
}
