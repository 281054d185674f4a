use crate::modules::catalog::domain::entities::CountryRelease;

/// Countries whose ratings are preferred, highest priority first
pub const PREFERRED_COUNTRIES: [&str; 4] = ["US", "CA", "GB", "AU"];

/// Pick the certification to display for a movie.
///
/// Walks the preferred countries in order and returns the first non-empty
/// certification found. Without any preferred match, the first non-empty
/// certification of any country wins. `None` means the catalog has no rating.
pub fn select_certification(releases: &[CountryRelease]) -> Option<String> {
    let first_in = |release: &CountryRelease| {
        release
            .certifications
            .iter()
            .find(|c| !c.trim().is_empty())
            .cloned()
    };

    PREFERRED_COUNTRIES
        .iter()
        .find_map(|country| {
            releases
                .iter()
                .filter(|r| r.country == *country)
                .find_map(first_in)
        })
        .or_else(|| releases.iter().find_map(first_in))
}
