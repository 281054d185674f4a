use once_cell::sync::Lazy;
use regex::Regex;

/// Transformation that can be applied to a title
///
/// Each transformation is composable and testable in isolation.
pub trait TitleTransformation: Send + Sync {
    fn transform(&self, title: &str) -> String;
    fn name(&self) -> &'static str;
}

/// Removes the first match of a pattern
#[derive(Debug, Clone)]
pub struct RemovePatternTransform {
    name: &'static str,
    pattern: Regex,
}

impl RemovePatternTransform {
    pub fn new(name: &'static str, pattern: Regex) -> Self {
        Self { name, pattern }
    }
}

impl TitleTransformation for RemovePatternTransform {
    fn transform(&self, title: &str) -> String {
        self.pattern.replace(title, "").into_owned()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Applies a group of transformations repeatedly until the title stops changing
pub struct RepeatUntilStableTransform {
    name: &'static str,
    steps: Vec<Box<dyn TitleTransformation>>,
}

impl RepeatUntilStableTransform {
    pub fn new(name: &'static str, steps: Vec<Box<dyn TitleTransformation>>) -> Self {
        Self { name, steps }
    }
}

impl TitleTransformation for RepeatUntilStableTransform {
    fn transform(&self, title: &str) -> String {
        let mut current = title.to_string();
        loop {
            let next = self
                .steps
                .iter()
                .fold(current.clone(), |acc, step| step.transform(&acc));
            // Every step only removes text, so this terminates
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Trims surrounding whitespace
#[derive(Debug, Clone)]
pub struct TrimTransform;

impl TitleTransformation for TrimTransform {
    fn transform(&self, title: &str) -> String {
        title.trim().to_string()
    }

    fn name(&self) -> &'static str {
        "Trim"
    }
}

/// Ordered pipeline of transformations
pub struct TitleNormalizer {
    transformations: Vec<Box<dyn TitleTransformation>>,
}

impl TitleNormalizer {
    pub fn new(transformations: Vec<Box<dyn TitleTransformation>>) -> Self {
        Self { transformations }
    }

    /// Pipeline for video titles: drops year, bracket and trailer suffixes,
    /// then everything after a `|` or `-`.
    ///
    /// Suffixes are stripped until none is left, so `"X (2010) [Trailer]"`
    /// loses both. Cutting at the first hyphen truncates titles like
    /// "Spider-Man" to "Spider". That loss is accepted.
    pub fn video_title() -> Self {
        let suffix = |name, pattern: &Lazy<Regex>| -> Box<dyn TitleTransformation> {
            Box::new(RemovePatternTransform::new(name, Regex::clone(pattern)))
        };

        Self::new(vec![
            Box::new(RepeatUntilStableTransform::new(
                "Suffixes",
                vec![
                    suffix("Year", &YEAR_SUFFIX),
                    suffix("Brackets", &BRACKET_SUFFIX),
                    suffix("Trailer", &TRAILER_SUFFIX),
                    suffix("Official", &OFFICIAL_SUFFIX),
                    suffix("HD", &HD_SUFFIX),
                    suffix("4K", &UHD_SUFFIX),
                ],
            )),
            suffix("Pipe", &AFTER_PIPE),
            suffix("Hyphen", &AFTER_HYPHEN),
            Box::new(TrimTransform),
        ])
    }

    pub fn normalize(&self, title: &str) -> String {
        self.transformations
            .iter()
            .fold(title.to_string(), |acc, t| t.transform(&acc))
    }

    pub fn transformation_names(&self) -> Vec<&'static str> {
        self.transformations.iter().map(|t| t.name()).collect()
    }
}

static YEAR_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(\d{4}\)\s*$").expect("year regex should compile"));
static BRACKET_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[.*?\]\s*$").expect("bracket regex should compile"));
static TRAILER_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\(.*?Trailer.*?\)\s*$").expect("trailer regex should compile")
});
static OFFICIAL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\(.*?Official.*?\)\s*$").expect("official regex should compile")
});
static HD_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(.*?HD.*?\)\s*$").expect("HD regex should compile"));
static UHD_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(.*?4K.*?\)\s*$").expect("4K regex should compile"));
static AFTER_PIPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\|.*$").expect("pipe regex should compile"));
static AFTER_HYPHEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-.*$").expect("hyphen regex should compile"));

static EXTERNAL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:tmdb_id|tmdb|movie_id|movie):\s*(\d+)")
        .expect("external id regex should compile")
});

static VIDEO_TITLE_NORMALIZER: Lazy<TitleNormalizer> = Lazy::new(TitleNormalizer::video_title);

/// Strip video-site noise from a title so it can be used as a search query
pub fn clean_title(raw: &str) -> String {
    VIDEO_TITLE_NORMALIZER.normalize(raw)
}

/// Find an explicit catalog id such as `tmdb_id: 603` in free text
pub fn extract_id_from_text(text: &str) -> Option<u64> {
    if text.is_empty() {
        return None;
    }
    EXTERNAL_ID
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Look for an explicit id in the description first, then the title
pub fn extract_external_id(title: &str, description: Option<&str>) -> Option<u64> {
    description
        .and_then(extract_id_from_text)
        .or_else(|| extract_id_from_text(title))
}

/// Dedup and cache key for a title: lower-cased and trimmed
pub fn lookup_key(title: &str) -> String {
    title.trim().to_lowercase()
}
