use crate::ConfigError;
use regex::Regex;

/// Patterns used when the configuration does not supply its own
pub const DEFAULT_PRODUCT_PATTERNS: &[&str] = &[r"/product/\d+", r"/item/\d+", r"/p/\d+"];

/// Classifies hrefs as product URLs against an ordered list of regex rules
///
/// Matching is existential and unanchored: a candidate is a product URL if
/// any pattern matches any substring of it. Candidates are not parsed or
/// validated, so relative paths, absolute URLs, and garbage are all accepted
/// as input.
///
/// # Examples
///
/// ```
/// use shelf_sweep::url::PatternMatcher;
///
/// let matcher = PatternMatcher::new(&[r"/product/\d+", r"/item/\d+"]).unwrap();
///
/// assert!(matcher.matches("/product/123"));
/// assert!(matcher.matches("https://shop.example.com/item/99?ref=home"));
/// assert!(!matcher.matches("/about"));
/// assert!(!matcher.matches(""));
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Regex>,
}

impl PatternMatcher {
    /// Compiles the given patterns, preserving their order
    ///
    /// # Returns
    ///
    /// * `Ok(PatternMatcher)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - The first pattern that failed to compile
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        Ok(Self {
            patterns: compile_patterns(patterns)?,
        })
    }

    /// Returns true if any configured pattern matches a substring of `candidate`
    pub fn matches(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        self.patterns.iter().any(|re| re.is_match(candidate))
    }

    /// The configured patterns, in order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Replaces the whole rule set
    ///
    /// The existing rules are kept if any of the new patterns fails to compile.
    pub fn replace_patterns<S: AsRef<str>>(&mut self, patterns: &[S]) -> Result<(), ConfigError> {
        self.patterns = compile_patterns(patterns)?;
        Ok(())
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PRODUCT_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("default product patterns are valid"))
                .collect(),
        }
    }
}

fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|source| ConfigError::InvalidPattern {
                pattern: p.as_ref().to_string(),
                source,
            })
        })
        .collect()
}
