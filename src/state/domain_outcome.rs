/// Outcome definitions for a single domain's crawl
///
/// Every configured domain ends a run in exactly one of these outcomes.
use std::fmt;

/// Which fetch tier produced (or failed to produce) a domain's markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Plain HTTP GET of the server-delivered HTML
    Static,

    /// Headless browser render after page scripts have run
    Rendered,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Rendered => "rendered",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final state of a domain after one orchestration run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainOutcome {
    // ===== Success States =====
    /// Product URLs were found in the static markup
    FoundStatic,

    /// Static markup had none; the rendered markup did
    FoundRendered,

    /// Both tiers completed and neither yielded a product URL
    NoneFound,

    // ===== Failure States =====
    /// The static fetch failed; rendering was never attempted
    FetchFailed,

    /// The static fetch succeeded but the render step failed
    RenderFailed,

    /// The domain task was cancelled or panicked before reporting
    Aborted,
}

impl DomainOutcome {
    /// Returns true if the domain pipeline ran to completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::FoundStatic | Self::FoundRendered | Self::NoneFound)
    }

    /// Returns true if the domain's entry is a failure placeholder
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns true if the rendered tier was attempted for this domain
    pub fn used_renderer(&self) -> bool {
        matches!(
            self,
            Self::FoundRendered | Self::NoneFound | Self::RenderFailed
        )
    }

    /// Converts the outcome to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoundStatic => "found_static",
            Self::FoundRendered => "found_rendered",
            Self::NoneFound => "none_found",
            Self::FetchFailed => "fetch_failed",
            Self::RenderFailed => "render_failed",
            Self::Aborted => "aborted",
        }
    }

    /// Returns all possible outcomes
    pub fn all_outcomes() -> Vec<Self> {
        vec![
            Self::FoundStatic,
            Self::FoundRendered,
            Self::NoneFound,
            Self::FetchFailed,
            Self::RenderFailed,
            Self::Aborted,
        ]
    }
}

impl fmt::Display for DomainOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
