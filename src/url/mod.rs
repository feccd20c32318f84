//! URL handling module for Shelf-Sweep
//!
//! This module decides which hrefs look like product-detail pages.

mod matcher;

// Re-export main types
pub use matcher::{PatternMatcher, DEFAULT_PRODUCT_PATTERNS};
