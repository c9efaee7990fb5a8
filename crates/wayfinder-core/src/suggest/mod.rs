//! Suggestion generation.
//!
//! Suggestions are short nudges ("Your results may be ready...") revealed
//! one at a time next to the page content. They are computed only when the
//! route changes:
//!
//! 1. route table entries (or the defaults for an unmapped route)
//! 2. one behavior entry for the most visited other page
//! 3. time-sensitive urgent-care entries
//! 4. self-recommendation filter, fallback backfill, rank, cap

mod generator;
mod templates;

pub use generator::{SuggestionContext, SuggestionGenerator};
pub use templates::{Suggestion, SuggestionKind};
