//! Transaction categorization
//!
//! Categorization is a two-stage strategy: a primary [`Categorizer`] that
//! may fail (for example a remote classification service) composed with a
//! deterministic fallback through [`WithFallback`]. The keyword rules in
//! [`KeywordCategorizer`] are the fallback shipped with the crate.

pub mod keyword;

pub use keyword::KeywordCategorizer;

use tracing::warn;

use crate::error::LedgerResult;
use crate::models::{default_category, is_valid_category, TransactionKind};

/// Assigns a category from the kind's vocabulary to a description
pub trait Categorizer {
    /// Returns `LedgerError::Categorization` when no answer could be produced
    fn categorize(&self, description: &str, kind: TransactionKind) -> LedgerResult<String>;
}

/// Tries `primary` first and falls back when it fails
///
/// A primary answer outside the vocabulary is replaced by the kind's
/// catch-all category rather than by the fallback.
#[derive(Debug, Clone)]
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> WithFallback<P, F>
where
    P: Categorizer,
    F: Categorizer,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P, F> Categorizer for WithFallback<P, F>
where
    P: Categorizer,
    F: Categorizer,
{
    fn categorize(&self, description: &str, kind: TransactionKind) -> LedgerResult<String> {
        match self.primary.categorize(description, kind) {
            Ok(category) if is_valid_category(kind, &category) => Ok(category),
            Ok(category) => {
                warn!(%category, "Primary categorizer answered outside the vocabulary");
                Ok(default_category(kind).to_string())
            }
            Err(e) => {
                warn!(error = %e, "Primary categorizer failed; using fallback");
                self.fallback.categorize(description, kind)
            }
        }
    }
}
