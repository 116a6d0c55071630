use crate::domain::error::DomainError;
use std::collections::HashSet;

/// Append-only record of article URLs that have already been reported.
///
/// Single-writer: implementations do no locking, so concurrent runs
/// against the same store are unsupported.
pub trait Ledger: Send + Sync {
    /// Every recorded URL. A store that does not exist yet is empty, not an error.
    fn load(&self) -> Result<HashSet<String>, DomainError>;

    /// Record `urls`. Only call after the report covering them was delivered.
    fn append(&self, urls: &[String]) -> Result<(), DomainError>;
}
