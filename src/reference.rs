//! Identifier extraction from API reference URLs.
//!
//! The API never hands out bare identifiers for related resources, only URLs
//! such as `https://pokeapi.co/api/v2/pokemon-species/25/`. By convention the
//! identifier is the second-to-last `/`-delimited segment, i.e. the last path
//! segment before the trailing slash. This module is the only place that knows
//! about that convention.

use crate::entry::EntryId;
use crate::errors::{ReferenceError, ReferenceResult};

/// Extract the entry identifier embedded in a reference URL.
///
/// Fails with [`ReferenceError::Malformed`] when the reference has no trailing
/// slash, when the identifier segment is not a number, or when it is zero.
pub fn extract_id(reference: &str) -> ReferenceResult<EntryId> {
    let malformed = |reason| ReferenceError::Malformed {
        reference: reference.to_string(),
        reason,
    };

    let segments: Vec<&str> = reference.split('/').collect();
    if segments.len() < 2 || !segments[segments.len() - 1].is_empty() {
        return Err(malformed("reference must end with '/'"));
    }

    let candidate = segments[segments.len() - 2];
    if candidate.is_empty() {
        return Err(malformed("identifier segment is empty"));
    }

    let raw: u32 = candidate
        .parse()
        .map_err(|_| malformed("identifier segment is not a number"))?;
    EntryId::new(raw).ok_or_else(|| malformed("identifier must be positive"))
}
