//! Candidate list loading
//!
//! The candidate source is a newline-delimited text file, one desired channel
//! name per line, trailing whitespace stripped. Order is irrelevant; names
//! that differ only by case collapse to one logical candidate.

use crate::error::SourceError;
use crate::types::CandidateSet;
use std::path::Path;

/// Load the candidate set from a newline-delimited text file
///
/// # Arguments
///
/// * `path` - Path to the candidate list file
///
/// # Returns
///
/// Returns the deduplicated candidate set, or [`SourceError::Unreadable`] if
/// the file is missing or unreadable. Callers that can proceed with degraded
/// behavior should log the error and substitute an empty set.
pub fn load_candidates(path: &Path) -> Result<CandidateSet, SourceError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SourceError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let set = CandidateSet::from_names(contents.lines());
    tracing::info!(
        path = %path.display(),
        candidates = set.len(),
        "loaded candidate list"
    );
    Ok(set)
}
