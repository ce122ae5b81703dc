//! Core types for channel-recon

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A desired channel name the reconciliation loop tries to locate in the
/// remote directory.
///
/// Candidates compare case-insensitively: the folded form is computed once at
/// construction and reused for every page-record comparison. The original
/// spelling is preserved because it is what ends up in the persisted sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    name: String,
    folded: String,
}

impl Candidate {
    /// Create a candidate from a raw name, trimming trailing whitespace
    pub fn new(name: &str) -> Self {
        let name = name.trim_end().to_string();
        let folded = fold(&name);
        Self { name, folded }
    }

    /// The candidate name as configured (original spelling)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The case-folded form used for matching
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Whether this candidate matches a remote channel name, ignoring case
    pub fn matches(&self, channel_name: &str) -> bool {
        self.folded == fold(channel_name)
    }
}

/// Case-fold a name for comparison
///
/// Both sides of every match are folded through this function so that the
/// comparison is symmetric.
pub(crate) fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// An immutable set of candidates with case-insensitive set semantics
///
/// Duplicates that differ only by case collapse to one logical candidate; the
/// first spelling encountered wins.
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// Build a set from raw names, collapsing case-insensitive duplicates
    ///
    /// Empty lines are skipped. Input order is preserved for the surviving
    /// candidates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut candidates: Vec<Candidate> = Vec::new();
        for name in names {
            let candidate = Candidate::new(name.as_ref());
            if candidate.name().is_empty() {
                continue;
            }
            if candidates.iter().any(|c| c.folded() == candidate.folded()) {
                continue;
            }
            candidates.push(candidate);
        }
        Self { candidates }
    }

    /// Number of logical candidates in the set
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the set contains no candidates
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate over the candidates
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }
}

/// One channel record as returned by a page of the directory API
///
/// Ephemeral: exists only within a fetch cycle.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChannelRecord {
    /// Workspace-unique channel identifier
    pub id: String,
    /// Channel name as known to the directory
    pub name: String,
    /// Identifier of the member who created the channel
    pub creator: String,
}

/// One page of the channel directory
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    /// Channel records on this page
    pub records: Vec<ChannelRecord>,
    /// Opaque continuation token for the next page, if any
    pub next_cursor: Option<String>,
}

/// The matched-channel half of a [`MatchResult`] entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchedChannel {
    /// The candidate name as configured (original spelling from the list)
    pub candidate_name: String,
    /// Identifier of the channel's creator
    pub creator_id: String,
}

/// Accumulated mapping from channel id to matched candidate name and creator id
///
/// This is the sole artifact that survives the reconciliation loop. Keys are
/// unique by construction (an id matches at most once; the first match wins)
/// and iteration order is deterministic, so two runs over identical page
/// sequences produce identical results row for row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchResult {
    entries: BTreeMap<String, MatchedChannel>,
}

impl MatchResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a match for a channel id unless one is already present
    ///
    /// Returns `true` if the entry was inserted.
    pub fn record(&mut self, channel_id: &str, candidate_name: &str, creator_id: &str) -> bool {
        if self.entries.contains_key(channel_id) {
            return false;
        }
        self.entries.insert(
            channel_id.to_string(),
            MatchedChannel {
                candidate_name: candidate_name.to_string(),
                creator_id: creator_id.to_string(),
            },
        );
        true
    }

    /// Look up the match recorded for a channel id
    pub fn get(&self, channel_id: &str) -> Option<&MatchedChannel> {
        self.entries.get(channel_id)
    }

    /// Number of matched channels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no channels matched
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(channel_id, matched)` pairs in deterministic order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MatchedChannel)> {
        self.entries.iter()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_matches_ignoring_case() {
        let candidate = Candidate::new("Random-Coffee");
        assert!(candidate.matches("random-coffee"));
        assert!(candidate.matches("RANDOM-COFFEE"));
        assert!(!candidate.matches("random-tea"));
    }

    #[test]
    fn candidate_trims_trailing_whitespace() {
        let candidate = Candidate::new("eng-platform  \n");
        assert_eq!(candidate.name(), "eng-platform");
        assert!(candidate.matches("ENG-PLATFORM"));
    }

    #[test]
    fn candidate_set_collapses_case_duplicates() {
        let set = CandidateSet::from_names(["Eng", "eng", "ENG", "design"]);
        assert_eq!(set.len(), 2);
        // First spelling wins
        let names: Vec<_> = set.iter().map(Candidate::name).collect();
        assert_eq!(names, vec!["Eng", "design"]);
    }

    #[test]
    fn candidate_set_skips_empty_lines() {
        let set = CandidateSet::from_names(["", "  ", "ops"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn match_result_first_match_wins() {
        let mut result = MatchResult::new();
        assert!(result.record("C1", "Eng", "U1"));
        assert!(!result.record("C1", "eng-dup", "U2"));
        assert_eq!(result.get("C1").unwrap().candidate_name, "Eng");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn match_result_iteration_is_deterministic() {
        let mut a = MatchResult::new();
        a.record("C9", "x", "U1");
        a.record("C1", "y", "U2");
        a.record("C5", "z", "U3");

        let mut b = MatchResult::new();
        b.record("C5", "z", "U3");
        b.record("C1", "y", "U2");
        b.record("C9", "x", "U1");

        let rows_a: Vec<_> = a.iter().map(|(id, m)| (id.clone(), m.clone())).collect();
        let rows_b: Vec<_> = b.iter().map(|(id, m)| (id.clone(), m.clone())).collect();
        assert_eq!(rows_a, rows_b);
        assert_eq!(rows_a[0].0, "C1");
    }
}
