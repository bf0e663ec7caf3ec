use std::fmt;

use tracing::{debug, info};

use crate::similarity::{normalize, similarity};

/// Minimum score a candidate must strictly exceed to be opened
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Collaborator-defined reference to a file in the project tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(pub String);

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file as currently shown in the file tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Displayed name the user speaks
    pub label: String,
    /// What to hand back to the collaborator when opening it
    pub handle: FileHandle,
}

impl CandidateFile {
    /// Candidate whose handle is its own label
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_owned(),
            handle: FileHandle(label.to_owned()),
        }
    }

    /// Candidate with a distinct handle (e.g. a full path)
    pub fn with_handle(label: &str, handle: &str) -> Self {
        Self {
            label: label.to_owned(),
            handle: FileHandle(handle.to_owned()),
        }
    }
}

/// Pick the candidate most similar to `query` using [`DEFAULT_THRESHOLD`]
pub fn resolve_file<'a>(query: &str, candidates: &'a [CandidateFile]) -> Option<&'a CandidateFile> {
    resolve_file_with_threshold(query, candidates, DEFAULT_THRESHOLD)
}

/// Pick the candidate most similar to `query`
///
/// Every label is scored against the query with [`similarity`]. The best
/// score wins only if it is strictly greater than `threshold`; on ties the
/// earliest candidate is kept. Returns `None` rather than guessing.
pub fn resolve_file_with_threshold<'a>(
    query: &str,
    candidates: &'a [CandidateFile],
    threshold: f64,
) -> Option<&'a CandidateFile> {
    let query = normalize(query);
    let mut best: Option<(&CandidateFile, f64)> = None;

    for candidate in candidates {
        let score = similarity(&query, &candidate.label);
        debug!(label = %candidate.label, score, "file candidate scored");

        if score <= threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    if let Some((candidate, score)) = best {
        info!(query = %query, label = %candidate.label, score, "file resolved");
        Some(candidate)
    } else {
        debug!(query = %query, threshold, "no file above threshold");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<CandidateFile> {
        vec![
            CandidateFile::new("main.py"),
            CandidateFile::new("utils.py"),
            CandidateFile::new("README.md"),
        ]
    }

    #[test]
    fn test_typo_query_selects_closest() {
        let files = tree();
        let hit = resolve_file("mainpy", &files).map(|f| f.label.as_str());
        assert_eq!(hit, Some("main.py"));

        let hit = resolve_file("mainpay", &files).map(|f| f.label.as_str());
        assert_eq!(hit, Some("main.py"));
    }

    #[test]
    fn test_case_and_spaces_ignored() {
        let files = tree();
        let hit = resolve_file("read me . md", &files).map(|f| f.label.as_str());
        assert_eq!(hit, Some("README.md"));
    }

    #[test]
    fn test_below_threshold_is_none() {
        let files = tree();
        assert!(resolve_file("zzzzzzzz", &files).is_none());
    }

    #[test]
    fn test_score_must_strictly_exceed_threshold() {
        // "ab" vs "ax" scores exactly 0.5
        let files = vec![CandidateFile::new("ax")];
        assert!(resolve_file("ab", &files).is_none());
        assert!(resolve_file_with_threshold("ab", &files, 0.49).is_some());
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let files = vec![
            CandidateFile::with_handle("app.py", "src/app.py"),
            CandidateFile::with_handle("app.py", "tests/app.py"),
        ];
        let hit = resolve_file("app.py", &files).map(|f| f.handle.0.as_str());
        assert_eq!(hit, Some("src/app.py"));
    }

    #[test]
    fn test_empty_candidates() {
        assert!(resolve_file("main.py", &[]).is_none());
    }
}
