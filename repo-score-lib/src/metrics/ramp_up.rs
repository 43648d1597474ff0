use super::metric::{LOG_TARGET, Metric, ensure_quota};
use crate::error::MetricError;
use crate::facts::RepoRef;
use crate::facts::hosting::{Client, EntryKind};
use std::collections::VecDeque;

/// Which kind of tree entry a checklist term may match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    File,
    Dir,
    Any,
}

impl MatchScope {
    fn accepts(self, kind: EntryKind) -> bool {
        match self {
            Self::File => kind == EntryKind::File,
            Self::Dir => kind == EntryKind::Dir,
            Self::Any => matches!(kind, EntryKind::File | EntryKind::Dir),
        }
    }
}

/// A term whose presence in the file tree hints at onboarding material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistTerm {
    /// Lowercase substring searched for in entry names
    pub term: &'static str,
    pub scope: MatchScope,
}

/// Onboarding signals looked for by default; every term carries equal weight.
pub const DEFAULT_CHECKLIST: &[ChecklistTerm] = &[
    ChecklistTerm { term: "example", scope: MatchScope::Any },
    ChecklistTerm { term: "test", scope: MatchScope::Any },
    ChecklistTerm { term: "readme", scope: MatchScope::File },
    ChecklistTerm { term: "doc", scope: MatchScope::Any },
    ChecklistTerm { term: "makefile", scope: MatchScope::File },
];

/// Tracks which checklist terms have been seen so far
#[derive(Debug, Clone)]
pub struct Checklist {
    terms: &'static [ChecklistTerm],
    found: Vec<bool>,
}

impl Checklist {
    #[must_use]
    pub fn new(terms: &'static [ChecklistTerm]) -> Self {
        Self {
            terms,
            found: vec![false; terms.len()],
        }
    }

    /// Mark every unmatched term that `name` contains, if the entry kind is allowed for it.
    pub fn observe(&mut self, name: &str, kind: EntryKind) {
        let name = name.to_lowercase();
        for (term, found) in self.terms.iter().zip(self.found.iter_mut()) {
            if !*found && term.scope.accepts(kind) && name.contains(term.term) {
                *found = true;
            }
        }
    }

    #[must_use]
    pub fn found_count(&self) -> usize {
        self.found.iter().filter(|&&found| found).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.found.iter().all(|&found| found)
    }

    /// Fraction of terms found, in `[0, 1]`
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "checklists are tiny")]
    pub fn score(&self) -> f64 {
        if self.terms.is_empty() {
            return 0.0;
        }

        self.found_count() as f64 / self.terms.len() as f64
    }
}

/// Approximates onboarding friction from the presence of docs, tests, and examples
#[derive(Debug, Clone)]
pub struct RampUp {
    client: Client,
    checklist: &'static [ChecklistTerm],
    max_depth: u32,
    max_listings: u32,
}

impl RampUp {
    /// `max_depth` bounds how far below the root the walk descends; `max_listings` bounds
    /// the number of directories listed.
    #[must_use]
    pub const fn new(client: Client, max_depth: u32, max_listings: u32) -> Self {
        Self {
            client,
            checklist: DEFAULT_CHECKLIST,
            max_depth,
            max_listings,
        }
    }

    #[must_use]
    pub const fn with_checklist(mut self, checklist: &'static [ChecklistTerm]) -> Self {
        self.checklist = checklist;
        self
    }

    async fn walk(&self, repo: &RepoRef) -> Result<Checklist, MetricError> {
        let mut checklist = Checklist::new(self.checklist);
        let mut pending = VecDeque::from([(String::new(), 0_u32)]);
        let mut listings = 0_u32;

        while let Some((path, depth)) = pending.pop_front() {
            if listings >= self.max_listings {
                log::debug!(target: LOG_TARGET, "Reached directory listing budget ({}) for '{repo}'", self.max_listings);
                break;
            }
            listings += 1;

            let entries = match self.client.tree_entries(repo, &path).await {
                Ok(entries) => entries,
                Err(e) if path.is_empty() => return Err(MetricError::RemoteFetch(e)),
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "Could not list '{path}' in '{repo}', skipping it: {e:#}");
                    continue;
                }
            };

            for entry in &entries {
                checklist.observe(&entry.name, entry.kind);
            }

            if checklist.is_complete() {
                break;
            }

            if depth < self.max_depth {
                pending.extend(
                    entries
                        .into_iter()
                        .filter(|entry| entry.kind == EntryKind::Dir)
                        .map(|entry| (entry.path, depth + 1)),
                );
            }
        }

        log::debug!(
            target: LOG_TARGET,
            "Listed {listings} director(ies) in '{repo}', found {} of {} onboarding signal(s)",
            checklist.found_count(),
            self.checklist.len()
        );

        Ok(checklist)
    }
}

impl Metric for RampUp {
    fn name(&self) -> &'static str {
        "ramp-up"
    }

    async fn score(&self, repo: &RepoRef) -> Result<f64, MetricError> {
        let _ = ensure_quota(&self.client).await?;
        Ok(self.walk(repo).await?.score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree_scores_zero() {
        let checklist = Checklist::new(DEFAULT_CHECKLIST);
        assert!(checklist.score().abs() < f64::EPSILON);
    }

    #[test]
    fn test_three_of_five_terms() {
        let mut checklist = Checklist::new(DEFAULT_CHECKLIST);
        checklist.observe("README.md", EntryKind::File);
        checklist.observe("tests", EntryKind::Dir);
        checklist.observe("docs", EntryKind::Dir);
        checklist.observe("src", EntryKind::Dir);

        assert_eq!(checklist.found_count(), 3);
        assert!((checklist.score() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let mut checklist = Checklist::new(DEFAULT_CHECKLIST);
        checklist.observe("GNUmakefile", EntryKind::File);
        checklist.observe("integration_Tests.rs", EntryKind::File);

        assert_eq!(checklist.found_count(), 2);
    }

    #[test]
    fn test_file_only_term_ignores_directories() {
        let mut checklist = Checklist::new(DEFAULT_CHECKLIST);
        checklist.observe("readme", EntryKind::Dir);
        checklist.observe("Makefile.d", EntryKind::Dir);

        assert_eq!(checklist.found_count(), 0);
    }

    #[test]
    fn test_other_entries_never_match() {
        let mut checklist = Checklist::new(DEFAULT_CHECKLIST);
        checklist.observe("docs", EntryKind::Other);

        assert_eq!(checklist.found_count(), 0);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut checklist = Checklist::new(DEFAULT_CHECKLIST);
        let mut previous = checklist.score();

        for (name, kind) in [
            ("src", EntryKind::Dir),
            ("examples", EntryKind::Dir),
            ("examples", EntryKind::Dir),
            ("Makefile", EntryKind::File),
            ("unrelated.txt", EntryKind::File),
            ("doc", EntryKind::Dir),
            ("README", EntryKind::File),
            ("test_utils.py", EntryKind::File),
        ] {
            checklist.observe(name, kind);
            let score = checklist.score();
            assert!(score >= previous);
            assert!((0.0..=1.0).contains(&score));
            previous = score;
        }

        assert!(checklist.is_complete());
        assert!((previous - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_checklist() {
        static TERMS: &[ChecklistTerm] = &[
            ChecklistTerm { term: "contributing", scope: MatchScope::File },
            ChecklistTerm { term: "tutorial", scope: MatchScope::Any },
        ];

        let mut checklist = Checklist::new(TERMS);
        checklist.observe("CONTRIBUTING.md", EntryKind::File);

        assert!((checklist.score() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_checklist_scores_zero() {
        let checklist = Checklist::new(&[]);
        assert!(checklist.score().abs() < f64::EPSILON);
        assert!(checklist.is_complete());
    }
}
