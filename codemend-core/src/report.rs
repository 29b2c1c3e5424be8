// codemend-core/src/report.rs
//! The run report: an immutable value folded from per-file outcomes.
//!
//! Every `with_*` method consumes the report and returns the extended one, so
//! a run is a fold over its files instead of a set of shared counters.
//! Totals are derived on demand and never stored.

use std::fmt;
use std::path::PathBuf;

use crate::pass::{PassKind, RuleCount};

/// One file the pass modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub replacements: usize,
    pub per_rule: Vec<RuleCount>,
    /// The logger import/field was added.
    pub injected: bool,
    /// Unified diff, present when diff capture was requested.
    pub diff: Option<String>,
}

/// A candidate that could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pass: PassKind,
    dry_run: bool,
    files_scanned: usize,
    changes: Vec<FileChange>,
    skipped: Vec<SkippedFile>,
    non_converging: Vec<PathBuf>,
}

impl Report {
    pub fn new(pass: PassKind, dry_run: bool) -> Self {
        Self {
            pass,
            dry_run,
            files_scanned: 0,
            changes: Vec::new(),
            skipped: Vec::new(),
            non_converging: Vec::new(),
        }
    }

    /// Records a file that was read successfully.
    pub fn with_scanned(mut self) -> Self {
        self.files_scanned += 1;
        self
    }

    pub fn with_change(mut self, change: FileChange) -> Self {
        self.changes.push(change);
        self
    }

    pub fn with_skipped(mut self, path: PathBuf, reason: impl Into<String>) -> Self {
        self.skipped.push(SkippedFile {
            path,
            reason: reason.into(),
        });
        self
    }

    pub fn with_non_converging(mut self, path: PathBuf) -> Self {
        self.non_converging.push(path);
        self
    }

    pub fn pass(&self) -> PassKind {
        self.pass
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    /// Modified files in processing order.
    pub fn changes(&self) -> &[FileChange] {
        &self.changes
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn non_converging(&self) -> &[PathBuf] {
        &self.non_converging
    }

    pub fn files_modified(&self) -> usize {
        self.changes.len()
    }

    pub fn total_replacements(&self) -> usize {
        self.changes.iter().map(|c| c.replacements).sum()
    }

    pub fn files_injected(&self) -> usize {
        self.changes.iter().filter(|c| c.injected).count()
    }

    /// Replacement totals per rule, in first-seen order.
    pub fn rule_totals(&self) -> Vec<RuleCount> {
        let mut totals: Vec<RuleCount> = Vec::new();
        for count in self.changes.iter().flat_map(|c| c.per_rule.iter()) {
            match totals.iter_mut().find(|t| t.rule == count.rule) {
                Some(total) => total.count += count.count,
                None => totals.push(count.clone()),
            }
        }
        totals
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} file(s) scanned, {} modified, {} replacement(s)",
            self.pass,
            self.files_scanned,
            self.files_modified(),
            self.total_replacements()
        )?;
        if !self.skipped.is_empty() {
            write!(f, ", {} skipped", self.skipped.len())?;
        }
        if self.dry_run {
            f.write_str(" (dry run)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(path: &str, rules: &[(&str, usize)]) -> FileChange {
        FileChange {
            path: PathBuf::from(path),
            replacements: rules.iter().map(|(_, n)| n).sum(),
            per_rule: rules
                .iter()
                .map(|(r, n)| RuleCount { rule: r.to_string(), count: *n })
                .collect(),
            injected: false,
            diff: None,
        }
    }

    #[test]
    fn totals_are_folded_from_entries() {
        let report = [
            change("a.ts", &[("plain_string", 2)]),
            change("b.ts", &[("tagged_message", 1), ("plain_string", 3)]),
        ]
        .into_iter()
        .fold(Report::new(PassKind::DebugLog, false), |r, c| r.with_scanned().with_change(c))
        .with_scanned();

        assert_eq!(report.files_scanned(), 3);
        assert_eq!(report.files_modified(), 2);
        assert_eq!(report.total_replacements(), 6);
        assert_eq!(
            report.rule_totals(),
            vec![
                RuleCount { rule: "plain_string".into(), count: 5 },
                RuleCount { rule: "tagged_message".into(), count: 1 },
            ]
        );
        assert_eq!(report.changes()[0].path, PathBuf::from("a.ts"));
    }

    #[test]
    fn display_mentions_skips_and_dry_run() {
        let report = Report::new(PassKind::Repair, true)
            .with_skipped(PathBuf::from("gone.ts"), "No such file");
        assert_eq!(
            report.to_string(),
            "repair: 0 file(s) scanned, 0 modified, 0 replacement(s), 1 skipped (dry run)"
        );
    }
}
