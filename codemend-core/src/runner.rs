// codemend-core/src/runner.rs
//! Runs passes over the files a selector picks.
//!
//! Files are processed one at a time in selector order: read whole, rewritten
//! in memory, written back whole. A read or write failure on one file is
//! logged and recorded in the report, and the run moves on. Only a selector
//! failure aborts the run.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::config::MendConfig;
use crate::pass::{Pass, PassKind};
use crate::passes::get_or_compile_pass;
use crate::report::{FileChange, Report};
use crate::selector::FileSelector;

/// Upper bound on re-applications when checking a file for a fixed point.
pub const FIXED_POINT_LIMIT: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute changes without writing files.
    pub dry_run: bool,
    /// Keep a unified diff for every modified file.
    pub capture_diff: bool,
    /// Re-apply the pass to each rewritten file and flag non-convergence.
    pub verify_fixed_point: bool,
}

/// Passes applied by the `pipeline` command: injection, then its repair.
pub const GUARD_PIPELINE: [PassKind; 2] = [PassKind::OptionalAccess, PassKind::Repair];

fn process_file(pass: &Pass, path: &Path, options: &RunOptions, report: Report) -> Report {
    let original = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("Skipping {}: failed to read: {}", path.display(), e);
            return report.with_skipped(path.to_path_buf(), format!("read failed: {}", e));
        }
    };
    let report = report.with_scanned();

    let rewrite = pass.rewrite(&original);
    if !rewrite.changed(&original) {
        debug!("No changes in {}.", path.display());
        return report;
    }

    let report = if options.verify_fixed_point {
        let convergence = pass.rewrite_until_stable(&rewrite.text, FIXED_POINT_LIMIT);
        if convergence.rewrites > 0 {
            warn!(
                "The {} pass does not reach a fixed point on {} ({} extra rewrite(s)).",
                pass.kind(),
                path.display(),
                convergence.rewrites
            );
            report.with_non_converging(path.to_path_buf())
        } else {
            report
        }
    } else {
        report
    };

    if !options.dry_run {
        if let Err(e) = fs::write(path, &rewrite.text) {
            warn!("Skipping {}: failed to write: {}", path.display(), e);
            return report.with_skipped(path.to_path_buf(), format!("write failed: {}", e));
        }
    }

    debug!(
        "Rewrote {} with {} replacement(s).",
        path.display(),
        rewrite.replacements
    );
    let diff = options
        .capture_diff
        .then(|| diffy::create_patch(&original, &rewrite.text).to_string());

    report.with_change(FileChange {
        path: path.to_path_buf(),
        replacements: rewrite.replacements,
        per_rule: rewrite.per_rule,
        injected: rewrite.injected,
        diff,
    })
}

/// Applies `pass` to every file `selector` yields.
pub fn run_pass(pass: &Pass, selector: &FileSelector, options: &RunOptions) -> Result<Report> {
    let files = selector
        .select()
        .with_context(|| format!("Failed to select files for the {} pass", pass.kind()))?;
    info!("Running the {} pass over {} candidate file(s).", pass.kind(), files.len());

    let report = files
        .iter()
        .filter(|path| {
            let applies = pass.applies_to(path);
            if !applies {
                debug!("{} is denylisted for the {} pass.", path.display(), pass.kind());
            }
            applies
        })
        .fold(Report::new(pass.kind(), options.dry_run), |report, path| {
            process_file(pass, path, options, report)
        });

    info!("{}", report);
    Ok(report)
}

/// Compiles (or reuses) the pass for `kind` and runs it with its selector.
pub fn run_kind(kind: PassKind, config: &MendConfig, options: &RunOptions) -> Result<Report> {
    let pass = get_or_compile_pass(kind, config)?;
    let selector = FileSelector::for_pass(kind, config);
    run_pass(&pass, &selector, options)
}

/// Runs several passes in the given order, one report per pass.
pub fn run_pipeline(kinds: &[PassKind], config: &MendConfig, options: &RunOptions) -> Result<Vec<Report>> {
    kinds
        .iter()
        .map(|kind| run_kind(*kind, config, options))
        .collect()
}

/// Runs a pass over a single in-memory text, skipping file I/O entirely.
pub fn rewrite_text(kind: PassKind, config: &MendConfig, text: &str) -> Result<String> {
    let pass = get_or_compile_pass(kind, config)?;
    Ok(pass.rewrite(text).text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_text_applies_the_named_pass() {
        let config = MendConfig::load_default().unwrap();
        assert_eq!(
            rewrite_text(PassKind::Repair, &config, "5?.2").unwrap(),
            "5.2"
        );
    }

    #[test]
    fn explicit_missing_file_is_skipped_not_fatal() {
        let config = MendConfig::load_default().unwrap();
        let pass = get_or_compile_pass(PassKind::Repair, &config).unwrap();
        let selector = FileSelector::Explicit(vec!["/no/such/file.ts".into()]);
        let report = run_pass(&pass, &selector, &RunOptions::default()).unwrap();
        assert_eq!(report.files_scanned(), 0);
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.files_modified(), 0);
    }

    #[test]
    fn unreadable_target_is_skipped_and_later_targets_still_run() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker.ts");
        let healthy = dir.path().join("math.ts");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(&healthy, "const x = 5?.2;\n").unwrap();

        let config = MendConfig::load_default().unwrap();
        let pass = get_or_compile_pass(PassKind::Repair, &config).unwrap();
        let selector = FileSelector::Explicit(vec![blocker.clone(), healthy.clone()]);
        let report = run_pass(&pass, &selector, &RunOptions::default()).unwrap();

        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.skipped()[0].path, blocker);
        assert!(report.skipped()[0].reason.starts_with("read failed"));
        assert_eq!(report.files_modified(), 1);
        assert_eq!(std::fs::read_to_string(&healthy).unwrap(), "const x = 5.2;\n");
    }

    #[cfg(unix)]
    #[test]
    fn write_failure_is_recorded_as_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked.ts");
        std::fs::write(&locked, "const x = 5?.2;\n").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o444)).unwrap();

        // Privileged users can write read-only files anyway.
        if std::fs::OpenOptions::new().append(true).open(&locked).is_ok() {
            return;
        }

        let config = MendConfig::load_default().unwrap();
        let pass = get_or_compile_pass(PassKind::Repair, &config).unwrap();
        let selector = FileSelector::Explicit(vec![locked.clone()]);
        let report = run_pass(&pass, &selector, &RunOptions::default()).unwrap();

        assert_eq!(report.files_scanned(), 1);
        assert_eq!(report.files_modified(), 0);
        assert_eq!(report.skipped().len(), 1);
        assert!(report.skipped()[0].reason.starts_with("write failed"));
        assert_eq!(std::fs::read_to_string(&locked).unwrap(), "const x = 5?.2;\n");
    }
}
