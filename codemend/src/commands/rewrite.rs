// codemend/src/commands/rewrite.rs
//! Runs one or more rewrite passes over the selected files and reports the
//! outcome.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use codemend_core::{run_pipeline, MendConfig, PassKind, Report, RunOptions};

use crate::cli::GlobalArgs;
use crate::ui::theme::ThemeMap;
use crate::ui::{diff_viewer, output_format, summary};

/// Presentation options for a rewrite run.
#[derive(Debug, Clone, Default)]
pub struct RewriteOptions {
    pub run: RunOptions,
    pub show_diff: bool,
    pub quiet: bool,
}

impl From<&GlobalArgs> for RewriteOptions {
    fn from(args: &GlobalArgs) -> Self {
        Self {
            run: RunOptions {
                dry_run: args.dry_run,
                capture_diff: args.diff,
                verify_fixed_point: args.verify_fixed_point,
            },
            show_diff: args.diff,
            quiet: args.quiet,
        }
    }
}

/// Loads the effective configuration and applies the `--root` override.
pub fn load_config(config_path: Option<&Path>, root: Option<PathBuf>) -> Result<MendConfig> {
    let mut config = MendConfig::load_effective(config_path).context("Failed to load configuration")?;
    if let Some(root) = root {
        debug!("Overriding selector root with {}", root.display());
        config.selector.root = Some(root);
    }
    Ok(config)
}

/// Runs `kinds` in order and writes diffs and summaries to `writer`.
pub fn run_rewrite<W: Write>(
    writer: &mut W,
    kinds: &[PassKind],
    config: &MendConfig,
    opts: &RewriteOptions,
    theme: &ThemeMap,
    enable_colors: bool,
) -> Result<Vec<Report>> {
    info!(
        "Starting codemend run: {}",
        kinds.iter().map(|k| k.name()).collect::<Vec<_>>().join(" -> ")
    );

    let reports = run_pipeline(kinds, config, &opts.run)?;
    let root = config.root();

    for report in &reports {
        write_report(writer, report, &root, opts, theme, enable_colors)
            .context("Failed to write the run summary")?;
    }

    if !opts.quiet && reports.len() > 1 {
        let total: usize = reports.iter().map(Report::total_replacements).sum();
        output_format::print_success_message(
            writer,
            &format!("{} pass(es) completed, {} replacement(s) in total.", reports.len(), total),
            theme,
            enable_colors,
        )?;
    }
    Ok(reports)
}

fn write_report<W: Write>(
    writer: &mut W,
    report: &Report,
    root: &Path,
    opts: &RewriteOptions,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    if opts.show_diff {
        for change in report.changes() {
            if let Some(patch) = &change.diff {
                diff_viewer::print_file_diff(writer, &change.path, patch, theme, enable_colors)?;
            }
        }
    }
    if !opts.quiet {
        summary::print_report_summary(writer, report, root, theme, enable_colors)?;
    }
    Ok(())
}
