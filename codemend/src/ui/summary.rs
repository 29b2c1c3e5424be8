// codemend/src/ui/summary.rs
//! Human-readable run summary: one table per pass report, followed by the
//! per-rule totals and any skipped or non-converging files.

use crate::ui::output_format::print_warn_message;
use crate::ui::theme::{color_of, ThemeEntry, ThemeMap};
use codemend_core::Report;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::Path;

/// Builds the per-file breakdown table. Paths are shown relative to `root`
/// when possible.
pub fn file_table(report: &Report, root: &Path) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["File", "Replacements", "Logger injected"]);

    for change in report.changes() {
        let shown = change.path.strip_prefix(root).unwrap_or(&change.path);
        table.add_row(vec![
            shown.display().to_string(),
            change.replacements.to_string(),
            if change.injected { "yes" } else { "" }.to_string(),
        ]);
    }

    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table
}

fn heading<W: Write>(writer: &mut W, text: &str, entry: ThemeEntry, theme: &ThemeMap, enable_colors: bool) -> io::Result<()> {
    if enable_colors {
        writeln!(writer, "{}", text.color(color_of(entry, theme)).bold())
    } else {
        writeln!(writer, "{text}")
    }
}

/// Writes the summary for one report.
pub fn print_report_summary<W: Write>(
    writer: &mut W,
    report: &Report,
    root: &Path,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    heading(writer, &format!("=== {} ===", report.pass()), ThemeEntry::Header, theme, enable_colors)?;
    writeln!(writer, "Files scanned:      {}", report.files_scanned())?;
    writeln!(writer, "Files modified:     {}", report.files_modified())?;
    writeln!(writer, "Total replacements: {}", report.total_replacements())?;
    if report.dry_run() {
        writeln!(writer, "Dry run: no files were written.")?;
    }

    if !report.changes().is_empty() {
        writeln!(writer, "{}", file_table(report, root))?;

        for total in report.rule_totals() {
            if enable_colors {
                writeln!(
                    writer,
                    "  {}: {}",
                    total.rule.color(color_of(ThemeEntry::SummaryRuleName, theme)),
                    total.count.color(color_of(ThemeEntry::SummaryOccurrences, theme)),
                )?;
            } else {
                writeln!(writer, "  {}: {}", total.rule, total.count)?;
            }
        }
    }

    for skipped in report.skipped() {
        let line = format!("Skipped {}: {}", skipped.path.display(), skipped.reason);
        print_warn_message(writer, &line, theme, enable_colors)?;
    }
    for path in report.non_converging() {
        let line = format!("Did not reach a fixed point: {}", path.display());
        print_warn_message(writer, &line, theme, enable_colors)?;
    }
    writeln!(writer)
}
