// codemend/src/ui/diff_viewer.rs
//! Colored rendering of the unified diffs captured in a run report.

use crate::ui::theme::{color_of, ThemeEntry, ThemeMap};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::Path;

/// Writes `patch` (a unified diff) for `path`, coloring added, removed and
/// header lines from the theme.
pub fn print_file_diff<W: Write>(
    writer: &mut W,
    path: &Path,
    patch: &str,
    theme: &ThemeMap,
    enable_colors: bool,
) -> io::Result<()> {
    let title = format!("--- Diff: {} ---", path.display());
    if enable_colors {
        writeln!(writer, "{}", title.color(color_of(ThemeEntry::Header, theme)).bold())?;
    } else {
        writeln!(writer, "{title}")?;
    }

    for line in patch.lines() {
        if !enable_colors {
            writeln!(writer, "{line}")?;
            continue;
        }
        let entry = if line.starts_with("+++") || line.starts_with("---") || line.starts_with("@@") {
            Some(ThemeEntry::DiffHeader)
        } else if line.starts_with('+') {
            Some(ThemeEntry::DiffAdded)
        } else if line.starts_with('-') {
            Some(ThemeEntry::DiffRemoved)
        } else {
            None
        };
        match entry {
            Some(entry) => writeln!(writer, "{}", line.color(color_of(entry, theme)))?,
            None => writeln!(writer, "{line}")?,
        }
    }
    Ok(())
}
