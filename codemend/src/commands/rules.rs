// codemend/src/commands/rules.rs
//! `codemend rules`: prints every pass with its ordered rules.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::io::Write;

use codemend_core::{get_or_compile_pass, MendConfig, PassKind};

use crate::ui::theme::{color_of, ThemeEntry, ThemeMap};

pub fn run_rules<W: Write>(writer: &mut W, config: &MendConfig, theme: &ThemeMap, enable_colors: bool) -> Result<()> {
    for kind in PassKind::ALL {
        let pass = get_or_compile_pass(kind, config)?;
        let title = format!("{} ({} rules)", kind.name(), pass.rules().len());
        if enable_colors {
            writeln!(writer, "{}", title.color(color_of(ThemeEntry::Header, theme)).bold())?;
        } else {
            writeln!(writer, "{title}")?;
        }
        writeln!(writer, "  {}", kind.description())?;

        for (index, rule) in pass.rules().iter().enumerate() {
            if enable_colors {
                writeln!(
                    writer,
                    "  {}. {}: {}",
                    index + 1,
                    rule.name.color(color_of(ThemeEntry::SummaryRuleName, theme)),
                    rule.description
                )?;
            } else {
                writeln!(writer, "  {}. {}: {}", index + 1, rule.name, rule.description)?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}
