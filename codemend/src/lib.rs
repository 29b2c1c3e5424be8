// codemend/src/lib.rs
//! # codemend CLI
//!
//! The terminal front end for `codemend-core`: argument parsing, logger
//! setup, the subcommands and their colored output.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use std::io;

use crate::cli::{Cli, Commands};
use crate::commands::rewrite::{load_config, run_rewrite, RewriteOptions};
use crate::commands::rules::run_rules;
use crate::ui::theme::build_theme_map;

/// Executes a parsed command line. The logger must already be initialised.
pub fn run(cli: Cli) -> Result<()> {
    let global = &cli.global;
    let theme = build_theme_map(global.theme.as_deref()).context("Theme error")?;
    let enable_colors = !global.no_color && io::stdout().is_terminal();
    let config = load_config(global.config.as_deref(), global.root.clone())?;

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Rules => run_rules(&mut stdout, &config, &theme, enable_colors),
        command => {
            let opts = RewriteOptions::from(global);
            run_rewrite(&mut stdout, &command.passes(), &config, &opts, &theme, enable_colors).map(|_| ())
        }
    }
}
