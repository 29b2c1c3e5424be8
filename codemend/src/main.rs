// codemend/src/main.rs
//! codemend entry point.
//!
//! Parses arguments, initialises logging and hands off to the library runner.
//! Any fatal error is printed once to stderr and turns into a non-zero exit.

use clap::Parser;
use is_terminal::IsTerminal;
use std::process::ExitCode;

use codemend::cli::Cli;
use codemend::logger;
use codemend::ui::output_format::print_error_message;
use codemend::ui::theme::ThemeStyle;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(logger::level_for(cli.global.debug, cli.global.quiet));

    let no_color = cli.global.no_color;
    match codemend::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let theme = ThemeStyle::default_theme_map();
            let colors = !no_color && std::io::stderr().is_terminal();
            let _ = print_error_message(&mut std::io::stderr(), &format!("{err:#}"), &theme, colors);
            ExitCode::FAILURE
        }
    }
}
