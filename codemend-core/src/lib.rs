// codemend-core/src/lib.rs
//! # codemend Core Library
//!
//! `codemend-core` holds the source-text rewrite pipeline: ordered regex
//! passes that migrate `console.log` debugging to a structured logger,
//! annotate caught errors, retrofit optional chaining onto TypeScript sources,
//! and finally repair the corruption the optional-chaining pass is known to
//! introduce.
//!
//! Nothing here builds a syntax tree. Every pass is a list of pattern →
//! replacement rules run over whole-file text, which makes the pipeline fast
//! and heuristic: correct for common shapes, not guaranteed.
//!
//! ## Modules
//!
//! * `config`: `MendConfig`, embedded defaults, user-file merge and validation.
//! * `rules`: `RuleSpec` and the rule compiler.
//! * `pass`: `Pass`, `PassKind` and the per-file `FileRewrite`.
//! * `passes`: the four concrete rule sets and the compiled-pass cache.
//! * `injector`: adds the logger import and field to rewritten files.
//! * `selector`: tree walk or explicit file lists.
//! * `report`: the immutable run report.
//! * `runner`: applies passes to selected files.
//! * `errors`: `MendError`.
//!
//! ## Usage Example
//!
//! ```rust
//! use codemend_core::{rewrite_text, MendConfig, PassKind};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = MendConfig::load_default()?;
//!     let out = rewrite_text(PassKind::DebugLog, &config, "console.log('DEBUG: starting up');")?;
//!     assert!(out.contains("this.logger.debug('starting up');"));
//!     Ok(())
//! }
//! ```
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod errors;
pub mod injector;
pub mod pass;
pub mod passes;
pub mod report;
pub mod rules;
pub mod runner;
pub mod selector;

pub use config::{merge_config, MendConfig};
pub use errors::MendError;
pub use injector::{Injector, LOGGER_MARKERS};
pub use pass::{Convergence, FileRewrite, Pass, PassKind, RuleCount};
pub use passes::{build_pass, get_or_compile_pass};
pub use report::{FileChange, Report, SkippedFile};
pub use rules::compiler::{compile_rules, CompiledRule, MAX_PATTERN_LENGTH};
pub use rules::{Replacement, RuleSpec};
pub use runner::{rewrite_text, run_kind, run_pass, run_pipeline, RunOptions, GUARD_PIPELINE};
pub use selector::FileSelector;
