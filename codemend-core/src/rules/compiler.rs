//! compiler.rs - Compiles rule specs into ready-to-apply regex rules.
//!
//! Compilation collects every failing rule before giving up, so a broken rule
//! list is reported in one go rather than one error at a time.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::errors::MendError;
use crate::rules::{Replacement, RuleSpec};

/// Maximum allowed length for a regex pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// A single compiled rewrite rule.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    /// The compiled regular expression used for matching.
    pub regex: Regex,
    pub replacement: Replacement,
    pub name: String,
    pub description: String,
}

impl CompiledRule {
    /// Rewrites every non-overlapping match in `text`.
    ///
    /// Returns the new text and the number of matches whose replacement
    /// differs from the matched text.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut output = String::with_capacity(text.len());
        let mut last_end = 0usize;
        let mut replaced = 0usize;

        for caps in self.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let replacement = self.replacement.render(&caps);
            if replacement != whole.as_str() {
                replaced += 1;
            }
            output.push_str(&text[last_end..whole.start()]);
            output.push_str(&replacement);
            last_end = whole.end();
        }
        output.push_str(&text[last_end..]);

        if replaced > 0 {
            debug!(
                target: "codemend_core::rules",
                "Rule '{}' rewrote {} match(es).",
                self.name,
                replaced
            );
        }
        (output, replaced)
    }
}

/// Compiles an ordered list of rule specs, preserving their order.
pub fn compile_rules(specs: Vec<RuleSpec>) -> Result<Vec<CompiledRule>, MendError> {
    debug!("Starting compilation of {} rules.", specs.len());

    let mut compiled = Vec::with_capacity(specs.len());
    let mut compilation_errors = Vec::new();

    for spec in specs {
        if spec.pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(MendError::PatternLengthExceeded(
                spec.name,
                spec.pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(&spec.pattern)
            .multi_line(spec.multiline)
            .size_limit(10 * (1 << 20))
            .build();

        match regex_result {
            Ok(regex) => {
                debug!(
                    target: "codemend_core::rules",
                    "Rule '{}' compiled successfully.",
                    &spec.name
                );
                compiled.push(CompiledRule {
                    regex,
                    replacement: spec.replacement,
                    name: spec.name,
                    description: spec.description,
                });
            }
            Err(e) => compilation_errors.push(MendError::RuleCompilationError(spec.name, e)),
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(MendError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )));
    }

    debug!("Finished compiling rules. Total compiled: {}.", compiled.len());
    Ok(compiled)
}
