// codemend-core/src/pass.rs
//! Defines the `Pass`: an ordered list of compiled rules plus the exclusion
//! predicate and optional injector that go with it.
//!
//! Rule order is part of a pass's behavior. Each rule re-scans the output of
//! the previous one, so reordering a rule list is a behavior change and must
//! be re-checked against the fixed-point property (see
//! [`Pass::rewrite_until_stable`]).
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::injector::Injector;
use crate::rules::compiler::CompiledRule;

/// The four rewrite passes, in the order a full run applies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    DebugLog,
    ErrorCast,
    OptionalAccess,
    Repair,
}

impl PassKind {
    pub const ALL: [PassKind; 4] = [
        PassKind::DebugLog,
        PassKind::ErrorCast,
        PassKind::OptionalAccess,
        PassKind::Repair,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassKind::DebugLog => "debug-log",
            PassKind::ErrorCast => "error-cast",
            PassKind::OptionalAccess => "optional-access",
            PassKind::Repair => "repair",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PassKind::DebugLog => "Convert console.log debug prints into structured logger calls",
            PassKind::ErrorCast => "Annotate caught errors as typed errors before logging or rethrowing",
            PassKind::OptionalAccess => "Retrofit optional chaining and fallbacks onto nullable access",
            PassKind::Repair => "Undo corruption signatures left by the optional-access pass",
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PassKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PassKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown pass '{}'", s))
    }
}

/// Replacement count for one rule in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCount {
    pub rule: String,
    pub count: usize,
}

/// The result of running a pass over one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRewrite {
    pub text: String,
    pub replacements: usize,
    /// Rules that fired, in rule order.
    pub per_rule: Vec<RuleCount>,
    pub injected: bool,
}

impl FileRewrite {
    pub fn changed(&self, original: &str) -> bool {
        self.text != original
    }
}

/// Outcome of re-applying a pass to its own output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    pub text: String,
    /// Applications that changed the text.
    pub rewrites: usize,
    pub converged: bool,
}

#[derive(Debug)]
pub struct Pass {
    kind: PassKind,
    rules: Vec<CompiledRule>,
    exclude_files: Vec<String>,
    injector: Option<Injector>,
}

impl Pass {
    pub fn new(
        kind: PassKind,
        rules: Vec<CompiledRule>,
        exclude_files: Vec<String>,
        injector: Option<Injector>,
    ) -> Self {
        Self {
            kind,
            rules,
            exclude_files,
            injector,
        }
    }

    pub fn kind(&self) -> PassKind {
        self.kind
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// False when `path` ends with one of the pass's denylisted suffixes.
    /// Suffixes match whole path components only.
    pub fn applies_to(&self, path: &Path) -> bool {
        let normalized = path.to_string_lossy().replace('\\', "/");
        !self.exclude_files.iter().any(|suffix| {
            let suffix = suffix.trim_start_matches("./");
            normalized == suffix || normalized.ends_with(&format!("/{}", suffix))
        })
    }

    /// Applies every rule in order, then the injector if any rule fired.
    pub fn rewrite(&self, original: &str) -> FileRewrite {
        let mut text = original.to_string();
        let mut per_rule = Vec::new();
        let mut replacements = 0usize;

        for rule in &self.rules {
            let (next, count) = rule.apply(&text);
            if count > 0 {
                per_rule.push(RuleCount {
                    rule: rule.name.clone(),
                    count,
                });
                replacements += count;
            }
            text = next;
        }

        let mut injected = false;
        if replacements > 0 {
            if let Some(injector) = &self.injector {
                if injector.needs_injection(original) {
                    let injection = injector.inject(&text);
                    injected = injection.import_added || injection.field_added;
                    text = injection.text;
                } else {
                    debug!("Logger already referenced; skipping injection.");
                }
            }
        }

        FileRewrite {
            text,
            replacements,
            per_rule,
            injected,
        }
    }

    /// Re-applies the pass to its own output until nothing changes or
    /// `max_iterations` applications have run.
    pub fn rewrite_until_stable(&self, original: &str, max_iterations: usize) -> Convergence {
        let mut current = original.to_string();
        let mut rewrites = 0usize;

        for _ in 0..max_iterations {
            let next = self.rewrite(&current).text;
            if next == current {
                return Convergence {
                    text: current,
                    rewrites,
                    converged: true,
                };
            }
            rewrites += 1;
            current = next;
        }

        Convergence {
            text: current,
            rewrites,
            converged: false,
        }
    }
}
