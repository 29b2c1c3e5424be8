//! Rule definitions shared by every rewrite pass.
//!
//! A [`RuleSpec`] is the uncompiled form of a single pattern → replacement
//! transformation. Passes build ordered lists of specs and hand them to
//! [`compiler::compile_rules`], which turns them into [`compiler::CompiledRule`]s.
//!
//! The `regex` crate has no look-around, so rules that need to exclude a
//! receiver or a context do it inside a computed replacement: returning the
//! matched text unchanged means "not applicable" and is not counted.

use regex::Captures;
use std::fmt;
use std::sync::Arc;

pub mod compiler;

/// A pure function from a match to its replacement text.
pub type ReplaceFn = Arc<dyn Fn(&Captures<'_>) -> String + Send + Sync>;

/// How a rule produces its replacement text.
#[derive(Clone)]
pub enum Replacement {
    /// A `$1` / `${name}` expansion template.
    Template(String),
    /// A computed transformation of the captures.
    Computed(ReplaceFn),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Replacement::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl Replacement {
    /// Produces the replacement for one match.
    pub fn render(&self, caps: &Captures<'_>) -> String {
        match self {
            Replacement::Template(template) => {
                let mut dst = String::new();
                caps.expand(template, &mut dst);
                dst
            }
            Replacement::Computed(f) => f(caps),
        }
    }
}

/// A single rewrite rule before compilation.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    /// Identifier, unique within its pass (e.g. `tagged_message`).
    pub name: String,
    /// Human-readable label used for reporting.
    pub description: String,
    /// The regex pattern string.
    pub pattern: String,
    pub replacement: Replacement,
    /// If true, `^` and `$` match at line boundaries.
    pub multiline: bool,
}

impl RuleSpec {
    pub fn template(name: &str, description: &str, pattern: &str, template: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            pattern: pattern.to_string(),
            replacement: Replacement::Template(template.to_string()),
            multiline: false,
        }
    }

    pub fn computed<F>(name: &str, description: &str, pattern: &str, f: F) -> Self
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            pattern: pattern.to_string(),
            replacement: Replacement::Computed(Arc::new(f)),
            multiline: false,
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }
}

/// Text of a named capture group, or the empty string.
pub(crate) fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

/// The whole match, used by computed replacements to decline a rewrite.
pub(crate) fn unchanged(caps: &Captures<'_>) -> String {
    caps.get(0).map_or_else(String::new, |m| m.as_str().to_string())
}

/// First identifier of a receiver chain such as `this.items?.first`.
pub(crate) fn receiver_root(receiver: &str) -> &str {
    receiver
        .split(|c| c == '.' || c == '?')
        .next()
        .unwrap_or(receiver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_root_stops_at_first_access() {
        assert_eq!(receiver_root("this.items"), "this");
        assert_eq!(receiver_root("data?.rows.first"), "data");
        assert_eq!(receiver_root("value"), "value");
    }
}
