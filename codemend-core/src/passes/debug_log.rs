//! Debug-log normalization: `console.log` prints become `this.logger.debug`
//! calls.
//!
//! The four rules run in order, each narrowing what the next one can see.
//! All of them require the whole print to sit on one line and end in `);`,
//! so multi-line or multi-statement arguments are left alone.
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::config::DebugLogConfig;
use crate::rules::{group, unchanged, RuleSpec};

/// Labels stripped from tagged debug messages.
pub const TAG_LABELS: [&str; 5] = ["DEBUG", "Info", "Error", "Warning", "Log"];

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("identifier pattern is valid"));

pub fn rules(config: &DebugLogConfig) -> Vec<RuleSpec> {
    let markers: Arc<Vec<String>> = Arc::new(config.banner_markers.clone());
    let labels = TAG_LABELS.join("|");

    vec![
        RuleSpec::computed(
            "tagged_message",
            "Tagged print (DEBUG:, Info:, ...) to logger.debug with the label stripped",
            &format!(
                r#"console\.log\([ \t]*(?P<open>['"`])(?:{labels}):[ \t]*(?P<msg>[^'"`\n]*)(?P<close>['"`])(?P<rest>[^;\n]*)\);"#
            ),
            |caps| {
                let open = group(caps, "open");
                if open != group(caps, "close") {
                    return unchanged(caps);
                }
                format!(
                    "this.logger.debug({open}{}{open}{});",
                    group(caps, "msg"),
                    group(caps, "rest")
                )
            },
        ),
        RuleSpec::computed(
            "string_plus_variable",
            "String and one expression to logger.debug with a structured field",
            r#"console\.log\([ \t]*(?P<open>['"])(?P<msg>[^'"\n]*)(?P<close>['"])[ \t]*,[ \t]*(?P<expr>[^;,\n]+?)[ \t]*\);"#,
            |caps| {
                let open = group(caps, "open");
                if open != group(caps, "close") {
                    return unchanged(caps);
                }
                let expr = group(caps, "expr");
                let field = if IDENTIFIER.is_match(expr) {
                    format!("{{ {expr} }}")
                } else {
                    format!("{{ data: {expr} }}")
                };
                format!("this.logger.debug({open}{}{open}, {field});", group(caps, "msg"))
            },
        ),
        RuleSpec::template(
            "template_interpolation",
            "Interpolated template literal to logger.debug",
            r"console\.log\([ \t]*(?P<tpl>`[^`\n]*\$\{[^`\n]*`)[ \t]*\);",
            "this.logger.debug(${tpl});",
        ),
        RuleSpec::computed(
            "plain_string",
            "Plain string literal without banner markers to logger.debug",
            r#"console\.log\([ \t]*(?P<open>['"])(?P<msg>[^'"\n]*)(?P<close>['"])[ \t]*\);"#,
            move |caps| {
                let open = group(caps, "open");
                let msg = group(caps, "msg");
                if open != group(caps, "close") || markers.iter().any(|m| msg.contains(m.as_str())) {
                    return unchanged(caps);
                }
                format!("this.logger.debug({open}{msg}{open});")
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MendConfig;
    use crate::rules::compiler::compile_rules;

    fn apply(input: &str) -> String {
        let config = MendConfig::load_default().unwrap();
        compile_rules(rules(&config.debug_log))
            .unwrap()
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text).0)
    }

    #[test]
    fn tagged_label_is_stripped() {
        assert_eq!(
            apply("console.log('DEBUG: starting up');"),
            "this.logger.debug('starting up');"
        );
        assert_eq!(
            apply(r#"console.log("Warning: low disk", free);"#),
            r#"this.logger.debug("low disk", free);"#
        );
    }

    #[test]
    fn string_plus_identifier_becomes_shorthand_field() {
        assert_eq!(
            apply("console.log('Count is', count);"),
            "this.logger.debug('Count is', { count });"
        );
    }

    #[test]
    fn string_plus_expression_is_labeled() {
        assert_eq!(
            apply("console.log('Rows', result.rows.length);"),
            "this.logger.debug('Rows', { data: result.rows.length });"
        );
    }

    #[test]
    fn template_with_interpolation_is_kept_verbatim() {
        assert_eq!(
            apply("console.log(`Loaded ${n} items`);"),
            "this.logger.debug(`Loaded ${n} items`);"
        );
        assert_eq!(apply("console.log(`static`);"), "console.log(`static`);");
    }

    #[test]
    fn banner_prints_are_left_alone() {
        assert_eq!(apply("console.log('✅ Done');"), "console.log('✅ Done');");
        assert_eq!(apply("console.log('done');"), "this.logger.debug('done');");
    }

    #[test]
    fn multi_line_prints_are_left_alone() {
        let input = "console.log(\n  'value',\n  value\n);";
        assert_eq!(apply(input), input);
    }

    #[test]
    fn mismatched_quotes_are_left_alone() {
        let input = r#"console.log('it"s');"#;
        assert_eq!(apply(input), input);
    }
}
