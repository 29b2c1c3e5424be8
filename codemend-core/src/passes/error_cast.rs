//! Error-cast repair: treat a caught value as a typed error before it is
//! logged or rethrown, and null-guard `.forEach` receivers.
//!
//! The rules target disjoint shapes, so their order does not matter. Every
//! rule only adds an annotation or a guard; the logged value and the thrown
//! value stay the same.
//! License: MIT OR APACHE 2.0

use crate::config::ErrorCastConfig;
use crate::rules::RuleSpec;

pub fn rules(config: &ErrorCastConfig) -> Vec<RuleSpec> {
    let var = regex::escape(&config.catch_variable);
    // `$` in a template starts a group reference.
    let cast = format!(
        "{} as {}",
        config.catch_variable.replace('$', "$$"),
        config.error_type.replace('$', "$$")
    );

    vec![
        RuleSpec::template(
            "logger_error_cast",
            "Annotate the catch variable passed to logger.error",
            &format!(r"(?P<call>\blogger\.error\([^,;\n]+),[ \t]*{var}[ \t]*\)"),
            &format!("${{call}}, {cast})"),
        ),
        RuleSpec::template(
            "rethrow_cast",
            "Annotate a bare rethrow of the catch variable",
            &format!(r"\bthrow[ \t]+{var}[ \t]*;"),
            &format!("throw {cast};"),
        ),
        RuleSpec::template(
            "for_each_guard",
            "Null-safe .forEach invocation",
            r"(?P<recv>[\w$\)\]])\.forEach\(",
            "${recv}?.forEach(",
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
        compile_rules(rules(&config.error_cast))
            .unwrap()
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text).0)
    }

    #[test]
    fn qualified_and_bare_logger_calls_are_cast() {
        assert_eq!(
            apply("this.logger.error('Failed to load', error);"),
            "this.logger.error('Failed to load', error as Error);"
        );
        assert_eq!(
            apply("logger.error(`sync ${id}`, error);"),
            "logger.error(`sync ${id}`, error as Error);"
        );
    }

    #[test]
    fn other_arguments_are_untouched() {
        let input = "this.logger.error('Failed', err);";
        assert_eq!(apply(input), input);
        let input = "this.logger.error('Failed', { error });";
        assert_eq!(apply(input), input);
    }

    #[test]
    fn rethrow_is_cast_once() {
        let once = apply("  throw error;");
        assert_eq!(once, "  throw error as Error;");
        assert_eq!(apply(&once), once);
    }

    #[test]
    fn for_each_is_guarded() {
        assert_eq!(apply("items.forEach(x => x);"), "items?.forEach(x => x);");
        assert_eq!(apply("items?.forEach(x => x);"), "items?.forEach(x => x);");
    }
}
