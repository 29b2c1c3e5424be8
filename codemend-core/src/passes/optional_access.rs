//! Optional-access injection: blanket optional chaining and fallbacks.
//!
//! Rules run in order and a later rule must never re-guard what an earlier
//! one already guarded. That holds because every guard rule requires a bare
//! `.` right after its receiver chain, and a guarded chain ends in `?.`.
//!
//! Known defect, kept on purpose: at the text level a decimal literal next to
//! an operator looks exactly like a property access, so `5.2 + x` becomes
//! `5?.2 + x`. The repair pass (`corruption_repair`) undoes it.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::OptionalAccessConfig;
use crate::rules::{group, receiver_root, unchanged, RuleSpec};

/// A receiver chain: `a`, `a.b`, `a?.b.c`.
const RECEIVER: &str = r"[\w$]+(?:\??\.[\w$]+)*";

/// Operators after which a property read gets guarded. Longer alternatives
/// come first; the skip set below is matched only to be declined.
const OPERATORS: &str =
    r"===|!==|==|!=|<=|>=|\+\+|--|\+=|-=|\*=|/=|//|/\*|<|>|\+|-|\*|/";

/// Operators that make the access an assignment target or start a comment.
const NOT_GUARDABLE: [&str; 8] = ["++", "--", "+=", "-=", "*=", "/=", "//", "/*"];

fn is_literal(init: &str) -> bool {
    let init = init.trim();
    if init == "true" || init == "false" {
        return true;
    }
    let mut chars = init.chars();
    match (chars.next(), init.chars().last()) {
        (Some(first), Some(last)) if init.len() >= 2 => {
            first == last && matches!(first, '\'' | '"' | '`')
        }
        _ => false,
    }
}

fn is_boolean_expression(init: &str) -> bool {
    let init = init.trim();
    init.starts_with('!')
        || ["===", "!==", "==", "!=", "<=", ">=", " < ", " > "]
            .iter()
            .any(|op| init.contains(op))
}

fn needs_parentheses(init: &str) -> bool {
    init.contains("&&") || init.contains(" ? ")
}

pub fn rules(config: &OptionalAccessConfig) -> Vec<RuleSpec> {
    let always_defined: Arc<HashSet<String>> =
        Arc::new(config.always_defined.iter().cloned().collect());
    let never_guarded: Arc<HashSet<String>> = Arc::new(
        config
            .always_defined
            .iter()
            .chain(config.builtin_namespaces.iter())
            .cloned()
            .collect(),
    );

    let comparison_roots = Arc::clone(&always_defined);

    vec![
        RuleSpec::template(
            "for_each_guard",
            "Guard .forEach calls on an unguarded receiver",
            r"(?P<recv>[\w$\)\]])\.forEach\(",
            "${recv}?.forEach(",
        ),
        RuleSpec::computed(
            "operand_access_guard",
            "Guard property access on the left of a comparison or arithmetic operator",
            &format!(r"(?P<recv>{RECEIVER})\.(?P<prop>[\w$]+)(?P<op>[ \t]*(?:{OPERATORS}))"),
            move |caps| {
                let recv = group(caps, "recv");
                let op = group(caps, "op");
                if comparison_roots.contains(receiver_root(recv))
                    || NOT_GUARDABLE.contains(&op.trim())
                {
                    return unchanged(caps);
                }
                format!("{recv}?.{}{op}", group(caps, "prop"))
            },
        ),
        RuleSpec::computed(
            "length_guard",
            "Guard .length access",
            &format!(r"(?P<recv>{RECEIVER})\.length\b"),
            move |caps| {
                let recv = group(caps, "recv");
                if receiver_root(recv) == "this" {
                    return unchanged(caps);
                }
                format!("{recv}?.length")
            },
        ),
        RuleSpec::computed(
            "typed_fallback",
            "Append ?? false / ?? '' to boolean and string declarations",
            r"(?P<head>\b(?:const|let|var)[ \t]+[\w$]+[ \t]*:[ \t]*(?P<ty>boolean|string)[ \t]*=[ \t]*)(?P<init>[^;\n]+?)[ \t]*;",
            |caps| {
                let init = group(caps, "init");
                let ty = group(caps, "ty");
                if init.contains("??")
                    || init.contains("||")
                    || is_literal(init)
                    || (ty == "boolean" && is_boolean_expression(init))
                {
                    return unchanged(caps);
                }
                let fallback = if ty == "boolean" { "false" } else { "''" };
                let init = if needs_parentheses(init) {
                    format!("({init})")
                } else {
                    init.to_string()
                };
                format!("{}{init} ?? {fallback};", group(caps, "head"))
            },
        ),
        RuleSpec::template(
            "index_access_guard",
            "Guard property access after a computed index",
            r"(?P<target>[\w$\)\]]\[[^\[\]\n]+\])\.(?P<next>[A-Za-z_$])",
            "${target}?.${next}",
        ),
        RuleSpec::computed(
            "method_call_guard",
            "Guard method calls on receivers that may be undefined",
            &format!(
                r"(?P<new>\bnew[ \t]+)?(?P<recv>{RECEIVER})\.(?P<method>[A-Za-z_$][\w$]*)\("
            ),
            move |caps| {
                let recv = group(caps, "recv");
                let root = receiver_root(recv);
                if caps.name("new").is_some()
                    || never_guarded.contains(root)
                    || root.chars().all(|c| c.is_ascii_digit())
                {
                    return unchanged(caps);
                }
                format!("{recv}?.{}(", group(caps, "method"))
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
        compile_rules(rules(&config.optional_access))
            .unwrap()
            .iter()
            .fold(input.to_string(), |text, rule| rule.apply(&text).0)
    }

    #[test]
    fn for_each_receiver_is_guarded() {
        assert_eq!(apply("data.forEach(process)"), "data?.forEach(process)");
    }

    #[test]
    fn comparison_operand_is_guarded() {
        assert_eq!(apply("if (user.age > 18) {"), "if (user?.age > 18) {");
        assert_eq!(apply("if (this.count > 1) {"), "if (this.count > 1) {");
        assert_eq!(apply("total.sum += 1;"), "total.sum += 1;");
    }

    #[test]
    fn length_is_guarded_outside_this() {
        assert_eq!(apply("return items.length;"), "return items?.length;");
        assert_eq!(apply("return this.items.length;"), "return this.items.length;");
        assert_eq!(apply("if (rows.length > 0)"), "if (rows?.length > 0)");
        assert_eq!(apply("return super.items.length;"), "return super.items?.length;");
    }

    #[test]
    fn typed_declarations_get_fallbacks() {
        assert_eq!(
            apply("const enabled: boolean = settings[key];"),
            "const enabled: boolean = settings[key] ?? false;"
        );
        assert_eq!(
            apply("let name: string = lookup(id);"),
            "let name: string = lookup(id) ?? '';"
        );
        assert_eq!(apply("const ok: boolean = true;"), "const ok: boolean = true;");
        assert_eq!(apply("const s: string = 'x';"), "const s: string = 'x';");
        assert_eq!(apply("const s: string = a || 'x';"), "const s: string = a || 'x';");
        assert_eq!(
            apply("const ready: boolean = flag && other;"),
            "const ready: boolean = (flag && other) ?? false;"
        );
    }

    #[test]
    fn index_followed_by_access_is_guarded() {
        assert_eq!(apply("const v = rows[i].value;"), "const v = rows[i]?.value;");
    }

    #[test]
    fn method_calls_skip_builtins_and_constructors() {
        assert_eq!(apply("const m = Math.max(a, b);"), "const m = Math.max(a, b);");
        assert_eq!(apply("JSON.stringify(x);"), "JSON.stringify(x);");
        assert_eq!(apply("this.service.load();"), "this.service.load();");
        assert_eq!(apply("const d = new api.Client();"), "const d = new api.Client();");
        assert_eq!(apply("repo.save(entity);"), "repo?.save(entity);");
    }

    #[test]
    fn decimal_literals_are_corrupted() {
        assert_eq!(apply("const x = 5.2 + 3.4;"), "const x = 5?.2 + 3.4;");
    }

    #[test]
    fn guarded_code_is_a_fixed_point() {
        let once = apply("if (a.b.c > 1) { list.forEach(f); repo.find(id).then(g); }");
        assert_eq!(apply(&once), once);
    }
}
