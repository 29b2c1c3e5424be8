//! Corruption repair: undo the signatures the optional-access pass leaves
//! behind.
//!
//! Every trigger here is a narrow shape that hand-written TypeScript does not
//! contain, so the pass only reverses damage and never rewrites healthy code.
//! It must run after `optional_access`.
//! License: MIT OR APACHE 2.0

use crate::rules::RuleSpec;

/// What may precede a split decimal literal. Word characters or a dot mean
/// the digits belong to an identifier or a member chain. A `?` directly
/// before the digits is a ternary or `??` operator, never a guard.
const LITERAL_BOUNDARY: &str = r"(?P<lead>^|[^\w$.?]|\?)";

pub fn rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::template(
            "tripled_guard",
            "Collapse ???. back to a single guard",
            r"\?\?\?\.",
            "?.",
        ),
        RuleSpec::template(
            "guard_then_dot",
            "Collapse ?.. before an identifier back to ?.",
            r"\?\.\.(?P<next>[A-Za-z_$])",
            "?.${next}",
        ),
        RuleSpec::template(
            "guard_before_operator",
            "Drop a guard that directly precedes an arithmetic operator",
            r"(?P<lead>^|[^\\/])(?P<operand>[\w$\)\]])\?\.(?P<op>[ \t]+[+\-*/%])",
            "${lead}${operand}${op}",
        )
        .multiline(),
        RuleSpec::template(
            "split_decimal_doubled",
            "Rejoin 5??.2 into 5.2",
            &format!(r"{LITERAL_BOUNDARY}(?P<int>\d+)\?\?\.(?P<frac>\d+)"),
            "${lead}${int}.${frac}",
        )
        .multiline(),
        RuleSpec::template(
            "split_decimal",
            "Rejoin 5?.2 into 5.2",
            &format!(r"{LITERAL_BOUNDARY}(?P<int>\d+)\?\.(?P<frac>\d+)"),
            "${lead}${int}.${frac}",
        )
        .multiline(),
        RuleSpec::template(
            "line_leading_decimal",
            "Rejoin a line-leading 5?..2 into 5.2",
            r"^(?P<indent>[ \t]*)(?P<int>\d+)\?\.\.(?P<frac>\d+)",
            "${indent}${int}.${frac}",
        )
        .multiline(),
    ]
}
