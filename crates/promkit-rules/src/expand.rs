//! Positional placeholder substitution in rule expressions.

use promkit_core::normalize;
use tracing::warn;

use crate::model::AlertRule;

/// Replace `$1`, `$2`, ... in `rule.rule` with the matching entry of
/// `rule.metric_names`, normalized and prefixed with `prefix`.
///
/// `prefix` is the normalized prefix including its trailing separator (or
/// empty). Names that already start with it are not prefixed again.
/// Placeholders without a matching metric name are left in place.
pub fn expand(rule: &AlertRule, prefix: &str) -> String {
    let mut expr = rule.rule.clone();

    // Highest index first so `$1` never eats the head of `$10`.
    for (i, raw) in rule.metric_names.iter().enumerate().rev() {
        let missing_prefix = if raw.starts_with(prefix) { "" } else { prefix };
        let qualified = format!("{missing_prefix}{}", normalize(raw));
        expr = expr.replace(&format!("${}", i + 1), &qualified);
    }

    if let Some(token) = first_placeholder(&expr) {
        warn!(
            rule = %rule.name,
            placeholder = %token,
            metric_names = rule.metric_names.len(),
            "placeholder has no matching metric name; left unexpanded"
        );
    }
    expr
}

// First `$<digits>` token in `s`, if any.
fn first_placeholder(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'$' {
            continue;
        }
        let digits = bytes[i + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            return Some(&s[i..i + 1 + digits]);
        }
    }
    None
}
