//! Prometheus 1.x rule text.
//!
//! One `ALERT` block per rule; blocks are joined with a single newline and
//! there is no grouping construct.

use indexmap::IndexMap;

use super::RenderedRule;

pub fn render(rules: &[RenderedRule]) -> String {
    rules.iter().map(block).collect::<Vec<_>>().join("\n")
}

fn block(rule: &RenderedRule) -> String {
    format!(
        "ALERT {name}\n  IF {expr}\n  FOR {duration}\n  LABELS {{\n    {labels}\n  }}\n  ANNOTATIONS {{\n    {annotations}\n  }}",
        name = rule.alert_name,
        expr = rule.expr,
        duration = rule.duration,
        labels = entries(&rule.labels),
        annotations = entries(&rule.annotations),
    )
}

// `key = "value"` lines, comma separated.
fn entries(map: &IndexMap<String, String>) -> String {
    map.iter()
        .map(|(k, v)| format!("{k} = {}", quote(v)))
        .collect::<Vec<_>>()
        .join(",\n    ")
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\\\""))
}
