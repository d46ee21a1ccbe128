//! Prometheus 2.x YAML rule groups.
//!
//! Field order is part of the output contract: `alert`, `expr`, `for`,
//! `labels`, `annotations`. Struct field order and `IndexMap` insertion
//! order carry straight through `serde_yaml`, so nothing is re-sorted.

use indexmap::IndexMap;
use promkit_core::{title_case, PromkitError, Result};
use serde::Serialize;

use super::RenderedRule;

#[derive(Serialize)]
struct RulesDocument<'a> {
    groups: Vec<Group<'a>>,
}

#[derive(Serialize)]
struct Group<'a> {
    name: &'a str,
    rules: Vec<RuleEntry<'a>>,
}

#[derive(Serialize)]
struct RuleEntry<'a> {
    alert: String,
    expr: &'a str,
    #[serde(rename = "for")]
    duration: &'a str,
    labels: &'a IndexMap<String, String>,
    annotations: &'a IndexMap<String, String>,
}

/// Alert name as published: `TitleCase(prefix) + TitleCase(rule name)`.
pub fn alert_name(metric_prefix: &str, rule_name: &str) -> String {
    title_case(metric_prefix) + &title_case(rule_name)
}

pub fn render(metric_prefix: &str, group_name: &str, rules: &[RenderedRule]) -> Result<String> {
    let doc = RulesDocument {
        groups: vec![Group {
            name: group_name,
            rules: rules
                .iter()
                .map(|r| RuleEntry {
                    alert: alert_name(metric_prefix, &r.alert_name),
                    expr: &r.expr,
                    duration: &r.duration,
                    labels: &r.labels,
                    annotations: &r.annotations,
                })
                .collect(),
        }],
    };

    serde_yaml::to_string(&doc).map_err(|e| PromkitError::Render(format!("yaml: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_names_are_title_cased() {
        assert_eq!(alert_name("audit-service", "rpsRule"), "AuditServiceRpsRule");
        assert_eq!(alert_name("Test", "NginxIsDroppingConnections_Full"), "TestNginxIsDroppingConnectionsFull");
        assert_eq!(alert_name("", "x"), "X");
    }

    #[test]
    fn field_order_is_preserved() {
        let rule = RenderedRule {
            alert_name: "r".to_owned(),
            expr: "up == 0".to_owned(),
            duration: "5m".to_owned(),
            labels: IndexMap::from([
                ("severity".to_owned(), "page".to_owned()),
                ("alpha".to_owned(), "1".to_owned()),
            ]),
            annotations: IndexMap::from([
                ("summary".to_owned(), "S".to_owned()),
                ("description".to_owned(), "D".to_owned()),
                ("confluence_link".to_owned(), "L".to_owned()),
            ]),
        };
        let out = render("p", "g", &[rule]).unwrap();

        let pos = |needle: &str| out.find(needle).unwrap_or_else(|| panic!("missing {needle}"));
        assert!(pos("alert:") < pos("expr:"));
        assert!(pos("expr:") < pos("for:"));
        assert!(pos("for:") < pos("labels:"));
        assert!(pos("labels:") < pos("annotations:"));
        assert!(pos("severity:") < pos("alpha:"));
        assert!(pos("summary:") < pos("description:"));
        assert!(pos("description:") < pos("confluence_link:"));
    }

    #[test]
    fn empty_group_still_has_rules_key() {
        let out = render("p", "empty", &[]).unwrap();
        let doc: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(doc["groups"][0]["name"].as_str(), Some("empty"));
        assert!(doc["groups"][0]["rules"].as_sequence().unwrap().is_empty());
    }
}
