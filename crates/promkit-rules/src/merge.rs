//! Label and annotation maps for a rendered rule.
//!
//! Both maps keep insertion order. Built-in keys are seeded first and rule
//! overrides only fill keys that are still absent.

use indexmap::IndexMap;

use crate::model::AlertRule;

/// Base for documentation links given as site-relative paths.
pub const DOCS_BASE_URL: &str = "https://crunch.atlassian.net/wiki/spaces";

/// `severity` first, then rule labels whose names are not taken yet.
pub fn labels(rule: &AlertRule) -> IndexMap<String, String> {
    let mut labels = IndexMap::new();
    labels.insert("severity".to_owned(), rule.severity.as_label().to_owned());

    for label in &rule.labels {
        labels
            .entry(label.name.clone())
            .or_insert_with(|| label.value.clone());
    }
    labels
}

/// `summary`, `description`, `confluence_link`, then rule annotations whose
/// names are not taken yet.
pub fn annotations(rule: &AlertRule) -> IndexMap<String, String> {
    let mut anns = IndexMap::new();
    anns.insert("summary".to_owned(), rule.summary.clone());
    anns.insert("description".to_owned(), rule.description.clone());
    anns.insert("confluence_link".to_owned(), confluence_link(&rule.confluence_link));

    for ann in &rule.annotations {
        anns.entry(ann.name.clone()).or_insert_with(|| ann.value.clone());
    }
    anns
}

fn confluence_link(link: &str) -> String {
    if link.starts_with('/') {
        format!("{DOCS_BASE_URL}{link}")
    } else {
        link.to_owned()
    }
}
