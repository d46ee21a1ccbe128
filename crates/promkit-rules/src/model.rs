//! Alert rule definitions as consumed by the generator.
//!
//! Rules are plain data: built in code with the builder methods below or
//! deserialized from a rules config file.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Urgency attached to every rendered rule as the `severity` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    #[default]
    #[serde(alias = "page")]
    Page,
    #[serde(alias = "warning")]
    Warning,
}

impl Severity {
    /// Label value (lowercase).
    pub fn as_label(self) -> &'static str {
        match self {
            Severity::Page => "page",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A `name = value` override for a label or an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One alert rule.
///
/// `rule` may reference `metric_names` positionally as `$1`, `$2`, ...
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertRule {
    pub name: String,
    /// Passed through verbatim (e.g. `5m`).
    pub duration: String,
    #[serde(default)]
    pub metric_names: Vec<String>,
    pub rule: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub labels: Vec<NameValue>,
    #[serde(default)]
    pub annotations: Vec<NameValue>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confluence_link: String,
}

impl AlertRule {
    pub fn new(name: impl Into<String>, duration: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: duration.into(),
            metric_names: Vec::new(),
            rule: rule.into(),
            severity: Severity::default(),
            labels: Vec::new(),
            annotations: Vec::new(),
            summary: String::new(),
            description: String::new(),
            confluence_link: String::new(),
        }
    }

    pub fn metric_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metric_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push(NameValue::new(name, value));
        self
    }

    pub fn annotation(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.push(NameValue::new(name, value));
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn confluence_link(mut self, link: impl Into<String>) -> Self {
        self.confluence_link = link.into();
        self
    }
}

/// A named set of rules rendered together.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertRuleGroup {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<AlertRule>,
}

/// Target rule-file format, by Prometheus major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrometheusVersion {
    /// 1.x `ALERT ... IF ...` text format.
    V1,
    /// 2.x YAML rule groups.
    V2,
}

impl FromStr for PrometheusVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" | "1.x" => Ok(PrometheusVersion::V1),
            "v2" | "2" | "2.x" => Ok(PrometheusVersion::V2),
            other => Err(format!("unknown prometheus version `{other}` (expected v1 or v2)")),
        }
    }
}
