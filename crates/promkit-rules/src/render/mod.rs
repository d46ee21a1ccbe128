//! Rule-file rendering.
//!
//! Every rule is first resolved into a [`RenderedRule`] (expanded
//! expression, merged labels and annotations), then handed to the renderer
//! for the target Prometheus version.

pub mod declarative;
pub mod legacy;

use indexmap::IndexMap;
use promkit_core::{normalize, Result};

use crate::expand::expand;
use crate::merge;
use crate::model::{AlertRule, AlertRuleGroup, PrometheusVersion};

/// A rule with every substitution and merge applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRule {
    /// The rule's own name, unmodified.
    pub alert_name: String,
    pub expr: String,
    pub duration: String,
    pub labels: IndexMap<String, String>,
    pub annotations: IndexMap<String, String>,
}

impl RenderedRule {
    /// Resolve `rule` against a normalized prefix (with separator, or empty).
    pub fn resolve(rule: &AlertRule, normalized_prefix: &str) -> Self {
        Self {
            alert_name: rule.name.clone(),
            expr: expand(rule, normalized_prefix),
            duration: rule.duration.clone(),
            labels: merge::labels(rule),
            annotations: merge::annotations(rule),
        }
    }
}

/// Normalized prefix plus separator; empty when the prefix normalizes away.
pub fn normalized_prefix(metric_prefix: &str) -> String {
    let p = normalize(metric_prefix);
    if p.is_empty() {
        p
    } else {
        p + "_"
    }
}

/// Render `rules` into a rule file for `version`.
///
/// `alert_group_name` only exists in the V2 format; V1 ignores it.
pub fn render(
    version: PrometheusVersion,
    metric_prefix: &str,
    alert_group_name: &str,
    rules: &[AlertRule],
) -> Result<String> {
    let prefix = normalized_prefix(metric_prefix);
    let rendered: Vec<RenderedRule> = rules
        .iter()
        .map(|r| RenderedRule::resolve(r, &prefix))
        .collect();

    tracing::debug!(?version, rules = rendered.len(), group = alert_group_name, "rendering rules");

    match version {
        PrometheusVersion::V1 => Ok(legacy::render(&rendered)),
        PrometheusVersion::V2 => declarative::render(metric_prefix, alert_group_name, &rendered),
    }
}

/// Render a whole group; the group name becomes the V2 group name.
pub fn render_group(
    version: PrometheusVersion,
    metric_prefix: &str,
    group: &AlertRuleGroup,
) -> Result<String> {
    render(version, metric_prefix, &group.name, &group.rules)
}
