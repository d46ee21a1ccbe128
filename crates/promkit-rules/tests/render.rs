#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::path::Path;

use promkit_rules::{config, render, render_group, AlertRule, PrometheusVersion, Severity};
use serde_yaml::Value;

fn expectation(name: &str) -> String {
    fs::read_to_string(format!("tests/expectations/{name}")).unwrap()
}

fn webapp() -> config::RulesConfig {
    config::load_from_file(Path::new("tests/fixtures/webapp_rules.yaml")).unwrap()
}

fn keys(v: &Value) -> Vec<String> {
    v.as_mapping()
        .unwrap()
        .keys()
        .map(|k| k.as_str().unwrap().to_owned())
        .collect()
}

#[test]
fn v1_matches_expected_rule_file() {
    let cfg = webapp();
    let out = render_group(PrometheusVersion::V1, &cfg.metric_prefix, &cfg.group).unwrap();
    assert_eq!(out.trim(), expectation("generated_rules.rule").trim());
}

#[test]
fn v1_ignores_group_name() {
    let cfg = webapp();
    let a = render(PrometheusVersion::V1, "Test", "???", &cfg.group.rules).unwrap();
    let b = render(PrometheusVersion::V1, "Test", "webapp.alerts", &cfg.group.rules).unwrap();
    assert_eq!(a, b);
    assert!(!a.contains("webapp.alerts"));
}

#[test]
fn v2_document_shape() {
    let cfg = webapp();
    let out = render_group(PrometheusVersion::V2, &cfg.metric_prefix, &cfg.group).unwrap();
    let doc: Value = serde_yaml::from_str(&out).unwrap();

    assert_eq!(keys(&doc), vec!["groups"]);
    let groups = doc["groups"].as_sequence().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(keys(&groups[0]), vec!["name", "rules"]);
    assert_eq!(groups[0]["name"].as_str(), Some("webapp.alerts"));

    let rules = groups[0]["rules"].as_sequence().unwrap();
    assert_eq!(rules.len(), 2);
    for rule in rules {
        assert_eq!(keys(rule), vec!["alert", "expr", "for", "labels", "annotations"]);
        assert!(rule["alert"].as_str().unwrap().starts_with("Test"));
    }

    let first = &rules[0];
    assert_eq!(first["alert"].as_str(), Some("TestNginxIsDroppingConnectionsFull"));
    assert_eq!(
        first["expr"].as_str(),
        Some("increase(test_nginx_dropped_connections[1m]) > 0")
    );
    assert_eq!(first["for"].as_str(), Some("2m"));
    assert_eq!(keys(&first["labels"]), vec!["severity", "extra"]);
    assert_eq!(first["labels"]["severity"].as_str(), Some("warning"));
    assert_eq!(
        keys(&first["annotations"]),
        vec!["summary", "description", "confluence_link", "foo"]
    );
    assert_eq!(
        first["annotations"]["description"].as_str(),
        Some("NGINX node \"{{ $labels.instance }}\" is dropping connections. This is normally due to running out of resources.")
    );

    let second = &rules[1];
    assert_eq!(second["alert"].as_str(), Some("TestRequestsPerSecondIncreaseMinimal"));
    assert_eq!(second["labels"]["severity"].as_str(), Some("page"));
    assert_eq!(
        second["annotations"]["confluence_link"].as_str(),
        Some("https://crunch.atlassian.net/wiki/spaces/PLAT/pages/199294994/NGINX+request+rate")
    );
}

#[test]
fn v2_individual_rule_from_json() {
    let cfg = config::load_from_file(Path::new("tests/fixtures/individual_rule.json")).unwrap();
    let out = render_group(PrometheusVersion::V2, &cfg.metric_prefix, &cfg.group).unwrap();
    let doc: Value = serde_yaml::from_str(&out).unwrap();

    assert_eq!(doc["groups"][0]["name"].as_str(), Some("Untilted"));
    let rule = &doc["groups"][0]["rules"][0];
    assert_eq!(rule["alert"].as_str(), Some("AuditServiceRpsRule"));
    assert_eq!(
        rule["expr"].as_str(),
        Some("avg_over_time(audit_service_rps[1m]) / avg_over_time(audit_service_rps[24h]) * 100 > 200")
    );
    assert_eq!(rule["for"].as_str(), Some("12h"));
    assert_eq!(rule["annotations"]["summary"].as_str(), Some("Summary"));
    assert_eq!(
        rule["annotations"]["confluence_link"].as_str(),
        Some("https://crunch.atlassian.net/wiki/spaces/PLAT/pages/1976")
    );
}

#[test]
fn v2_keeps_declared_label_order() {
    let rule = AlertRule::new("Ordering", "1m", "$1 > 0")
        .metric_names(["q"])
        .severity(Severity::Warning)
        .label("zeta", "1")
        .label("alpha", "2")
        .label("severity", "page");
    let out = render(PrometheusVersion::V2, "svc", "g", &[rule]).unwrap();
    let doc: Value = serde_yaml::from_str(&out).unwrap();
    let labels = &doc["groups"][0]["rules"][0]["labels"];
    assert_eq!(keys(labels), vec!["severity", "zeta", "alpha"]);
    assert_eq!(labels["severity"].as_str(), Some("warning"));
}

#[test]
fn unmatched_placeholder_passes_through() {
    let rule = AlertRule::new("Broken", "1m", "$1 / $2").metric_names(["only"]);
    let out = render(PrometheusVersion::V1, "app", "", &[rule]).unwrap();
    assert!(out.contains("IF app_only / $2"));
}
