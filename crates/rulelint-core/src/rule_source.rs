use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::backend::MetricsBackend;
use crate::error::{LintError, Result};
use crate::models::{RuleGroup, RuleKind, RuleQuery};

/// Produces the ordered list of rule expressions to validate.
pub trait RuleSource {
    fn rule_queries(&self) -> Result<Vec<RuleQuery>>;
}

/// Rules currently loaded by the backend.
#[derive(Debug)]
pub struct BackendRuleSource<B> {
    backend: B,
}

impl<B: MetricsBackend> BackendRuleSource<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: MetricsBackend> RuleSource for BackendRuleSource<B> {
    fn rule_queries(&self) -> Result<Vec<RuleQuery>> {
        let groups = self.backend.rule_groups().map_err(LintError::list_rules)?;
        Ok(flatten_rule_groups(groups))
    }
}

/// Keeps backend order and drops rule kinds that carry no query.
pub fn flatten_rule_groups(groups: Vec<RuleGroup>) -> Vec<RuleQuery> {
    let mut queries = Vec::new();
    for group in groups {
        for rule in group.rules {
            if !rule.kind.carries_query() {
                log::debug!(
                    "skipping rule {:?} in group {:?}: unsupported kind",
                    rule.name,
                    group.name
                );
                continue;
            }
            queries.push(RuleQuery {
                file: group.file.clone(),
                group: group.name.clone(),
                rule: rule.name,
                kind: rule.kind,
                query: rule.query,
            });
        }
    }
    queries
}

#[derive(Debug, Deserialize)]
struct RuleFileDocument {
    #[serde(default)]
    groups: Vec<RuleFileGroup>,
}

#[derive(Debug, Deserialize)]
struct RuleFileGroup {
    name: String,
    #[serde(default)]
    rules: Vec<RuleFileEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleFileEntry {
    #[serde(default)]
    record: Option<String>,
    #[serde(default)]
    alert: Option<String>,
    #[serde(default)]
    expr: String,
}

/// Rules read from Prometheus rule files on disk, in argument order.
#[derive(Debug, Clone)]
pub struct RuleFileSource {
    paths: Vec<PathBuf>,
}

impl RuleFileSource {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl RuleSource for RuleFileSource {
    fn rule_queries(&self) -> Result<Vec<RuleQuery>> {
        let mut queries = Vec::new();
        for path in &self.paths {
            let raw = fs::read_to_string(path).map_err(|err| {
                LintError::Io(std::io::Error::new(
                    err.kind(),
                    format!("failed to read rule file {}: {err}", path.display()),
                ))
            })?;
            queries.extend(parse_rule_file(&path.display().to_string(), &raw)?);
        }
        Ok(queries)
    }
}

pub(crate) fn parse_rule_file(file: &str, raw: &str) -> Result<Vec<RuleQuery>> {
    let document: RuleFileDocument = serde_norway::from_str(raw)?;
    let mut queries = Vec::new();
    for group in document.groups {
        for entry in group.rules {
            let (kind, name) = match (entry.record, entry.alert) {
                (Some(record), _) => (RuleKind::Recording, record),
                (None, Some(alert)) => (RuleKind::Alerting, alert),
                (None, None) => continue,
            };
            queries.push(RuleQuery {
                file: file.to_string(),
                group: group.name.clone(),
                rule: name,
                kind,
                query: entry.expr,
            });
        }
    }
    Ok(queries)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::models::Rule;
    use crate::testing::FakeBackend;

    fn rule(kind: RuleKind, name: &str, query: &str) -> Rule {
        Rule {
            kind,
            name: name.to_string(),
            query: query.to_string(),
        }
    }

    fn group(name: &str, rules: Vec<Rule>) -> RuleGroup {
        RuleGroup {
            name: name.to_string(),
            file: format!("/rules/{name}.yml"),
            rules,
        }
    }

    #[test]
    fn flatten_preserves_order_and_skips_other_kinds() {
        let groups = vec![
            group(
                "first",
                vec![
                    rule(RuleKind::Recording, "a", "sum(a)"),
                    rule(RuleKind::Other, "future", "predict(x)"),
                    rule(RuleKind::Alerting, "b", "b > 1"),
                ],
            ),
            group("second", vec![rule(RuleKind::Alerting, "c", "c == 0")]),
        ];

        let queries = flatten_rule_groups(groups);
        let texts = queries.iter().map(|q| q.query.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["sum(a)", "b > 1", "c == 0"]);
        assert_eq!(queries[2].group, "second");
        assert_eq!(queries[2].file, "/rules/second.yml");
        assert_eq!(queries[1].kind, RuleKind::Alerting);
    }

    #[test]
    fn backend_source_lists_once() {
        let backend = FakeBackend::default().with_groups(vec![group(
            "g",
            vec![rule(RuleKind::Recording, "r", "up")],
        )]);
        let source = BackendRuleSource::new(&backend);
        let queries = source.rule_queries().expect("queries");
        assert_eq!(queries.len(), 1);
        assert_eq!(backend.rule_listing_calls(), 1);
    }

    #[test]
    fn backend_source_wraps_listing_failures() {
        let backend = FakeBackend::default().failing_rule_listing("connection refused");
        let err = BackendRuleSource::new(&backend)
            .rule_queries()
            .expect_err("listing fails");
        assert_eq!(err.code(), "LIST_RULES_FAILED");
        assert!(err.to_string().starts_with("failed to list rules:"));
    }

    #[test]
    fn parse_rule_file_maps_record_and_alert_entries() {
        let raw = r#"
groups:
  - name: node
    interval: 1m
    rules:
      - record: instance:node_cpu:rate5m
        expr: rate(node_cpu_seconds_total[5m])
      - alert: NodeDown
        expr: up{job="node"} == 0
        for: 5m
        labels:
          severity: page
      - expr: orphan_expression
"#;
        let queries = parse_rule_file("node.rules.yml", raw).expect("parse");
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].kind, RuleKind::Recording);
        assert_eq!(queries[0].rule, "instance:node_cpu:rate5m");
        assert_eq!(queries[1].kind, RuleKind::Alerting);
        assert_eq!(queries[1].query, "up{job=\"node\"} == 0");
        assert!(queries.iter().all(|q| q.file == "node.rules.yml" && q.group == "node"));
    }

    #[test]
    fn file_source_reads_files_in_order() {
        let mut first = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            first,
            "groups:\n  - name: a\n    rules:\n      - record: x\n        expr: sum(a_total)"
        )
        .expect("write");
        let mut second = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            second,
            "groups:\n  - name: b\n    rules:\n      - alert: Y\n        expr: b_total > 0"
        )
        .expect("write");

        let source = RuleFileSource::new([first.path(), second.path()]);
        let queries = source.rule_queries().expect("queries");
        let texts = queries.iter().map(|q| q.query.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["sum(a_total)", "b_total > 0"]);
        assert_eq!(queries[1].file, second.path().display().to_string());
    }

    #[test]
    fn file_source_reports_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = RuleFileSource::new([dir.path().join("absent.yml")]);
        let err = source.rule_queries().expect_err("missing file");
        assert_eq!(err.code(), "IO_ERROR");
        assert!(err.to_string().contains("absent.yml"));
    }

    #[test]
    fn parse_rule_file_rejects_invalid_yaml() {
        let err = parse_rule_file("bad.yml", "groups: [unterminated").expect_err("bad yaml");
        assert_eq!(err.code(), "YAML_ERROR");
    }
}
