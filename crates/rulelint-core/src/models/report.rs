use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ErrorPayload, LintError};
use crate::models::{RuleKind, RuleQuery};

/// A metric referenced by a rule that has no series in the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFinding {
    pub group: String,
    pub rule: String,
    pub query: String,
    pub metric: String,
}

impl ValidationFinding {
    pub fn new(rule: &RuleQuery, metric: impl Into<String>) -> Self {
        Self {
            group: rule.group.clone(),
            rule: rule.rule.clone(),
            query: rule.query.clone(),
            metric: metric.into(),
        }
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {:?}: metric {:?} not found!", self.query, self.metric)
    }
}

/// A recoverable failure that skipped one rule or one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub file: String,
    pub group: String,
    pub rule: String,
    pub kind: RuleKind,
    pub query: String,
    #[serde(flatten)]
    pub error: ErrorPayload,
}

impl Diagnostic {
    pub fn new(rule: &RuleQuery, error: &LintError) -> Self {
        Self {
            file: rule.file.clone(),
            group: rule.group.clone(),
            rule: rule.rule.clone(),
            kind: rule.kind,
            query: rule.query.clone(),
            error: error.to_payload(),
        }
    }

    pub fn metric(&self) -> Option<&str> {
        self.error.metric.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} rule {:?} in group {:?})",
            self.error.message,
            self.kind.as_str(),
            self.rule,
            self.group
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Clean,
    MissingMetrics,
    Incomplete,
}

impl RunStatus {
    /// Findings outrank diagnostics: a run that found missing metrics
    /// reports them even if some checks could not complete.
    pub fn derive(findings: usize, diagnostics: usize) -> Self {
        if findings > 0 {
            Self::MissingMetrics
        } else if diagnostics > 0 {
            Self::Incomplete
        } else {
            Self::Clean
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub rules_listed: usize,
    pub rules_validated: usize,
    pub metrics_checked: usize,
    pub backend_calls: usize,
    pub cache_hits: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: RunStatus,
    pub counters: RunCounters,
    pub findings: Vec<ValidationFinding>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub(crate) fn start() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            status: RunStatus::Clean,
            counters: RunCounters::default(),
            findings: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.status = RunStatus::derive(self.findings.len(), self.diagnostics.len());
        self
    }
}
