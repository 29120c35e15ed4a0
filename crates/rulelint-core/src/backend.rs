use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::Result;
use crate::models::RuleGroup;

/// Label set of one series as returned by the series endpoint.
pub type LabelSet = BTreeMap<String, String>;

/// `0001-01-01T00:00:00Z`, the zero instant Prometheus clients send for an
/// unbounded range start.
pub const EARLIEST_UNIX_SECONDS: i64 = -62_135_596_800;

/// The two backend operations the validator depends on.
pub trait MetricsBackend {
    fn rule_groups(&self) -> Result<Vec<RuleGroup>>;

    /// Series matching `matcher` with samples inside `range`.
    fn series(&self, matcher: &str, range: &TimeRange) -> Result<Vec<LabelSet>>;
}

impl<B: MetricsBackend + ?Sized> MetricsBackend for &B {
    fn rule_groups(&self) -> Result<Vec<RuleGroup>> {
        (**self).rule_groups()
    }

    fn series(&self, matcher: &str, range: &TimeRange) -> Result<Vec<LabelSet>> {
        (**self).series(matcher, range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Everything the backend has ever stored up to `end`.
    pub fn lifetime_until(end: DateTime<Utc>) -> Self {
        Self {
            start: earliest_instant(),
            end,
        }
    }

    pub fn lifetime_until_now() -> Self {
        Self::lifetime_until(Utc::now())
    }
}

pub(crate) fn earliest_instant() -> DateTime<Utc> {
    DateTime::from_timestamp(EARLIEST_UNIX_SECONDS, 0).unwrap_or_default()
}

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Equality matcher on the metric name label, e.g. `{__name__="up"}`.
pub fn name_matcher(metric: &str) -> String {
    let mut escaped = String::with_capacity(metric.len());
    for ch in metric.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    format!("{{__name__=\"{escaped}\"}}")
}
