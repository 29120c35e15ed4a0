use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use crate::backend::{LabelSet, MetricsBackend, TimeRange};
use crate::error::{LintError, Result};
use crate::models::{Rule, RuleGroup, RuleKind};

/// In-memory backend that records every call it receives.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    groups: Vec<RuleGroup>,
    listing_error: Option<String>,
    series: HashMap<String, usize>,
    failures: RefCell<HashMap<String, usize>>,
    listing_calls: Cell<usize>,
    series_calls: RefCell<Vec<String>>,
    ranges: RefCell<Vec<TimeRange>>,
}

impl FakeBackend {
    pub(crate) fn with_groups(mut self, groups: Vec<RuleGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// One group holding the given `(kind, query)` rules.
    pub(crate) fn with_rules(self, rules: &[(RuleKind, &str)]) -> Self {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(idx, (kind, query))| Rule {
                kind: *kind,
                name: format!("rule_{idx}"),
                query: (*query).to_string(),
            })
            .collect();
        self.with_groups(vec![RuleGroup {
            name: "test".to_string(),
            file: "/rules/test.yml".to_string(),
            rules,
        }])
    }

    pub(crate) fn with_series(mut self, metric: &str, count: usize) -> Self {
        self.series.insert(metric.to_string(), count);
        self
    }

    pub(crate) fn failing_rule_listing(mut self, message: &str) -> Self {
        self.listing_error = Some(message.to_string());
        self
    }

    /// The next `times` lookups for `metric` fail before it starts answering.
    pub(crate) fn failing_series(self, metric: &str, times: usize) -> Self {
        self.failures.borrow_mut().insert(metric.to_string(), times);
        self
    }

    pub(crate) fn rule_listing_calls(&self) -> usize {
        self.listing_calls.get()
    }

    pub(crate) fn series_calls_for(&self, metric: &str) -> usize {
        self.series_calls
            .borrow()
            .iter()
            .filter(|name| name.as_str() == metric)
            .count()
    }

    pub(crate) fn total_series_calls(&self) -> usize {
        self.series_calls.borrow().len()
    }

    pub(crate) fn last_range(&self) -> Option<TimeRange> {
        self.ranges.borrow().last().copied()
    }
}

fn metric_from_matcher(matcher: &str) -> String {
    matcher
        .strip_prefix("{__name__=\"")
        .and_then(|rest| rest.strip_suffix("\"}"))
        .unwrap_or(matcher)
        .to_string()
}

impl MetricsBackend for FakeBackend {
    fn rule_groups(&self) -> Result<Vec<RuleGroup>> {
        self.listing_calls.set(self.listing_calls.get() + 1);
        if let Some(message) = &self.listing_error {
            return Err(LintError::Backend(message.clone()));
        }
        Ok(self.groups.clone())
    }

    fn series(&self, matcher: &str, range: &TimeRange) -> Result<Vec<LabelSet>> {
        let metric = metric_from_matcher(matcher);
        self.series_calls.borrow_mut().push(metric.clone());
        self.ranges.borrow_mut().push(*range);

        if let Some(remaining) = self.failures.borrow_mut().get_mut(&metric)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(LintError::Backend(format!("transient failure for {metric}")));
        }

        let count = self.series.get(&metric).copied().unwrap_or(0);
        Ok((0..count)
            .map(|idx| {
                BTreeMap::from([
                    ("__name__".to_string(), metric.clone()),
                    ("instance".to_string(), format!("host-{idx}:9100")),
                ])
            })
            .collect())
    }
}
