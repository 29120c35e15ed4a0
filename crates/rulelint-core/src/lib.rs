// Public fallible APIs in this crate share one concrete error contract (`LintError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod backend;
pub mod cache;
pub mod checker;
pub mod config;
pub mod driver;
pub mod error;
pub mod extract;
pub mod models;
pub mod prometheus;
pub mod rule_source;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{MetricsBackend, TimeRange};
pub use cache::ExistenceCache;
pub use checker::ExistenceChecker;
pub use config::{BackendConfig, BackendOverrides};
pub use driver::{FindingSink, NullSink, Validator};
pub use error::{LintError, Result};
pub use extract::{MetricSelector, extract_metric_names, parse_rule_query};
pub use prometheus::PrometheusClient;
pub use rule_source::{BackendRuleSource, RuleFileSource, RuleSource};
