use std::collections::BTreeSet;
use std::convert::Infallible;

use promql_parser::parser::{self, Expr, MatrixSelector, VectorSelector};
use promql_parser::util::{ExprVisitor, walk_expr};

use crate::error::{LintError, Result};

/// Node kinds that name a single time series.
///
/// Returns the positional metric name, or `None` when the node is not a
/// selector or when the name is only given through a `__name__` matcher.
/// Matcher-only selectors are deliberately not treated as references.
pub trait MetricSelector {
    fn selector_name(&self) -> Option<&str>;
}

impl MetricSelector for VectorSelector {
    fn selector_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

impl MetricSelector for MatrixSelector {
    fn selector_name(&self) -> Option<&str> {
        self.vs.selector_name()
    }
}

impl MetricSelector for Expr {
    fn selector_name(&self) -> Option<&str> {
        match self {
            Expr::VectorSelector(selector) => selector.selector_name(),
            Expr::MatrixSelector(selector) => selector.selector_name(),
            _ => None,
        }
    }
}

pub fn parse_rule_query(query: &str) -> Result<Expr> {
    parser::parse(query).map_err(|message| LintError::Parse {
        query: query.to_string(),
        message,
    })
}

#[derive(Debug, Default)]
struct MetricNameCollector {
    names: BTreeSet<String>,
}

impl ExprVisitor for MetricNameCollector {
    type Error = Infallible;

    fn pre_visit(&mut self, expr: &Expr) -> std::result::Result<bool, Self::Error> {
        if let Some(name) = expr.selector_name() {
            self.names.insert(name.to_string());
        }
        Ok(true)
    }
}

/// Distinct metric names referenced anywhere in `expr`.
pub fn extract_metric_names(expr: &Expr) -> BTreeSet<String> {
    let mut collector = MetricNameCollector::default();
    match walk_expr(&mut collector, expr) {
        Ok(_) => {}
        Err(never) => match never {},
    }
    collector.names
}
