use crate::backend::MetricsBackend;
use crate::checker::ExistenceChecker;
use crate::error::Result;
use crate::extract::{extract_metric_names, parse_rule_query};
use crate::models::{Diagnostic, RuleQuery, ValidationFinding, ValidationReport};
use crate::rule_source::RuleSource;

/// Receives findings and diagnostics as soon as they are produced.
pub trait FindingSink {
    fn finding(&mut self, finding: &ValidationFinding);
    fn diagnostic(&mut self, diagnostic: &Diagnostic);
}

/// Sink that discards everything; the report still collects results.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FindingSink for NullSink {
    fn finding(&mut self, _finding: &ValidationFinding) {}
    fn diagnostic(&mut self, _diagnostic: &Diagnostic) {}
}

#[derive(Debug)]
pub struct Validator<B> {
    checker: ExistenceChecker<B>,
}

impl<B: MetricsBackend> Validator<B> {
    pub fn new(backend: B) -> Self {
        Self::with_checker(ExistenceChecker::new(backend))
    }

    pub const fn with_checker(checker: ExistenceChecker<B>) -> Self {
        Self { checker }
    }

    /// Validates every rule from `source`.
    ///
    /// Only a failure to list rules aborts the run. Unparseable rules and
    /// failed metric lookups become diagnostics and validation moves on.
    pub fn run<S, K>(&mut self, source: &S, sink: &mut K) -> Result<ValidationReport>
    where
        S: RuleSource + ?Sized,
        K: FindingSink + ?Sized,
    {
        let mut report = ValidationReport::start();
        let rules = source.rule_queries()?;
        report.counters.rules_listed = rules.len();

        let calls_before = self.checker.backend_calls();
        let hits_before = self.checker.cache_hits();
        for rule in &rules {
            self.validate_rule(rule, sink, &mut report);
        }
        report.counters.backend_calls = self.checker.backend_calls() - calls_before;
        report.counters.cache_hits = self.checker.cache_hits() - hits_before;

        let report = report.finish();
        log::info!(
            "validated {}/{} rules: {} missing metrics, {} diagnostics, {} backend lookups",
            report.counters.rules_validated,
            report.counters.rules_listed,
            report.findings.len(),
            report.diagnostics.len(),
            report.counters.backend_calls,
        );
        Ok(report)
    }

    fn validate_rule<K>(&mut self, rule: &RuleQuery, sink: &mut K, report: &mut ValidationReport)
    where
        K: FindingSink + ?Sized,
    {
        let expr = match parse_rule_query(&rule.query) {
            Ok(expr) => expr,
            Err(err) => {
                let diagnostic = Diagnostic::new(rule, &err);
                sink.diagnostic(&diagnostic);
                report.diagnostics.push(diagnostic);
                return;
            }
        };

        let mut complete = true;
        for metric in extract_metric_names(&expr) {
            report.counters.metrics_checked += 1;
            match self.checker.exists(&metric) {
                Ok(true) => {}
                Ok(false) => {
                    let finding = ValidationFinding::new(rule, metric);
                    sink.finding(&finding);
                    report.findings.push(finding);
                }
                Err(err) => {
                    complete = false;
                    let diagnostic = Diagnostic::new(rule, &err);
                    sink.diagnostic(&diagnostic);
                    report.diagnostics.push(diagnostic);
                }
            }
        }
        if complete {
            report.counters.rules_validated += 1;
        }
    }
}
