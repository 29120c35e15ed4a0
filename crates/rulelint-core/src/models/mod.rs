mod report;
mod rules;


pub use report::{Diagnostic, RunCounters, RunStatus, ValidationFinding, ValidationReport};
pub use rules::{Rule, RuleGroup, RuleKind, RuleQuery};
