use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Recording,
    Alerting,
    #[serde(other)]
    Other,
}

impl RuleKind {
    pub const fn carries_query(self) -> bool {
        matches!(self, Self::Recording | Self::Alerting)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recording => "recording",
            Self::Alerting => "alerting",
            Self::Other => "other",
        }
    }
}

/// One rule as reported by the backend's rule listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    pub name: String,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// A single rule expression queued for validation.
///
/// `file`, `group` and `rule` only exist for diagnostics; findings are keyed
/// by the query text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleQuery {
    pub file: String,
    pub group: String,
    pub rule: String,
    pub kind: RuleKind,
    pub query: String,
}
