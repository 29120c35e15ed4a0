use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LintError>;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("failed to list rules: {source}")]
    ListRules {
        #[source]
        source: Box<LintError>,
    },

    #[error("failed to get metric {metric:?}: {source}")]
    MetricLookup {
        metric: String,
        #[source]
        source: Box<LintError>,
    },

    #[error("failed to parse rule {query:?}: {message}")]
    Parse { query: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_norway::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Machine-readable view of an error, embedded in run reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

impl LintError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Backend(_) => "BACKEND_ERROR",
            Self::ListRules { .. } => "LIST_RULES_FAILED",
            Self::MetricLookup { .. } => "METRIC_LOOKUP_FAILED",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Yaml(_) => "YAML_ERROR",
            Self::Http(_) => "HTTP_ERROR",
        }
    }

    pub(crate) fn list_rules(source: Self) -> Self {
        Self::ListRules {
            source: Box::new(source),
        }
    }

    pub(crate) fn metric_lookup(metric: impl Into<String>, source: Self) -> Self {
        Self::MetricLookup {
            metric: metric.into(),
            source: Box::new(source),
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        let metric = match self {
            Self::MetricLookup { metric, .. } => Some(metric.clone()),
            _ => None,
        };
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            metric,
        }
    }
}
