use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::backend::{LabelSet, MetricsBackend, TimeRange, format_timestamp};
use crate::config::BackendConfig;
use crate::error::{LintError, Result};
use crate::models::RuleGroup;

const RULES_PATH: &str = "api/v1/rules";
const SERIES_PATH: &str = "api/v1/series";
const SERIES_LOOKUP_LIMIT: usize = 1;

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    status: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RulesData {
    #[serde(default)]
    groups: Vec<RuleGroup>,
}

/// Blocking client for the Prometheus HTTP API.
#[derive(Clone)]
pub struct PrometheusClient {
    config: BackendConfig,
    http: Client,
}

impl std::fmt::Debug for PrometheusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusClient")
            .field("base_url", &self.config.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl PrometheusClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| LintError::Config(format!("invalid bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = self.config.endpoint(path);
        log::debug!("GET {url} {params:?}");
        let resp = self.http.get(url).query(params).send()?;
        decode_response(resp)
    }
}

impl MetricsBackend for PrometheusClient {
    fn rule_groups(&self) -> Result<Vec<RuleGroup>> {
        let data: RulesData = self.get(RULES_PATH, &[])?;
        Ok(data.groups)
    }

    fn series(&self, matcher: &str, range: &TimeRange) -> Result<Vec<LabelSet>> {
        self.get(SERIES_PATH, &series_query_params(matcher, range))
    }
}

/// Existence only needs one series back; servers without `limit` support
/// ignore the parameter.
pub(crate) fn series_query_params(matcher: &str, range: &TimeRange) -> Vec<(&'static str, String)> {
    vec![
        ("match[]", matcher.to_string()),
        ("start", format_timestamp(range.start)),
        ("end", format_timestamp(range.end)),
        ("limit", SERIES_LOOKUP_LIMIT.to_string()),
    ]
}

fn decode_response<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let body = resp.text()?;
    parse_api_response(status.as_u16(), &body)
}

/// Unwraps the `{"status": ..., "data": ...}` envelope shared by every
/// Prometheus API endpoint.
pub(crate) fn parse_api_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T> {
    let success_status = (200..300).contains(&status);
    let envelope = match serde_json::from_str::<ApiEnvelope>(body) {
        Ok(envelope) => envelope,
        Err(_) if !success_status => {
            return Err(LintError::Backend(format!("unexpected status {status}")));
        }
        Err(err) => return Err(err.into()),
    };

    if envelope.status != "success" {
        let error_type = envelope.error_type.as_deref().unwrap_or("unknown");
        let message = envelope.error.as_deref().unwrap_or("no error message");
        return Err(LintError::Backend(format!(
            "{error_type}: {message} (status {status})"
        )));
    }
    if !success_status {
        return Err(LintError::Backend(format!("unexpected status {status}")));
    }

    let data = envelope
        .data
        .ok_or_else(|| LintError::Backend("response is missing data".to_string()))?;
    Ok(serde_json::from_value(data)?)
}
