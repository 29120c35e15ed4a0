use reqwest::Url;

use crate::error::{LintError, Result};

mod env;

pub const URL_ENV: &str = "RULELINT_URL";
pub const BEARER_TOKEN_ENV: &str = "RULELINT_BEARER_TOKEN";
pub const TIMEOUT_MS_ENV: &str = "RULELINT_TIMEOUT_MS";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Values supplied on the command line. Anything left unset falls back to
/// the `RULELINT_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct BackendOverrides {
    pub url: Option<String>,
    pub bearer_token: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Clone)]
pub struct BackendConfig {
    pub base_url: Url,
    pub bearer_token: Option<String>,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url.as_str())
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl BackendConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_backend_url(base_url)?,
            bearer_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    pub fn resolve(overrides: BackendOverrides) -> Result<Self> {
        Self::resolve_with(overrides, env::read_non_empty_env)
    }

    pub(crate) fn resolve_with<F>(overrides: BackendOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = overrides
            .url
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .or_else(|| lookup(URL_ENV))
            .ok_or_else(|| {
                LintError::Config(format!("missing backend URL (pass --url or set {URL_ENV})"))
            })?;
        let base_url = parse_backend_url(&raw_url)?;

        let bearer_token = overrides
            .bearer_token
            .filter(|value| !value.trim().is_empty())
            .or_else(|| lookup(BEARER_TOKEN_ENV));

        let timeout_ms = match overrides.timeout_ms {
            Some(value) => value,
            None => match lookup(TIMEOUT_MS_ENV) {
                Some(raw) => env::parse_u64_setting(Some(raw.as_str())).ok_or_else(|| {
                    LintError::Config(format!("invalid {TIMEOUT_MS_ENV}: {raw}"))
                })?,
                None => DEFAULT_TIMEOUT_MS,
            },
        };
        if timeout_ms == 0 {
            return Err(LintError::Config(
                "backend timeout must be at least 1ms".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            bearer_token,
            timeout_ms,
        })
    }

    /// Joins an API path onto the base URL, keeping any path prefix the
    /// backend is served under.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Accepts only absolute `http`/`https` URLs with a host.
pub fn parse_backend_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|err| LintError::Config(format!("invalid backend URL {raw:?}: {err}")))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(LintError::Config(format!(
                "unsupported backend URL scheme: {other}"
            )));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(LintError::Config(format!(
            "backend URL host is missing: {raw}"
        )));
    }
    Ok(url)
}
