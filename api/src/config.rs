use std::time::Duration;

const FANGRAPHS: &str = "https://www.fangraphs.com";
const BASEBALL_REFERENCE: &str = "https://www.baseball-reference.com";
const STATSAPI: &str = "https://statsapi.mlb.com";
const MLBSTATIC: &str = "https://www.mlbstatic.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where each collaborator lives and how long a single call may take.
///
/// Every base URL is overridable so tests (and mirrors) can point the
/// adapters somewhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub fangraphs_url: String,
    pub bref_url: String,
    pub statsapi_url: String,
    pub logo_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            fangraphs_url: FANGRAPHS.to_owned(),
            bref_url: BASEBALL_REFERENCE.to_owned(),
            statsapi_url: STATSAPI.to_owned(),
            logo_url: MLBSTATIC.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: "mlbtui/0.1 (terminal team dashboard)".to_owned(),
        }
    }
}

impl SourceConfig {
    /// Defaults, overlaid with any non-empty `MLBTUI_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get("MLBTUI_FANGRAPHS_URL") {
            config.fangraphs_url = url;
        }
        if let Some(url) = get("MLBTUI_BREF_URL") {
            config.bref_url = url;
        }
        if let Some(url) = get("MLBTUI_STATSAPI_URL") {
            config.statsapi_url = url;
        }
        if let Some(url) = get("MLBTUI_LOGO_URL") {
            config.logo_url = url;
        }
        if let Some(secs) = get("MLBTUI_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok())
            && secs > 0
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Point every collaborator at one server, e.g. a mock.
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_owned();
        Self {
            fangraphs_url: base.clone(),
            bref_url: base.clone(),
            statsapi_url: base.clone(),
            logo_url: base,
            ..Self::default()
        }
    }
}
