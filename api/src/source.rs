use crate::config::SourceConfig;
use crate::error::{SourceResult, SourceUnavailable};
use crate::teams::Team;
use crate::wire::ScheduleGame;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Primary,
    Secondary,
}

impl Provider {
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Primary => "primary",
            Provider::Secondary => "secondary",
        }
    }
}

/// A loosely-typed stat row exactly as the provider named its columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeRow {
    /// Whatever the provider keys teams by: an abbreviation or a full name.
    pub team_key: String,
    pub columns: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeTeamStats {
    pub provider: Provider,
    pub batting: Vec<NativeRow>,
    pub pitching: Vec<NativeRow>,
}

/// One scraped division table: header names and the row cells under them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DivisionTable {
    pub caption: Option<String>,
    pub rows: Vec<Vec<(String, String)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NativeStandings {
    /// Structured division tables scraped from the primary provider.
    Tables(Vec<DivisionTable>),
    /// The secondary provider's fixed-width text report.
    Report(String),
}

/// One scraped schedule row, cells keyed by their column identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedGame {
    pub cells: Vec<(String, String)>,
}

impl ScrapedGame {
    pub fn cell(&self, key: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NativeSchedule {
    Scraped(Vec<ScrapedGame>),
    Api { team_id: u32, games: Vec<ScheduleGame> },
}

/// Query-by-year access to one upstream provider. Each call is a single
/// attempt: no retries, no caching.
#[async_trait]
pub trait StatsSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_team_stats(&self, year: i32) -> SourceResult<NativeTeamStats>;

    async fn fetch_standings(&self, year: i32) -> SourceResult<NativeStandings>;

    async fn fetch_schedule(&self, year: i32, team: &Team) -> SourceResult<NativeSchedule>;
}

/// Shared HTTP plumbing: one client, one per-call timeout, URL-carrying errors.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(config.user_agent.as_str())
                .build()
                .unwrap_or_default(),
            timeout: config.timeout,
        }
    }

    /// Body text of a 2xx response. Anything else is a `SourceUnavailable`.
    pub async fn get_text(&self, url: &str) -> SourceResult<String> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| SourceUnavailable::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceUnavailable::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SourceUnavailable::from_reqwest(url, e))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> SourceResult<T> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| SourceUnavailable::Malformed {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// Numeric reading of a loosely-typed JSON value: numbers as-is, numeric
/// strings such as `".254"` or `"1,445"` parsed, everything else dropped.
pub(crate) fn json_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_number_reads_numbers_and_numeric_strings() {
        assert_eq!(json_number(&json!(12)), Some(12.0));
        assert_eq!(json_number(&json!(".254")), Some(0.254));
        assert_eq!(json_number(&json!("1,445.2")), Some(1445.2));
        assert_eq!(json_number(&json!("-.--")), None);
        assert_eq!(json_number(&json!(null)), None);
    }

    #[test]
    fn scraped_cells_ignore_blank_values() {
        let game = ScrapedGame {
            cells: vec![("R".into(), " 5 ".into()), ("RA".into(), "".into())],
        };
        assert_eq!(game.cell("R"), Some("5"));
        assert_eq!(game.cell("RA"), None);
        assert_eq!(game.cell("attendance"), None);
    }

    #[tokio::test]
    async fn non_success_status_is_source_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/down")
            .with_status(503)
            .create_async()
            .await;

        let http = HttpClient::new(&SourceConfig::single_host(&server.url()));
        let err = http
            .get_text(&format!("{}/down", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceUnavailable::Status { status: 503, .. }), "{err}");
    }

    #[tokio::test]
    async fn undecodable_json_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/teams")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let http = HttpClient::new(&SourceConfig::single_host(&server.url()));
        let err = http
            .get_json::<serde_json::Value>(&format!("{}/teams", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceUnavailable::Malformed { .. }), "{err}");
    }
}
