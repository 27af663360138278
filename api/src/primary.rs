use crate::config::SourceConfig;
use crate::error::{SourceResult, SourceUnavailable};
use crate::source::{
    json_number, DivisionTable, HttpClient, NativeRow, NativeSchedule, NativeStandings,
    NativeTeamStats, Provider, ScrapedGame, StatsSource,
};
use crate::teams::Team;
use crate::wire::LeaderboardResponse;
use async_trait::async_trait;
use log::debug;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").expect("selector"));
static CAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("caption").expect("selector"));
/// Column names sit in the last header row; earlier rows are group labels.
static HEADER_CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("thead tr:last-child th").expect("selector"));
static BODY_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody tr").expect("selector"));
static ROW_CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th, td").expect("selector"));
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("selector"));
static SCHEDULE_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#team_schedule").expect("selector"));

/// Column carrying the club identifier in a FanGraphs team row.
const TEAM_KEY_COLUMNS: [&str; 2] = ["TeamNameAbb", "TeamName"];

/// FanGraphs team leaderboards for season stats, Baseball-Reference pages for
/// standings and schedules.
#[derive(Debug, Clone)]
pub struct PrimarySource {
    http: HttpClient,
    fangraphs_url: String,
    bref_url: String,
}

impl PrimarySource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            http: HttpClient::new(config),
            fangraphs_url: config.fangraphs_url.trim_end_matches('/').to_owned(),
            bref_url: config.bref_url.trim_end_matches('/').to_owned(),
        }
    }

    fn leaderboard_url(&self, group: &str, year: i32) -> String {
        format!(
            "{}/api/leaders/major-league/data?pos=all&stats={group}&lg=all&qual=0&type=8\
             &season={year}&season1={year}&month=0&ind=0&team=0,ts&rost=0&players=0&pageitems=50",
            self.fangraphs_url
        )
    }

    async fn leaderboard(&self, group: &str, year: i32) -> SourceResult<Vec<NativeRow>> {
        let url = self.leaderboard_url(group, year);
        let response: LeaderboardResponse = self.http.get_json(&url).await?;
        let rows = leaderboard_rows(response);
        if rows.is_empty() {
            return Err(SourceUnavailable::Empty {
                what: format!("{year} {group} leaderboard"),
            });
        }
        Ok(rows)
    }
}

/// Club code used in Baseball-Reference team URLs for `year`, when it differs
/// from ours. Relocated and renamed clubs keep their old code for old seasons.
fn bref_code(team: &Team, year: i32) -> &str {
    match team.abbreviation.as_str() {
        "CWS" => "CHW",
        "OAK" if year >= 2025 => "ATH",
        "LAA" if year <= 2004 => "ANA",
        "MIA" if year <= 2011 => "FLA",
        "TBR" if year <= 2007 => "TBD",
        "WSN" if year <= 2004 => "MON",
        other => other,
    }
}

#[async_trait]
impl StatsSource for PrimarySource {
    fn name(&self) -> &'static str {
        "fangraphs/baseball-reference"
    }

    async fn fetch_team_stats(&self, year: i32) -> SourceResult<NativeTeamStats> {
        let (batting, pitching) = futures_util::try_join!(
            self.leaderboard("bat", year),
            self.leaderboard("pit", year)
        )?;
        Ok(NativeTeamStats {
            provider: Provider::Primary,
            batting,
            pitching,
        })
    }

    async fn fetch_standings(&self, year: i32) -> SourceResult<NativeStandings> {
        let url = format!("{}/leagues/majors/{year}-standings.shtml", self.bref_url);
        let body = self.http.get_text(&url).await?;
        let tables = parse_division_tables(&body);
        debug!("{url}: {} division tables", tables.len());
        if tables.is_empty() {
            return Err(SourceUnavailable::Malformed {
                url,
                reason: "no division tables on page".into(),
            });
        }
        Ok(NativeStandings::Tables(tables))
    }

    async fn fetch_schedule(&self, year: i32, team: &Team) -> SourceResult<NativeSchedule> {
        let url = format!(
            "{}/teams/{}/{year}-schedule-scores.shtml",
            self.bref_url,
            bref_code(team, year)
        );
        let body = self.http.get_text(&url).await?;
        let games = parse_schedule_rows(&body).ok_or_else(|| SourceUnavailable::Malformed {
            url: url.clone(),
            reason: "schedule table missing".into(),
        })?;
        if games.is_empty() {
            return Err(SourceUnavailable::Empty {
                what: format!("{year} schedule for {}", team.abbreviation),
            });
        }
        Ok(NativeSchedule::Scraped(games))
    }
}

// ---------------------------------------------------------------------------
// Payload readers. HTML documents are parsed and dropped inside these
// synchronous helpers; nothing here is held across an await.
// ---------------------------------------------------------------------------

fn leaderboard_rows(response: LeaderboardResponse) -> Vec<NativeRow> {
    response
        .data
        .into_iter()
        .filter_map(|row| {
            let team_key = TEAM_KEY_COLUMNS
                .iter()
                .find_map(|k| row.get(*k).and_then(|v| v.as_str()))
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())?;
            let columns = row
                .iter()
                .filter(|(name, _)| !TEAM_KEY_COLUMNS.contains(&name.as_str()))
                .filter_map(|(name, value)| json_number(value).map(|v| (name.clone(), v)))
                .collect();
            Some(NativeRow { team_key, columns })
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_owned()
}

/// Every table on the standings page that has a `Tm` header and at least one
/// row. Each row's first column is replaced by the linked club name.
pub(crate) fn parse_division_tables(body: &str) -> Vec<DivisionTable> {
    let document = Html::parse_document(body);
    let mut tables = Vec::new();

    for table in document.select(&TABLE) {
        let headers: Vec<String> = table.select(&HEADER_CELLS).map(cell_text).collect();
        if headers.first().map(String::as_str) != Some("Tm") {
            continue;
        }

        let rows: Vec<Vec<(String, String)>> = table
            .select(&BODY_ROWS)
            .filter_map(|tr| {
                let mut cells: Vec<String> = tr.select(&ROW_CELLS).map(cell_text).collect();
                if cells.is_empty() {
                    return None;
                }
                if let Some(name) = tr.select(&LINK).next().map(cell_text) {
                    cells[0] = name;
                }
                Some(headers.iter().cloned().zip(cells).collect())
            })
            .collect();

        if rows.is_empty() {
            continue;
        }
        tables.push(DivisionTable {
            caption: table.select(&CAPTION).next().map(cell_text),
            rows,
        });
    }
    tables
}

/// `None` when the page has no schedule table at all.
pub(crate) fn parse_schedule_rows(body: &str) -> Option<Vec<ScrapedGame>> {
    let document = Html::parse_document(body);
    let table = document.select(&SCHEDULE_TABLE).next()?;

    let games = table
        .select(&BODY_ROWS)
        .filter(|tr| !tr.value().classes().any(|c| c == "thead"))
        .map(|tr| ScrapedGame {
            cells: tr
                .select(&ROW_CELLS)
                .filter_map(|cell| {
                    let key = cell.value().attr("data-stat")?;
                    Some((key.to_owned(), cell_text(cell)))
                })
                .collect(),
        })
        .filter(|game| !game.cells.is_empty())
        .collect();
    Some(games)
}
