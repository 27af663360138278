use crate::config::SourceConfig;
use crate::error::{SourceResult, SourceUnavailable};
use crate::source::{
    json_number, HttpClient, NativeRow, NativeSchedule, NativeStandings, NativeTeamStats,
    Provider, StatsSource,
};
use crate::teams::Team;
use crate::wire::{
    DivisionRecord, ScheduleResponse, StandingsResponse, TeamStatsResponse, TeamsResponse,
};
use async_trait::async_trait;
use log::debug;
use std::fmt::Write;

/// American League 103, National League 104.
const LEAGUE_IDS: &str = "103,104";

/// The MLB Stats API. Standings are rendered into the text report the
/// normalizer parses; schedules keep their full dates.
#[derive(Debug, Clone)]
pub struct SecondarySource {
    http: HttpClient,
    base: String,
}

impl SecondarySource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            http: HttpClient::new(config),
            base: config.statsapi_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Numeric club id from the team-directory endpoint.
    pub async fn fetch_team_id(&self, team: &Team, year: i32) -> SourceResult<u32> {
        let url = format!("{}/api/v1/teams?sportId=1&season={year}", self.base);
        let response: TeamsResponse = self.http.get_json(&url).await?;
        response
            .teams
            .iter()
            .find(|t| {
                team.matches(&t.name) || t.abbreviation.as_deref().is_some_and(|a| team.matches(a))
            })
            .map(|t| t.id)
            .ok_or_else(|| SourceUnavailable::UnknownTeam {
                source_name: self.name(),
                team: team.name.clone(),
            })
    }

    async fn stat_group(&self, group: &str, year: i32) -> SourceResult<Vec<NativeRow>> {
        let url = format!(
            "{}/api/v1/teams/stats?season={year}&group={group}&stats=season&sportIds=1",
            self.base
        );
        let response: TeamStatsResponse = self.http.get_json(&url).await?;
        let rows: Vec<NativeRow> = response
            .stats
            .into_iter()
            .flat_map(|g| g.splits)
            .filter_map(|split| {
                let team = split.team?;
                let columns = split
                    .stat
                    .iter()
                    .filter_map(|(name, value)| json_number(value).map(|v| (name.clone(), v)))
                    .collect();
                Some(NativeRow {
                    team_key: team.name,
                    columns,
                })
            })
            .collect();
        if rows.is_empty() {
            return Err(SourceUnavailable::Empty {
                what: format!("{year} {group} team stats"),
            });
        }
        Ok(rows)
    }
}

#[async_trait]
impl StatsSource for SecondarySource {
    fn name(&self) -> &'static str {
        "statsapi"
    }

    async fn fetch_team_stats(&self, year: i32) -> SourceResult<NativeTeamStats> {
        let (batting, pitching) = futures_util::try_join!(
            self.stat_group("hitting", year),
            self.stat_group("pitching", year)
        )?;
        Ok(NativeTeamStats {
            provider: Provider::Secondary,
            batting,
            pitching,
        })
    }

    async fn fetch_standings(&self, year: i32) -> SourceResult<NativeStandings> {
        let url = format!(
            "{}/api/v1/standings?leagueId={LEAGUE_IDS}&season={year}\
             &standingsTypes=regularSeason&hydrate=team(division)",
            self.base
        );
        let response: StandingsResponse = self.http.get_json(&url).await?;
        if response.records.iter().all(|r| r.team_records.is_empty()) {
            return Err(SourceUnavailable::Empty {
                what: format!("{year} standings"),
            });
        }
        Ok(NativeStandings::Report(render_standings_report(&response)))
    }

    async fn fetch_schedule(&self, year: i32, team: &Team) -> SourceResult<NativeSchedule> {
        let team_id = self.fetch_team_id(team, year).await?;
        let url = format!(
            "{}/api/v1/schedule?sportId=1&teamId={team_id}&season={year}&gameType=R&hydrate=gameInfo",
            self.base
        );
        let response: ScheduleResponse = self.http.get_json(&url).await?;
        let games: Vec<_> = response.dates.into_iter().flat_map(|d| d.games).collect();
        debug!("{url}: {} games", games.len());
        if games.is_empty() {
            return Err(SourceUnavailable::Empty {
                what: format!("{year} schedule for {}", team.abbreviation),
            });
        }
        Ok(NativeSchedule::Api { team_id, games })
    }
}

// ---------------------------------------------------------------------------
// Standings report
// ---------------------------------------------------------------------------

fn division_name(record: &DivisionRecord) -> String {
    let hydrated = record
        .division
        .as_ref()
        .and_then(|d| d.name.clone())
        .or_else(|| {
            record
                .team_records
                .iter()
                .find_map(|t| t.team.division.as_ref().and_then(|d| d.name.clone()))
        });
    if let Some(name) = hydrated {
        return name;
    }
    let id = record.division.as_ref().map(|d| d.id).unwrap_or_default();
    match id {
        200 => "American League West",
        201 => "American League East",
        202 => "American League Central",
        203 => "National League West",
        204 => "National League East",
        205 => "National League Central",
        _ => "Unknown Division",
    }
    .to_owned()
}

fn or_dash(value: Option<&str>) -> &str {
    value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or("-")
}

/// One block per division: name line, column header, then one line per team.
/// Missing values print as `-`.
pub(crate) fn render_standings_report(response: &StandingsResponse) -> String {
    let mut report = String::new();
    for record in &response.records {
        let _ = writeln!(report, "{}", division_name(record));
        let _ = writeln!(
            report,
            "{:^4} {:<21} {:^3} {:^3} {:^6} {:^4} {:^7} {:^5} {:^4}",
            "Rank", "Team", "W", "L", "GB", "(E#)", "WC Rank", "WC GB", "(E#)"
        );
        for (i, team) in record.team_records.iter().enumerate() {
            let rank = team
                .division_rank
                .clone()
                .unwrap_or_else(|| (i + 1).to_string());
            let _ = writeln!(
                report,
                "{:^4} {:<21} {:^3} {:^3} {:^6} {:^4} {:^7} {:^5} {:^4}",
                rank,
                team.team.name,
                team.wins,
                team.losses,
                or_dash(Some(&team.games_back)),
                or_dash(team.elimination_number.as_deref()),
                or_dash(team.wild_card_rank.as_deref()),
                or_dash(team.wild_card_games_back.as_deref()),
                or_dash(team.wild_card_elimination_number.as_deref()),
            );
        }
        report.push('\n');
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TEAMS_BODY: &str = r#"{"teams":[
        {"id":112,"name":"Chicago Cubs","abbreviation":"CHC"},
        {"id":118,"name":"Kansas City Royals","abbreviation":"KC"}]}"#;

    fn source_for(server: &mockito::ServerGuard) -> SecondarySource {
        SecondarySource::new(&SourceConfig::single_host(&server.url()))
    }

    fn team(abbr: &str) -> Team {
        crate::TeamDirectory::mlb()
            .by_abbreviation(abbr)
            .cloned()
            .unwrap()
    }

    #[test]
    fn report_lists_every_team_under_its_division() {
        let response: StandingsResponse = serde_json::from_str(
            r#"{"records":[{"division":{"id":201},"teamRecords":[
                {"team":{"id":147,"name":"New York Yankees"},"wins":94,"losses":68,
                 "gamesBack":"-","divisionRank":"1","wildCardRank":"1",
                 "wildCardGamesBack":"+2.0","eliminationNumber":"-"},
                {"team":{"id":110,"name":"Baltimore Orioles"},"wins":91,"losses":71,
                 "gamesBack":"3.0","divisionRank":"2","eliminationNumber":"E"}]}]}"#,
        )
        .unwrap();
        let report = render_standings_report(&response);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "American League East");
        assert!(lines[1].starts_with("Rank"));
        let yankees: Vec<&str> = lines[2].split_whitespace().collect();
        assert_eq!(
            yankees,
            ["1", "New", "York", "Yankees", "94", "68", "-", "-", "1", "+2.0", "-"]
        );
        let orioles: Vec<&str> = lines[3].split_whitespace().collect();
        assert_eq!(orioles[5..], ["3.0", "E", "-", "-", "-"]);
    }

    #[tokio::test]
    async fn team_id_matches_provider_abbreviation_alias() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v1/teams")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(TEAMS_BODY)
            .create_async()
            .await;

        let source = source_for(&server);
        assert_eq!(source.fetch_team_id(&team("KCR"), 2024).await.unwrap(), 118);
        let err = source.fetch_team_id(&team("NYY"), 2024).await.unwrap_err();
        assert!(matches!(err, SourceUnavailable::UnknownTeam { .. }), "{err}");
    }

    #[tokio::test]
    async fn team_stats_read_string_and_number_values() {
        let mut server = mockito::Server::new_async().await;
        let _hit = server
            .mock("GET", "/api/v1/teams/stats")
            .match_query(Matcher::UrlEncoded("group".into(), "hitting".into()))
            .with_status(200)
            .with_body(
                r#"{"stats":[{"splits":[{"team":{"id":112,"name":"Chicago Cubs"},
                    "stat":{"runs":700,"avg":".251","homeRuns":180}}]}]}"#,
            )
            .create_async()
            .await;
        let _pit = server
            .mock("GET", "/api/v1/teams/stats")
            .match_query(Matcher::UrlEncoded("group".into(), "pitching".into()))
            .with_status(200)
            .with_body(
                r#"{"stats":[{"splits":[{"team":{"id":112,"name":"Chicago Cubs"},
                    "stat":{"runs":650,"era":"3.91","inningsPitched":"1445.2"}}]}]}"#,
            )
            .create_async()
            .await;

        let stats = source_for(&server).fetch_team_stats(2024).await.unwrap();
        assert_eq!(stats.provider, Provider::Secondary);
        assert_eq!(stats.batting[0].team_key, "Chicago Cubs");
        assert!(stats.batting[0].columns.contains(&("avg".to_string(), 0.251)));
        assert!(stats.pitching[0].columns.contains(&("era".to_string(), 3.91)));
    }

    #[tokio::test]
    async fn empty_standings_are_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/v1/standings")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"records":[]}"#)
            .create_async()
            .await;

        let err = source_for(&server).fetch_standings(1850).await.unwrap_err();
        assert!(matches!(err, SourceUnavailable::Empty { .. }), "{err}");
    }

    #[tokio::test]
    async fn schedule_resolves_team_id_first() {
        let mut server = mockito::Server::new_async().await;
        let _teams = server
            .mock("GET", "/api/v1/teams")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(TEAMS_BODY)
            .create_async()
            .await;
        let schedule = server
            .mock("GET", "/api/v1/schedule")
            .match_query(Matcher::UrlEncoded("teamId".into(), "112".into()))
            .with_status(200)
            .with_body(
                r#"{"dates":[{"date":"2024-03-28","games":[{"gamePk":1,
                    "officialDate":"2024-03-28",
                    "status":{"abstractGameState":"Final","detailedState":"Final"},
                    "teams":{"away":{"team":{"id":112,"name":"Chicago Cubs"},"score":5,"isWinner":true},
                             "home":{"team":{"id":133,"name":"Oakland Athletics"},"score":0,"isWinner":false}}}]}]}"#,
            )
            .create_async()
            .await;

        let native = source_for(&server)
            .fetch_schedule(2024, &team("CHC"))
            .await
            .unwrap();
        schedule.assert_async().await;
        match native {
            NativeSchedule::Api { team_id, games } => {
                assert_eq!(team_id, 112);
                assert_eq!(games.len(), 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
