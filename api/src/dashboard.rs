use crate::branding::{BrandingClient, Palette};
use crate::config::SourceConfig;
use crate::dates::resolve_schedule_dates;
use crate::error::{AssetUnavailable, DataUnavailable, WindowError};
use crate::failover::{Failover, FetchResult, Fetched};
use crate::primary::PrimarySource;
use crate::secondary::SecondarySource;
use crate::source::StatsSource;
use crate::teams::{Team, TeamDirectory};
use crate::window::{last_seven_days, season_trend, win_pct_delta, TrendPoint, WeekSummary};
use crate::{Elimination, ScheduleEntry, StandingsRecord, Streak, TeamStatRecord};
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

/// Every panel is fetched on its own and fails on its own.
pub struct DashboardLoader {
    failover: Failover,
    secondary: Arc<SecondarySource>,
    branding: BrandingClient,
    directory: Arc<TeamDirectory>,
}

impl DashboardLoader {
    pub fn new(config: &SourceConfig, directory: Arc<TeamDirectory>) -> Self {
        let primary: Arc<dyn StatsSource> = Arc::new(PrimarySource::new(config));
        let secondary = Arc::new(SecondarySource::new(config));
        Self {
            failover: Failover::new(primary, secondary.clone(), directory.clone()),
            secondary,
            branding: BrandingClient::new(config),
            directory,
        }
    }

    pub fn directory(&self) -> &TeamDirectory {
        &self.directory
    }

    /// Team stats, standings, schedule and logo are fetched concurrently;
    /// none of them waits on another.
    pub async fn load(&self, team: &Team, season: i32, today: NaiveDate) -> Dashboard {
        info!("loading {} {season}", team.name);
        let (team_stats, standings, schedule, branding) = futures_util::join!(
            self.failover.team_stats(season),
            self.failover.standings(season),
            self.failover.schedule(season, team),
            self.palette(team, season),
        );

        Dashboard {
            team: team.clone(),
            season,
            today,
            team_stats,
            standings,
            schedule: schedule.map(|fetched| SchedulePanel::build(fetched, season, today)),
            branding,
        }
    }

    async fn palette(&self, team: &Team, season: i32) -> Result<Palette, AssetUnavailable> {
        let team_id = self
            .secondary
            .fetch_team_id(team, season)
            .await
            .map_err(|e| {
                warn!("no team id for logo: {e}");
                AssetUnavailable::UnknownTeam(team.name.clone())
            })?;
        self.branding.fetch_palette(team_id).await.inspect_err(|e| {
            warn!("{e}; using neutral colors");
        })
    }
}

/// Dated schedule plus what the rolling window made of it.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulePanel {
    pub games: Fetched<Vec<ScheduleEntry>>,
    pub week: Result<WeekSummary, WindowError>,
    pub trend: Vec<TrendPoint>,
}

impl SchedulePanel {
    pub fn build(mut games: Fetched<Vec<ScheduleEntry>>, season: i32, today: NaiveDate) -> Self {
        let unresolved = resolve_schedule_dates(&mut games.value, season, today);
        games.degraded.extend(unresolved);
        let week = last_seven_days(&games.value, season, today);
        let trend = season_trend(&games.value, today);
        Self { games, week, trend }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    pub team: Team,
    pub season: i32,
    pub today: NaiveDate,
    pub team_stats: FetchResult<Vec<TeamStatRecord>>,
    pub standings: FetchResult<Vec<StandingsRecord>>,
    pub schedule: Result<SchedulePanel, DataUnavailable>,
    pub branding: Result<Palette, AssetUnavailable>,
}

impl Dashboard {
    pub fn team_record(&self) -> Option<&TeamStatRecord> {
        self.team_stats
            .as_ref()
            .ok()?
            .value
            .iter()
            .find(|r| r.abbreviation == self.team.abbreviation)
    }

    pub fn team_standing(&self) -> Option<&StandingsRecord> {
        self.standings
            .as_ref()
            .ok()?
            .value
            .iter()
            .find(|r| self.team.matches(&r.team))
    }

    /// The selected team's division, in rank order.
    pub fn division(&self) -> Vec<&StandingsRecord> {
        let (Some(standing), Ok(all)) = (self.team_standing(), self.standings.as_ref()) else {
            return Vec::new();
        };
        let mut rows: Vec<&StandingsRecord> = all
            .value
            .iter()
            .filter(|r| r.division == standing.division)
            .collect();
        rows.sort_by_key(|r| r.rank);
        rows
    }

    pub fn week(&self) -> Option<&WeekSummary> {
        self.schedule.as_ref().ok()?.week.as_ref().ok()
    }

    pub fn palette(&self) -> Palette {
        self.branding.as_ref().ok().cloned().unwrap_or_default()
    }

    pub fn metrics(&self) -> TeamMetrics {
        let standing = self.team_standing();
        let record = self.team_record();
        let week = self.week();
        let stat = |f: fn(&TeamStatRecord) -> Option<f64>| record.and_then(f);

        TeamMetrics {
            wins: standing.map(|s| s.wins),
            losses: standing.map(|s| s.losses),
            week_wins: week.map(|w| w.wins),
            week_losses: week.map(|w| w.losses),
            win_pct: standing.map(|s| s.win_pct),
            win_pct_delta: standing
                .zip(week)
                .and_then(|(s, w)| win_pct_delta(s, w).ok()),
            streak: week.and_then(|w| w.streak),
            games_behind: standing.map(|s| s.games_behind),
            elimination: standing.and_then(|s| s.elimination),
            run_differential: record.and_then(TeamStatRecord::run_differential),
            war: stat(|r| r.war),
            slash_line: [stat(|r| r.average), stat(|r| r.on_base), stat(|r| r.slugging)],
            pitching_line: [stat(|r| r.era), stat(|r| r.fip), stat(|r| r.whip)],
        }
    }
}

/// The headline numbers for the selected team. `None` where the backing
/// panel is unavailable or the provider did not report the metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamMetrics {
    pub wins: Option<u16>,
    pub losses: Option<u16>,
    pub week_wins: Option<u16>,
    pub week_losses: Option<u16>,
    pub win_pct: Option<f64>,
    /// Omitted when the team had no decided games a week ago.
    pub win_pct_delta: Option<f64>,
    pub streak: Option<Streak>,
    pub games_behind: Option<f64>,
    pub elimination: Option<Elimination>,
    pub run_differential: Option<f64>,
    pub war: Option<f64>,
    /// AVG / OBP / SLG
    pub slash_line: [Option<f64>; 3],
    /// ERA / FIP / WHIP
    pub pitching_line: [Option<f64>; 3],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatField;
    use mockito::Matcher;

    const SCHEDULE_PAGE: &str = r#"<table id="team_schedule"><tbody>
        <tr><th data-stat="team_game">1</th><td data-stat="date_game">Monday, Jun 8</td>
            <td data-stat="opp_ID">STL</td><td data-stat="win_loss_result">W</td>
            <td data-stat="R">5</td><td data-stat="RA">2</td><td data-stat="win_loss_streak">+</td></tr>
        <tr><th data-stat="team_game">2</th><td data-stat="date_game">Tuesday, Jun 9</td>
            <td data-stat="opp_ID">STL</td><td data-stat="win_loss_result">W</td>
            <td data-stat="R">3</td><td data-stat="RA">1</td><td data-stat="win_loss_streak">++</td></tr>
        <tr><th data-stat="team_game">3</th><td data-stat="date_game">Wednesday, Jun 10 (1)</td>
            <td data-stat="homeORvis">@</td><td data-stat="opp_ID">MIL</td>
            <td data-stat="win_loss_result">L</td><td data-stat="R">0</td><td data-stat="RA">4</td>
            <td data-stat="win_loss_streak">-</td></tr>
        <tr><th data-stat="team_game">4</th><td data-stat="date_game">Thursday, Jun 11</td>
            <td data-stat="homeORvis">@</td><td data-stat="opp_ID">MIL</td></tr>
        </tbody></table>"#;

    const STANDINGS_BODY: &str = r#"{"records":[{"division":{"id":205},"teamRecords":[
        {"team":{"id":112,"name":"Chicago Cubs"},"wins":40,"losses":25,"gamesBack":"-",
         "divisionRank":"1","eliminationNumber":"88"},
        {"team":{"id":158,"name":"Milwaukee Brewers"},"wins":37,"losses":28,"gamesBack":"3.0",
         "divisionRank":"2","eliminationNumber":"91"}]}]}"#;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn panels_fail_over_and_degrade_independently() {
        let mut server = mockito::Server::new_async().await;
        // primary stats and standings are down; primary schedule is up
        let _fg = server
            .mock("GET", "/api/leaders/major-league/data")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;
        let _bref_standings = server
            .mock("GET", "/leagues/majors/2026-standings.shtml")
            .with_status(404)
            .create_async()
            .await;
        let _bref_schedule = server
            .mock("GET", "/teams/CHC/2026-schedule-scores.shtml")
            .with_status(200)
            .with_body(SCHEDULE_PAGE)
            .create_async()
            .await;
        let _hitting = server
            .mock("GET", "/api/v1/teams/stats")
            .match_query(Matcher::UrlEncoded("group".into(), "hitting".into()))
            .with_status(200)
            .with_body(
                r#"{"stats":[{"splits":[{"team":{"id":112,"name":"Chicago Cubs"},
                    "stat":{"runs":310,"avg":".262","obp":".330","slg":".431"}}]}]}"#,
            )
            .create_async()
            .await;
        let _pitching = server
            .mock("GET", "/api/v1/teams/stats")
            .match_query(Matcher::UrlEncoded("group".into(), "pitching".into()))
            .with_status(200)
            .with_body(
                r#"{"stats":[{"splits":[{"team":{"id":112,"name":"Chicago Cubs"},
                    "stat":{"runs":250,"era":"3.48","whip":"1.17"}}]}]}"#,
            )
            .create_async()
            .await;
        let _standings = server
            .mock("GET", "/api/v1/standings")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(STANDINGS_BODY)
            .create_async()
            .await;
        let _teams = server
            .mock("GET", "/api/v1/teams")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"teams":[{"id":112,"name":"Chicago Cubs","abbreviation":"CHC"}]}"#)
            .create_async()
            .await;
        let _logo = server
            .mock("GET", "/team-logos/team-cap-on-light/112.svg")
            .with_status(404)
            .create_async()
            .await;

        let directory = Arc::new(TeamDirectory::mlb());
        let loader = DashboardLoader::new(&SourceConfig::single_host(&server.url()), directory);
        let team = loader.directory().by_abbreviation("CHC").cloned().unwrap();
        let dash = loader.load(&team, 2026, ymd(2026, 6, 10)).await;

        assert_eq!(dash.team_stats.as_ref().unwrap().served_by, "statsapi");
        assert_eq!(dash.standings.as_ref().unwrap().served_by, "statsapi");
        let schedule = dash.schedule.as_ref().unwrap();
        assert_eq!(schedule.games.served_by, "fangraphs/baseball-reference");
        assert_eq!(schedule.games.value[0].date, Some(ymd(2026, 6, 8)));
        assert!(matches!(dash.branding, Err(AssetUnavailable::Status { status: 404, .. })));
        assert_eq!(dash.palette(), Palette::neutral());

        let m = dash.metrics();
        assert_eq!((m.wins, m.losses), (Some(40), Some(25)));
        assert_eq!((m.week_wins, m.week_losses), (Some(2), Some(1)));
        assert_eq!(m.streak, Some(Streak(-1)));
        assert_eq!(m.games_behind, Some(0.0));
        assert_eq!(m.elimination, Some(Elimination::Number(88)));
        assert_eq!(m.run_differential, Some(60.0));
        assert_eq!(m.slash_line, [Some(0.262), Some(0.33), Some(0.431)]);
        assert_eq!(m.pitching_line, [Some(3.48), None, Some(1.17)]);
        let delta = m.win_pct_delta.unwrap();
        assert!((delta - (40.0 / 65.0 - 38.0 / 62.0)).abs() < 1e-9);
        assert_eq!(dash.division().len(), 2);
    }

    #[test]
    fn missing_panels_leave_metrics_empty() {
        let team = TeamDirectory::mlb().by_abbreviation("CHC").cloned().unwrap();
        let down = || DataUnavailable {
            query: crate::Query::Standings { year: 2026 },
            primary: crate::SourceUnavailable::Empty { what: "a".into() },
            secondary: crate::SourceUnavailable::Empty { what: "b".into() },
        };
        let mut record = TeamStatRecord::new("Chicago Cubs", "CHC");
        record.set(StatField::War, 21.5);
        let dash = Dashboard {
            team,
            season: 2026,
            today: ymd(2026, 6, 10),
            team_stats: Ok(Fetched {
                value: vec![record],
                served_by: "test",
                degraded: vec![],
                report: Default::default(),
            }),
            standings: Err(down()),
            schedule: Err(down()),
            branding: Err(AssetUnavailable::UnknownTeam("Chicago Cubs".into())),
        };
        let m = dash.metrics();
        assert_eq!(m.war, Some(21.5));
        assert_eq!(m.wins, None);
        assert_eq!(m.win_pct_delta, None);
        assert!(dash.division().is_empty());
        assert_eq!(dash.palette(), Palette::neutral());
    }

    #[test]
    fn degenerate_week_omits_delta() {
        let team = TeamDirectory::mlb().by_abbreviation("CHC").cloned().unwrap();
        let games = Fetched {
            value: vec![ScheduleEntry {
                game_number: 1,
                raw_date: "Wednesday, Apr 1".into(),
                result: Some("W".into()),
                streak: Some(Streak(1)),
                ..ScheduleEntry::default()
            }],
            served_by: "test",
            degraded: vec![],
            report: Default::default(),
        };
        let standing = StandingsRecord {
            team: "Chicago Cubs".into(),
            wins: 1,
            losses: 0,
            win_pct: 1.0,
            ..StandingsRecord::default()
        };
        let dash = Dashboard {
            team,
            season: 2026,
            today: ymd(2026, 4, 2),
            team_stats: Ok(Fetched {
                value: vec![],
                served_by: "test",
                degraded: vec![],
                report: Default::default(),
            }),
            standings: Ok(Fetched {
                value: vec![standing],
                served_by: "test",
                degraded: vec![],
                report: Default::default(),
            }),
            schedule: Ok(SchedulePanel::build(games, 2026, ymd(2026, 4, 2))),
            branding: Ok(Palette::neutral()),
        };
        let m = dash.metrics();
        assert_eq!(m.week_wins, Some(1));
        assert_eq!(m.win_pct_delta, None);
        assert_eq!(m.streak, Some(Streak(1)));
    }
}
