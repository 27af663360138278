use crate::error::{DegradedKind, ParseDegraded};
use crate::source::{
    DivisionTable, NativeRow, NativeSchedule, NativeStandings, NativeTeamStats, Provider,
    ScrapedGame,
};
use crate::teams::TeamDirectory;
use crate::wire::ScheduleGame;
use crate::{
    win_percentage, Elimination, GameResult, ScheduleEntry, StandingsRecord, StatField, Streak,
    TeamStatRecord,
};
use chrono::NaiveDate;
use log::{debug, warn};
use regex::Regex;
use std::sync::LazyLock;

/// Canonical output plus everything that did not make it in cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub value: T,
    pub degraded: Vec<ParseDegraded>,
    pub report: MergeReport,
}

impl<T> Normalized<T> {
    fn new(value: T, degraded: Vec<ParseDegraded>) -> Self {
        Self {
            value,
            degraded,
            report: MergeReport::default(),
        }
    }
}

/// Columns the stat merge left out, by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Columns that landed on an identity already taken by an earlier column.
    pub duplicates: Vec<String>,
    /// Native columns with no canonical identity.
    pub unknown: Vec<String>,
}

impl MergeReport {
    fn note(list: &mut Vec<String>, name: &str) {
        if !list.iter().any(|n| n == name) {
            list.push(name.to_owned());
        }
    }
}

// ---------------------------------------------------------------------------
// Team stats: rename + merge
// ---------------------------------------------------------------------------

/// Native column name → canonical field. With `passthrough`, names that are
/// already canonical map to themselves.
struct RenameTable {
    renames: &'static [(&'static str, StatField)],
    passthrough: bool,
}

impl RenameTable {
    fn field(&self, native: &str) -> Option<StatField> {
        self.renames
            .iter()
            .find(|(name, _)| *name == native)
            .map(|(_, field)| *field)
            .or_else(|| {
                self.passthrough
                    .then(|| StatField::from_column(native))
                    .flatten()
            })
    }
}

const PRIMARY_BATTING: RenameTable = RenameTable {
    renames: &[],
    passthrough: true,
};

/// Pitching `R` is runs allowed; left alone it would collide with batting `R`.
const PRIMARY_PITCHING: RenameTable = RenameTable {
    renames: &[("R", StatField::RunsAllowed)],
    passthrough: true,
};

const SECONDARY_BATTING: RenameTable = RenameTable {
    renames: &[
        ("gamesPlayed", StatField::Games),
        ("plateAppearances", StatField::PlateAppearances),
        ("atBats", StatField::AtBats),
        ("hits", StatField::Hits),
        ("doubles", StatField::Doubles),
        ("triples", StatField::Triples),
        ("homeRuns", StatField::HomeRuns),
        ("runs", StatField::Runs),
        ("rbi", StatField::RunsBattedIn),
        ("baseOnBalls", StatField::Walks),
        ("strikeOuts", StatField::Strikeouts),
        ("stolenBases", StatField::StolenBases),
        ("avg", StatField::Average),
        ("obp", StatField::OnBase),
        ("slg", StatField::Slugging),
        ("ops", StatField::Ops),
    ],
    passthrough: false,
};

const SECONDARY_PITCHING: RenameTable = RenameTable {
    renames: &[
        ("gamesPlayed", StatField::Games),
        ("hits", StatField::Hits),
        ("homeRuns", StatField::HomeRuns),
        ("baseOnBalls", StatField::Walks),
        ("strikeOuts", StatField::Strikeouts),
        ("runs", StatField::RunsAllowed),
        ("earnedRuns", StatField::EarnedRuns),
        ("inningsPitched", StatField::InningsPitched),
        ("era", StatField::Era),
        ("whip", StatField::Whip),
        ("wins", StatField::PitchingWins),
        ("losses", StatField::PitchingLosses),
        ("saves", StatField::Saves),
        ("strikeoutsPer9Inn", StatField::StrikeoutsPerNine),
        ("walksPer9Inn", StatField::WalksPerNine),
    ],
    passthrough: false,
};

fn rename_tables(provider: Provider) -> (&'static RenameTable, &'static RenameTable) {
    match provider {
        Provider::Primary => (&PRIMARY_BATTING, &PRIMARY_PITCHING),
        Provider::Secondary => (&SECONDARY_BATTING, &SECONDARY_PITCHING),
    }
}

/// Native names → canonical identities. Unknown names go to the report.
fn rename(
    columns: &[(String, f64)],
    table: &RenameTable,
    report: &mut MergeReport,
) -> Vec<(StatField, f64)> {
    columns
        .iter()
        .filter_map(|(name, value)| match table.field(name) {
            Some(field) => Some((field, *value)),
            None => {
                MergeReport::note(&mut report.unknown, name);
                None
            }
        })
        .collect()
}

/// Batting first, then pitching; the first value for each identity wins.
fn merge(
    batting: Vec<(StatField, f64)>,
    pitching: Vec<(StatField, f64)>,
    report: &mut MergeReport,
) -> Vec<(StatField, f64)> {
    let mut merged: Vec<(StatField, f64)> = Vec::with_capacity(batting.len() + pitching.len());
    for (field, value) in batting.into_iter().chain(pitching) {
        if merged.iter().any(|(f, _)| *f == field) {
            MergeReport::note(&mut report.duplicates, field.column());
            continue;
        }
        merged.push((field, value));
    }
    merged
}

/// Each side goes through its provider's rename table, then batting and
/// pitching merge with the first value for an identity winning.
pub fn normalize_team_stats(
    native: &NativeTeamStats,
    directory: &TeamDirectory,
) -> Normalized<Vec<TeamStatRecord>> {
    let (batting_table, pitching_table) = rename_tables(native.provider);
    let mut report = MergeReport::default();
    let mut degraded = Vec::new();

    // Resolve both sides to canonical clubs, batting order first.
    let mut keyed: Vec<(String, Option<&NativeRow>, Option<&NativeRow>)> = Vec::new();
    for (row, is_batting) in native
        .batting
        .iter()
        .map(|r| (r, true))
        .chain(native.pitching.iter().map(|r| (r, false)))
    {
        let Some(team) = directory.resolve(&row.team_key) else {
            debug!("stat row for unknown club {:?} skipped", row.team_key);
            degraded.push(ParseDegraded::new(DegradedKind::StatRow, row.team_key.as_str()));
            continue;
        };
        let index = match keyed.iter().position(|(abbr, _, _)| *abbr == team.abbreviation) {
            Some(index) => index,
            None => {
                keyed.push((team.abbreviation.clone(), None, None));
                keyed.len() - 1
            }
        };
        let slot = &mut keyed[index];
        let side = if is_batting { &mut slot.1 } else { &mut slot.2 };
        if side.is_none() {
            *side = Some(row);
        }
    }

    let mut records = Vec::with_capacity(keyed.len());
    for (abbr, batting, pitching) in keyed {
        let Some(team) = directory.by_abbreviation(&abbr) else {
            continue;
        };
        let batting = batting
            .map(|r| rename(&r.columns, batting_table, &mut report))
            .unwrap_or_default();
        let pitching = pitching
            .map(|r| rename(&r.columns, pitching_table, &mut report))
            .unwrap_or_default();

        let mut record = TeamStatRecord::new(team.name.as_str(), team.abbreviation.as_str());
        for (field, value) in merge(batting, pitching, &mut report) {
            record.set(field, value);
        }
        records.push(record);
    }

    if !report.unknown.is_empty() {
        debug!("unmapped {} columns dropped: {:?}", native.provider.label(), report.unknown);
    }
    if !report.duplicates.is_empty() {
        debug!("duplicate columns dropped after merge: {:?}", report.duplicates);
    }

    Normalized {
        value: records,
        degraded,
        report,
    }
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

static DIVISION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(American|National) League (East|West|Central)").expect("division pattern")
});

/// rank, team, W, L, GB, E#, WC rank, WC GB, WC E#
static TEAM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+)\s+([\w\s.]+?)\s+(\d+)\s+(\d+)\s+([-\d.]+)\s+([-\dE☠]+)\s+(-|\d+)\s+([-+\d.]+)\s+([-\dE☠]+)$",
    )
    .expect("team line pattern")
});

static DIVISION_CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(AL|NL|American League|National League)\s+(East|Central|West)\b")
        .expect("caption pattern")
});

/// Page order of the scraped division tables when they carry no caption.
const DIVISION_ORDER: [&str; 6] = [
    "American League East",
    "American League Central",
    "American League West",
    "National League East",
    "National League Central",
    "National League West",
];

const UNKNOWN_DIVISION: &str = "Unknown Division";

/// `-`/`--` mean level with the leader. A leading `+` means ahead of the line.
fn games_behind(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.is_empty() || token.chars().all(|c| c == '-') {
        return Some(0.0);
    }
    match token.strip_prefix('+') {
        Some(ahead) => ahead.parse::<f64>().ok().map(|v| -v),
        None => token.parse::<f64>().ok(),
    }
}

fn canonical_name(name: &str, directory: &TeamDirectory) -> String {
    directory
        .resolve(name)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| name.trim().to_owned())
}

pub fn normalize_standings(
    native: &NativeStandings,
    directory: &TeamDirectory,
) -> Normalized<Vec<StandingsRecord>> {
    let (records, degraded) = match native {
        NativeStandings::Report(text) => parse_standings_report(text, directory),
        NativeStandings::Tables(tables) => standings_from_tables(tables, directory),
    };
    Normalized::new(records, degraded)
}

/// Line grammar over the text report. Division headers set the context for
/// the team lines below them; other boilerplate is ignored. A digit-led line
/// that still fails the grammar is reported as degraded.
pub fn parse_standings_report(
    text: &str,
    directory: &TeamDirectory,
) -> (Vec<StandingsRecord>, Vec<ParseDegraded>) {
    let mut division: Option<String> = None;
    let mut records = Vec::new();
    let mut degraded = Vec::new();

    for line in text.lines().map(str::trim) {
        if let Some(caps) = DIVISION_LINE.captures(line) {
            division = Some(format!("{} League {}", &caps[1], &caps[2]));
            continue;
        }
        let Some(caps) = TEAM_LINE.captures(line) else {
            if line.starts_with(|c: char| c.is_ascii_digit()) {
                debug!("unmatched standings line: {line:?}");
                degraded.push(ParseDegraded::new(DegradedKind::StandingsLine, line));
            }
            continue;
        };

        let parsed = (|| {
            let wins = caps[3].parse::<u16>().ok()?;
            let losses = caps[4].parse::<u16>().ok()?;
            Some(StandingsRecord {
                team: canonical_name(&caps[2], directory),
                division: division.clone().unwrap_or_else(|| UNKNOWN_DIVISION.to_owned()),
                rank: caps[1].parse::<u8>().ok()?,
                wins,
                losses,
                win_pct: win_percentage(wins, losses),
                games_behind: games_behind(&caps[5])?,
                wildcard_rank: caps[7].parse::<u8>().ok(),
                wildcard_games_behind: Some(games_behind(&caps[8])?),
                elimination: Elimination::parse(&caps[6]),
                wildcard_elimination: Elimination::parse(&caps[9]),
            })
        })();

        match parsed {
            Some(record) => records.push(record),
            None => degraded.push(ParseDegraded::new(DegradedKind::StandingsLine, line)),
        }
    }
    (records, degraded)
}

fn division_for_table(table: &DivisionTable, position: usize) -> String {
    table
        .caption
        .as_deref()
        .and_then(|c| DIVISION_CAPTION.captures(c))
        .map(|caps| {
            let league = if caps[1].starts_with('A') {
                "American"
            } else {
                "National"
            };
            format!("{league} League {}", &caps[2])
        })
        .or_else(|| DIVISION_ORDER.get(position).map(|d| (*d).to_owned()))
        .unwrap_or_else(|| UNKNOWN_DIVISION.to_owned())
}

fn standings_from_tables(
    tables: &[DivisionTable],
    directory: &TeamDirectory,
) -> (Vec<StandingsRecord>, Vec<ParseDegraded>) {
    let mut records = Vec::new();
    let mut degraded = Vec::new();

    for (position, table) in tables.iter().enumerate() {
        let division = division_for_table(table, position);
        let mut rank: u8 = 0;
        for row in &table.rows {
            let cell = |key: &str| {
                row.iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.trim())
            };
            let parsed = (|| {
                let team = cell("Tm").filter(|t| !t.is_empty())?;
                let wins = cell("W")?.parse::<u16>().ok()?;
                let losses = cell("L")?.parse::<u16>().ok()?;
                Some((team, wins, losses, games_behind(cell("GB").unwrap_or("-"))?))
            })();
            let Some((team, wins, losses, gb)) = parsed else {
                let text: Vec<&str> = row.iter().map(|(_, v)| v.as_str()).collect();
                degraded.push(ParseDegraded::new(DegradedKind::StandingsRow, text.join(" ")));
                continue;
            };
            rank = rank.saturating_add(1);
            records.push(StandingsRecord {
                team: canonical_name(team, directory),
                division: division.clone(),
                rank,
                wins,
                losses,
                win_pct: win_percentage(wins, losses),
                games_behind: gb,
                wildcard_rank: None,
                wildcard_games_behind: None,
                elimination: cell("E#").and_then(Elimination::parse),
                wildcard_elimination: None,
            });
        }
    }
    (records, degraded)
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

pub fn normalize_schedule(
    native: &NativeSchedule,
    directory: &TeamDirectory,
) -> Normalized<Vec<ScheduleEntry>> {
    let (entries, degraded) = match native {
        NativeSchedule::Scraped(games) => schedule_from_rows(games, directory),
        NativeSchedule::Api { team_id, games } => {
            (schedule_from_games(*team_id, games, directory), Vec::new())
        }
    };
    if !degraded.is_empty() {
        warn!("{} schedule rows could not be read", degraded.len());
    }
    Normalized::new(entries, degraded)
}

fn opponent_code(key: &str, directory: &TeamDirectory) -> String {
    directory
        .resolve(key)
        .map(|t| t.abbreviation.clone())
        .unwrap_or_else(|| key.trim().to_owned())
}

fn schedule_from_rows(
    games: &[ScrapedGame],
    directory: &TeamDirectory,
) -> (Vec<ScheduleEntry>, Vec<ParseDegraded>) {
    let mut entries = Vec::with_capacity(games.len());
    let mut degraded = Vec::new();

    for (i, game) in games.iter().enumerate() {
        let Some(raw_date) = game.cell("date_game") else {
            let text: Vec<&str> = game.cells.iter().map(|(_, v)| v.as_str()).collect();
            degraded.push(ParseDegraded::new(DegradedKind::ScheduleRow, text.join(" ")));
            continue;
        };
        entries.push(ScheduleEntry {
            game_number: game
                .cell("team_game")
                .and_then(|n| n.parse().ok())
                .unwrap_or(u16::try_from(i + 1).unwrap_or(u16::MAX)),
            raw_date: raw_date.to_owned(),
            date: None,
            opponent: game
                .cell("opp_ID")
                .map(|o| opponent_code(o, directory))
                .unwrap_or_default(),
            home: game.cell("homeORvis") != Some("@"),
            result: game.cell("win_loss_result").map(str::to_owned),
            runs_scored: game.cell("R").and_then(|v| v.parse().ok()),
            runs_allowed: game.cell("RA").and_then(|v| v.parse().ok()),
            record: game.cell("win_loss_record").map(str::to_owned),
            attendance: game
                .cell("attendance")
                .and_then(|v| v.replace(',', "").parse().ok()),
            streak: game.cell("win_loss_streak").and_then(Streak::parse),
        });
    }
    (entries, degraded)
}

fn is_called_off(game: &ScheduleGame) -> bool {
    let state = game.status.detailed_state.as_str();
    state.starts_with("Postponed") || state.starts_with("Cancelled")
}

fn api_result(game: &ScheduleGame, home: bool) -> Option<String> {
    if game.status.abstract_game_state != "Final" {
        return None;
    }
    let (ours, theirs) = if home {
        (&game.teams.home, &game.teams.away)
    } else {
        (&game.teams.away, &game.teams.home)
    };
    let indicator = match (ours.is_winner, theirs.is_winner, ours.score, theirs.score) {
        (Some(true), _, _, _) => "W",
        (_, Some(true), _, _) => "L",
        (_, _, Some(a), Some(b)) if a > b => "W",
        (_, _, Some(a), Some(b)) if a < b => "L",
        (_, _, Some(_), Some(_)) => "T",
        _ => return None,
    };
    Some(indicator.to_owned())
}

fn schedule_from_games(
    team_id: u32,
    games: &[ScheduleGame],
    directory: &TeamDirectory,
) -> Vec<ScheduleEntry> {
    let mut entries = Vec::with_capacity(games.len());

    for game in games.iter().filter(|g| !is_called_off(g)) {
        let home = game.teams.home.team.id == team_id;
        let (ours, theirs) = if home {
            (&game.teams.home, &game.teams.away)
        } else {
            (&game.teams.away, &game.teams.home)
        };
        let date = game
            .official_date
            .as_deref()
            .or_else(|| game.game_date.get(..10))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        let mut raw_date = date
            .map(|d| d.format("%A, %b %-d").to_string())
            .unwrap_or_else(|| game.game_date.clone());
        if matches!(game.double_header.as_deref(), Some("Y" | "S"))
            && let Some(n) = game.game_number
        {
            raw_date.push_str(&format!(" ({n})"));
        }

        let result = api_result(game, home);
        entries.push(ScheduleEntry {
            game_number: u16::try_from(entries.len() + 1).unwrap_or(u16::MAX),
            raw_date,
            date,
            opponent: opponent_code(&theirs.team.name, directory),
            home,
            runs_scored: result.as_ref().and(ours.score),
            runs_allowed: result.as_ref().and(theirs.score),
            record: result
                .as_ref()
                .and(ours.league_record.as_ref())
                .map(|r| format!("{}-{}", r.wins, r.losses)),
            attendance: game.game_info.as_ref().and_then(|i| i.attendance),
            result,
            streak: None,
        });
    }

    running_streaks(&mut entries);
    entries
}

/// Signed run length after each decided game. Ties leave the run untouched;
/// unplayed games carry no streak.
fn running_streaks(entries: &mut [ScheduleEntry]) {
    let mut run: i16 = 0;
    for entry in entries.iter_mut() {
        match entry.outcome() {
            None => continue,
            Some(GameResult::Win) => run = if run > 0 { run.saturating_add(1) } else { 1 },
            Some(GameResult::Loss) => run = if run < 0 { run.saturating_sub(1) } else { -1 },
            Some(GameResult::Other) => {}
        }
        entry.streak = (run != 0).then_some(Streak(run));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::{GameSide, GameStatus, GameTeams, LeagueRecord, TeamRef};

    fn row(team: &str, cols: &[(&str, f64)]) -> NativeRow {
        NativeRow {
            team_key: team.to_owned(),
            columns: cols.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
        }
    }

    #[test]
    fn pitching_runs_become_runs_allowed() {
        let native = NativeTeamStats {
            provider: Provider::Primary,
            batting: vec![row("CHC", &[("R", 700.0), ("HR", 180.0), ("WAR", 30.1)])],
            pitching: vec![row("CHC", &[("R", 650.0), ("ERA", 3.9), ("WAR", 15.2)])],
        };
        let out = normalize_team_stats(&native, &TeamDirectory::mlb());
        let rec = &out.value[0];
        assert_eq!(rec.team, "Chicago Cubs");
        assert_eq!(rec.runs, Some(700.0));
        assert_eq!(rec.runs_allowed, Some(650.0));
        assert_eq!(rec.war, Some(30.1));
        assert_eq!(rec.era, Some(3.9));
        assert_eq!(out.report.duplicates, vec!["WAR".to_string()]);
    }

    #[test]
    fn merged_record_has_unique_columns() {
        let native = NativeTeamStats {
            provider: Provider::Secondary,
            batting: vec![row(
                "Chicago Cubs",
                &[("runs", 700.0), ("hits", 1300.0), ("homeRuns", 180.0), ("avg", 0.251)],
            )],
            pitching: vec![row(
                "Chicago Cubs",
                &[("runs", 650.0), ("hits", 1250.0), ("era", 3.91), ("balks", 3.0)],
            )],
        };
        let out = normalize_team_stats(&native, &TeamDirectory::mlb());
        let rec = &out.value[0];
        assert_eq!(rec.hits, Some(1300.0));
        assert_eq!(rec.runs, Some(700.0));
        assert_eq!(rec.runs_allowed, Some(650.0));
        assert_eq!(out.report.duplicates, vec!["H".to_string()]);
        assert_eq!(out.report.unknown, vec!["balks".to_string()]);

        let mut names: Vec<String> = rec.columns().into_iter().map(|(n, _)| n).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn canonical_input_normalizes_to_itself() {
        let mut rec = TeamStatRecord::new("New York Yankees", "NYY");
        rec.set(StatField::Runs, 815.0);
        rec.set(StatField::RunsAllowed, 668.0);
        rec.set(StatField::Fip, 3.8);
        rec.set(StatField::WrcPlus, 117.0);
        let native = NativeTeamStats {
            provider: Provider::Primary,
            batting: vec![NativeRow {
                team_key: "NYY".into(),
                columns: rec.columns(),
            }],
            pitching: vec![],
        };
        let out = normalize_team_stats(&native, &TeamDirectory::mlb());
        assert_eq!(out.value, vec![rec]);
        assert_eq!(out.report, MergeReport::default());
    }

    #[test]
    fn unknown_club_rows_are_degraded() {
        let native = NativeTeamStats {
            provider: Provider::Primary,
            batting: vec![row("Average", &[("R", 700.0)]), row("KC", &[("R", 650.0)])],
            pitching: vec![],
        };
        let out = normalize_team_stats(&native, &TeamDirectory::mlb());
        assert_eq!(out.value.len(), 1);
        assert_eq!(out.value[0].abbreviation, "KCR");
        assert_eq!(out.degraded[0].kind, DegradedKind::StatRow);
    }

    #[test]
    fn report_line_parses_under_its_division() {
        let text = "American League East\n1 New York Yankees 10 5 0.0 1 8 2.0 3\n";
        let (records, degraded) = parse_standings_report(text, &TeamDirectory::mlb());
        assert!(degraded.is_empty());
        let rec = &records[0];
        assert_eq!(rec.team, "New York Yankees");
        assert_eq!((rec.wins, rec.losses), (10, 5));
        assert_eq!(rec.win_pct, 0.667);
        assert_eq!(rec.games_behind, 0.0);
        assert_eq!(rec.division, "American League East");
        assert_eq!(rec.rank, 1);
        assert_eq!(rec.wildcard_rank, Some(8));
        assert_eq!(rec.wildcard_games_behind, Some(2.0));
        assert_eq!(rec.elimination, Some(Elimination::Number(1)));
        assert_eq!(rec.wildcard_elimination, Some(Elimination::Number(3)));
    }

    #[test]
    fn former_club_names_map_to_the_current_club() {
        let dir = TeamDirectory::mlb();
        let text = "National League East\n1 Florida Marlins 10 5 0.0 1 8 2.0 3\n";
        let (records, degraded) = parse_standings_report(text, &dir);
        assert!(degraded.is_empty());
        assert_eq!(records[0].team, "Miami Marlins");
        let marlins = dir.by_abbreviation("MIA").unwrap();
        assert!(marlins.matches(&records[0].team));

        let native = NativeTeamStats {
            provider: Provider::Secondary,
            batting: vec![row("Montreal Expos", &[("runs", 640.0)])],
            pitching: vec![],
        };
        let out = normalize_team_stats(&native, &dir);
        assert!(out.degraded.is_empty());
        assert_eq!(out.value[0].abbreviation, "WSN");
    }

    #[test]
    fn report_parser_skips_boilerplate_and_coerces_dashes() {
        let text = "\
National League Central
Rank Team                   W   L   GB  (E#) WC Rank WC GB (E#)
 1   Milwaukee Brewers     93  69    -    -      1    +5.0   -
 2   Chicago Cubs          83  79  10.0   E      -     3.0   E
 7   garbage line
";
        let (records, degraded) = parse_standings_report(text, &TeamDirectory::mlb());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].games_behind, 0.0);
        assert_eq!(records[0].wildcard_games_behind, Some(-5.0));
        assert_eq!(records[0].elimination, None);
        assert_eq!(records[1].division, "National League Central");
        assert_eq!(records[1].wildcard_rank, None);
        assert_eq!(records[1].elimination, Some(Elimination::Division));
        assert_eq!(degraded.len(), 1);
        assert_eq!(degraded[0].kind, DegradedKind::StandingsLine);
    }

    #[test]
    fn scraped_tables_recompute_win_pct_and_rank() {
        let cells = |tm: &str, w: &str, l: &str, gb: &str| {
            vec![
                ("Tm".to_string(), tm.to_string()),
                ("W".to_string(), w.to_string()),
                ("L".to_string(), l.to_string()),
                ("W-L%".to_string(), ".999".to_string()),
                ("GB".to_string(), gb.to_string()),
            ]
        };
        let tables = vec![
            DivisionTable {
                caption: None,
                rows: vec![cells("New York Yankees", "94", "68", "--")],
            },
            DivisionTable {
                caption: Some("NL West Division".into()),
                rows: vec![
                    cells("Los Angeles Dodgers", "98", "64", "--"),
                    cells("Totals", "", "", ""),
                    cells("San Diego Padres", "93", "69", "5.0"),
                ],
            },
        ];
        let out = normalize_standings(&NativeStandings::Tables(tables), &TeamDirectory::mlb());
        assert_eq!(out.value.len(), 3);
        assert_eq!(out.value[0].division, "American League East");
        assert_eq!(out.value[0].win_pct, 0.58);
        assert_eq!(out.value[2].division, "National League West");
        assert_eq!(out.value[2].rank, 2);
        assert_eq!(out.value[2].games_behind, 5.0);
        assert_eq!(out.degraded.len(), 1);
    }

    #[test]
    fn scraped_schedule_rows_keep_raw_dates() {
        let game = |cells: &[(&str, &str)]| ScrapedGame {
            cells: cells
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        };
        let rows = vec![
            game(&[
                ("team_game", "1"),
                ("date_game", "Thursday, Mar 28"),
                ("homeORvis", "@"),
                ("opp_ID", "TEX"),
                ("win_loss_result", "W-wo"),
                ("R", "4"),
                ("RA", "3"),
                ("attendance", "38,130"),
                ("win_loss_streak", "+"),
            ]),
            game(&[("team_game", "2"), ("opp_ID", "TEX")]),
        ];
        let out = normalize_schedule(&NativeSchedule::Scraped(rows), &TeamDirectory::mlb());
        assert_eq!(out.value.len(), 1);
        let entry = &out.value[0];
        assert_eq!(entry.raw_date, "Thursday, Mar 28");
        assert_eq!(entry.date, None);
        assert!(!entry.home);
        assert_eq!(entry.outcome(), Some(GameResult::Win));
        assert_eq!(entry.attendance, Some(38130));
        assert_eq!(entry.streak, Some(Streak(1)));
        assert_eq!(out.degraded[0].kind, DegradedKind::ScheduleRow);
    }

    fn api_game(
        date: &str,
        cubs_home: bool,
        cubs: Option<u16>,
        opp: Option<u16>,
        state: &str,
    ) -> ScheduleGame {
        let side = |id: u32, name: &str, score: Option<u16>| GameSide {
            team: TeamRef {
                id,
                name: name.to_owned(),
                ..TeamRef::default()
            },
            score,
            is_winner: None,
            league_record: Some(LeagueRecord { wins: 1, losses: 0 }),
        };
        let cubs_side = side(112, "Chicago Cubs", cubs);
        let opp_side = side(138, "St. Louis Cardinals", opp);
        let (home, away) = if cubs_home {
            (cubs_side, opp_side)
        } else {
            (opp_side, cubs_side)
        };
        ScheduleGame {
            official_date: Some(date.to_owned()),
            status: GameStatus {
                abstract_game_state: (if state == "Scheduled" {
                    "Preview"
                } else {
                    "Final"
                })
                .to_owned(),
                detailed_state: state.to_owned(),
            },
            teams: GameTeams { home, away },
            ..ScheduleGame::default()
        }
    }

    #[test]
    fn api_games_get_results_dates_and_running_streaks() {
        let games = vec![
            api_game("2024-04-01", true, Some(5), Some(2), "Final"),
            api_game("2024-04-02", false, Some(6), Some(1), "Final"),
            api_game("2024-04-03", false, None, None, "Postponed"),
            api_game("2024-04-04", true, Some(0), Some(3), "Final"),
            api_game("2024-04-05", true, None, None, "Scheduled"),
        ];
        let out = normalize_schedule(
            &NativeSchedule::Api {
                team_id: 112,
                games,
            },
            &TeamDirectory::mlb(),
        );
        let entries = out.value;
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].raw_date, "Monday, Apr 1");
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(entries[0].opponent, "STL");
        assert_eq!(entries[1].streak, Some(Streak(2)));
        assert!(!entries[1].home);
        assert_eq!(entries[2].result.as_deref(), Some("L"));
        assert_eq!(entries[2].streak, Some(Streak(-1)));
        assert_eq!(entries[2].game_number, 3);
        assert_eq!(entries[3].result, None);
        assert_eq!(entries[3].streak, None);
        assert_eq!(entries[3].runs_scored, None);
    }
}
