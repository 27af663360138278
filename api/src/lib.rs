pub mod branding;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod failover;
pub mod normalize;
pub mod primary;
pub mod secondary;
pub mod source;
pub mod teams;
pub mod window;
pub mod wire;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use error::{
    AssetUnavailable, DataUnavailable, DegenerateWindow, ParseDegraded, Query, SourceResult,
    SourceUnavailable, WindowError,
};
pub use teams::{Team, TeamDirectory};

// ---------------------------------------------------------------------------
// Canonical schema: one shape regardless of which provider answered
// ---------------------------------------------------------------------------

/// Every metric a canonical team row can carry. The column name is the
/// canonical identity used by the rename/merge tables in `normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatField {
    // batting
    Games,
    PlateAppearances,
    AtBats,
    Hits,
    Doubles,
    Triples,
    HomeRuns,
    Runs,
    RunsBattedIn,
    Walks,
    Strikeouts,
    StolenBases,
    Average,
    OnBase,
    Slugging,
    Ops,
    Woba,
    WrcPlus,
    War,
    // pitching
    RunsAllowed,
    EarnedRuns,
    InningsPitched,
    Era,
    Whip,
    Fip,
    PitchingWins,
    PitchingLosses,
    Saves,
    StrikeoutsPerNine,
    WalksPerNine,
}

impl StatField {
    pub const ALL: [StatField; 30] = [
        StatField::Games,
        StatField::PlateAppearances,
        StatField::AtBats,
        StatField::Hits,
        StatField::Doubles,
        StatField::Triples,
        StatField::HomeRuns,
        StatField::Runs,
        StatField::RunsBattedIn,
        StatField::Walks,
        StatField::Strikeouts,
        StatField::StolenBases,
        StatField::Average,
        StatField::OnBase,
        StatField::Slugging,
        StatField::Ops,
        StatField::Woba,
        StatField::WrcPlus,
        StatField::War,
        StatField::RunsAllowed,
        StatField::EarnedRuns,
        StatField::InningsPitched,
        StatField::Era,
        StatField::Whip,
        StatField::Fip,
        StatField::PitchingWins,
        StatField::PitchingLosses,
        StatField::Saves,
        StatField::StrikeoutsPerNine,
        StatField::WalksPerNine,
    ];

    /// Canonical column name.
    pub fn column(self) -> &'static str {
        match self {
            StatField::Games => "G",
            StatField::PlateAppearances => "PA",
            StatField::AtBats => "AB",
            StatField::Hits => "H",
            StatField::Doubles => "2B",
            StatField::Triples => "3B",
            StatField::HomeRuns => "HR",
            StatField::Runs => "R",
            StatField::RunsBattedIn => "RBI",
            StatField::Walks => "BB",
            StatField::Strikeouts => "SO",
            StatField::StolenBases => "SB",
            StatField::Average => "AVG",
            StatField::OnBase => "OBP",
            StatField::Slugging => "SLG",
            StatField::Ops => "OPS",
            StatField::Woba => "wOBA",
            StatField::WrcPlus => "wRC+",
            StatField::War => "WAR",
            StatField::RunsAllowed => "RA",
            StatField::EarnedRuns => "ER",
            StatField::InningsPitched => "IP",
            StatField::Era => "ERA",
            StatField::Whip => "WHIP",
            StatField::Fip => "FIP",
            StatField::PitchingWins => "W",
            StatField::PitchingLosses => "L",
            StatField::Saves => "SV",
            StatField::StrikeoutsPerNine => "K/9",
            StatField::WalksPerNine => "BB/9",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            StatField::Games => "Games Played",
            StatField::PlateAppearances => "Plate Appearances",
            StatField::AtBats => "At Bats",
            StatField::Hits => "Hits",
            StatField::Doubles => "Doubles",
            StatField::Triples => "Triples",
            StatField::HomeRuns => "Home Runs",
            StatField::Runs => "Runs",
            StatField::RunsBattedIn => "Runs Batted In",
            StatField::Walks => "Walks",
            StatField::Strikeouts => "Strikeouts",
            StatField::StolenBases => "Stolen Bases",
            StatField::Average => "Batting Average",
            StatField::OnBase => "On Base Percentage",
            StatField::Slugging => "Slugging Percentage",
            StatField::Ops => "On Base + Slugging",
            StatField::Woba => "Weighted On Base Average",
            StatField::WrcPlus => "Weighted Runs Created Plus",
            StatField::War => "Wins Above Replacement",
            StatField::RunsAllowed => "Runs Allowed",
            StatField::EarnedRuns => "Earned Runs",
            StatField::InningsPitched => "Innings Pitched",
            StatField::Era => "Earned Run Average",
            StatField::Whip => "Walks + Hits per Inning",
            StatField::Fip => "Fielding Independent Pitching",
            StatField::PitchingWins => "Pitching Wins",
            StatField::PitchingLosses => "Pitching Losses",
            StatField::Saves => "Saves",
            StatField::StrikeoutsPerNine => "Strikeouts per Nine",
            StatField::WalksPerNine => "Walks per Nine",
        }
    }
}

/// One team's season line after batting and pitching have been merged.
/// Each field is a single canonical metric; `None` means neither provider
/// reported it (common for very old or very new seasons).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStatRecord {
    pub team: String,
    pub abbreviation: String,
    pub games: Option<f64>,
    pub plate_appearances: Option<f64>,
    pub at_bats: Option<f64>,
    pub hits: Option<f64>,
    pub doubles: Option<f64>,
    pub triples: Option<f64>,
    pub home_runs: Option<f64>,
    pub runs: Option<f64>,
    pub runs_batted_in: Option<f64>,
    pub walks: Option<f64>,
    pub strikeouts: Option<f64>,
    pub stolen_bases: Option<f64>,
    pub average: Option<f64>,
    pub on_base: Option<f64>,
    pub slugging: Option<f64>,
    pub ops: Option<f64>,
    pub woba: Option<f64>,
    pub wrc_plus: Option<f64>,
    pub war: Option<f64>,
    pub runs_allowed: Option<f64>,
    pub earned_runs: Option<f64>,
    pub innings_pitched: Option<f64>,
    pub era: Option<f64>,
    pub whip: Option<f64>,
    pub fip: Option<f64>,
    pub pitching_wins: Option<f64>,
    pub pitching_losses: Option<f64>,
    pub saves: Option<f64>,
    pub strikeouts_per_nine: Option<f64>,
    pub walks_per_nine: Option<f64>,
}

impl TeamStatRecord {
    pub fn new(team: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            abbreviation: abbreviation.into(),
            ..Self::default()
        }
    }

    pub fn set(&mut self, field: StatField, value: f64) {
        *self.slot(field) = Some(value);
    }

    /// Canonical `(column, value)` pairs for every populated metric, in
    /// `StatField::ALL` order.
    pub fn columns(&self) -> Vec<(String, f64)> {
        StatField::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f.column().to_owned(), v)))
            .collect()
    }

    /// Runs scored minus runs allowed.
    pub fn run_differential(&self) -> Option<f64> {
        Some(self.runs? - self.runs_allowed?)
    }
}

macro_rules! stat_slots {
    ($($variant:ident => $field:ident),* $(,)?) => {
        impl TeamStatRecord {
            pub fn get(&self, field: StatField) -> Option<f64> {
                match field {
                    $(StatField::$variant => self.$field,)*
                }
            }

            fn slot(&mut self, field: StatField) -> &mut Option<f64> {
                match field {
                    $(StatField::$variant => &mut self.$field,)*
                }
            }
        }
    };
}

stat_slots! {
    Games => games,
    PlateAppearances => plate_appearances,
    AtBats => at_bats,
    Hits => hits,
    Doubles => doubles,
    Triples => triples,
    HomeRuns => home_runs,
    Runs => runs,
    RunsBattedIn => runs_batted_in,
    Walks => walks,
    Strikeouts => strikeouts,
    StolenBases => stolen_bases,
    Average => average,
    OnBase => on_base,
    Slugging => slugging,
    Ops => ops,
    Woba => woba,
    WrcPlus => wrc_plus,
    War => war,
    RunsAllowed => runs_allowed,
    EarnedRuns => earned_runs,
    InningsPitched => innings_pitched,
    Era => era,
    Whip => whip,
    Fip => fip,
    PitchingWins => pitching_wins,
    PitchingLosses => pitching_losses,
    Saves => saves,
    StrikeoutsPerNine => strikeouts_per_nine,
    WalksPerNine => walks_per_nine,
}

/// Division and wildcard standing for one team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsRecord {
    pub team: String,
    pub division: String,
    pub rank: u8,
    pub wins: u16,
    pub losses: u16,
    /// Always recomputed from `wins`/`losses`, rounded to three places.
    pub win_pct: f64,
    pub games_behind: f64,
    pub wildcard_rank: Option<u8>,
    pub wildcard_games_behind: Option<f64>,
    pub elimination: Option<Elimination>,
    pub wildcard_elimination: Option<Elimination>,
}

impl StandingsRecord {
    pub fn decided_games(&self) -> u32 {
        u32::from(self.wins) + u32::from(self.losses)
    }
}

/// Rounded `wins / (wins + losses)`; a team with no decided games sits at zero.
pub fn win_percentage(wins: u16, losses: u16) -> f64 {
    let decided = f64::from(wins) + f64::from(losses);
    if decided == 0.0 {
        return 0.0;
    }
    (f64::from(wins) / decided * 1000.0).round() / 1000.0
}

/// The `E#` column of a standings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Elimination {
    /// Wins plus opponent losses still needed before elimination.
    Number(u16),
    /// `E`: out of division contention.
    Division,
    /// `☠`: out of playoff contention.
    Playoffs,
}

impl Elimination {
    /// `None` for the blank/`-` marker and for anything unrecognised.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "E" => Some(Elimination::Division),
            "☠" => Some(Elimination::Playoffs),
            other => other.parse::<u16>().ok().map(Elimination::Number),
        }
    }

    pub fn help(&self) -> &'static str {
        match self {
            Elimination::Division => "Team is Eliminated from Division Contention",
            Elimination::Playoffs => "Team is Eliminated from Playoff Contention",
            Elimination::Number(_) => "Number of wins/losses to be eliminated.",
        }
    }
}

impl fmt::Display for Elimination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Elimination::Number(n) => write!(f, "{n}"),
            Elimination::Division => f.write_str("E"),
            Elimination::Playoffs => f.write_str("☠"),
        }
    }
}

/// Outcome class of a schedule row, read from its result-indicator prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win,
    Loss,
    Other,
}

impl GameResult {
    /// `W`, `W-wo` → Win; `L`, `L-wo` → Loss; anything else (ties, suspended) → Other.
    pub fn from_indicator(indicator: &str) -> Self {
        let indicator = indicator.trim();
        if indicator.starts_with('W') {
            GameResult::Win
        } else if indicator.starts_with('L') {
            GameResult::Loss
        } else {
            GameResult::Other
        }
    }
}

/// Signed run length: `+3` is three straight wins, `-2` two straight losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak(pub i16);

impl Streak {
    /// Accepts the scraped `+++`/`--` form, the `W3`/`L2` form, or a signed integer.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw.chars().all(|c| c == '+') {
            return i16::try_from(raw.len()).ok().map(Streak);
        }
        if raw.chars().all(|c| c == '-') {
            return i16::try_from(raw.len()).ok().map(|n| Streak(-n));
        }
        if let Some(n) = raw.strip_prefix('W') {
            return n.parse::<i16>().ok().filter(|n| *n > 0).map(Streak);
        }
        if let Some(n) = raw.strip_prefix('L') {
            return n.parse::<i16>().ok().filter(|n| *n > 0).map(|n| Streak(-n));
        }
        raw.parse::<i16>().ok().filter(|n| *n != 0).map(Streak)
    }

    pub fn is_winning(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Streak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 0 {
            write!(f, "W{}", self.0)
        } else {
            write!(f, "L{}", -self.0)
        }
    }
}

/// One game of a team's season, as read from either provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub game_number: u16,
    /// Day-of-week + month/day text, e.g. `Monday, Apr 3 (1)`. No year.
    pub raw_date: String,
    /// Filled in by the date disambiguator, or directly by a provider that
    /// reports full dates. `None` marks a degraded row.
    pub date: Option<NaiveDate>,
    pub opponent: String,
    pub home: bool,
    /// Result indicator text (`W`, `L`, `W-wo`, ...); `None` for unplayed games.
    pub result: Option<String>,
    pub runs_scored: Option<u16>,
    pub runs_allowed: Option<u16>,
    /// Running `W-L` record text after this game.
    pub record: Option<String>,
    pub attendance: Option<u32>,
    pub streak: Option<Streak>,
}

impl ScheduleEntry {
    pub fn outcome(&self) -> Option<GameResult> {
        self.result.as_deref().map(GameResult::from_indicator)
    }
}
