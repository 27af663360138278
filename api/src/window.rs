use crate::error::{DegenerateWindow, WindowError};
use crate::{GameResult, ScheduleEntry, StandingsRecord, Streak};
use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, warn};

pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeekSummary {
    pub wins: u16,
    pub losses: u16,
    /// Most recent decided game's streak, or the one before it when missing.
    pub streak: Option<Streak>,
    /// Games dated after today. Always 0 for scraped schedules: their rows
    /// carry no year and a date never resolves past today, so an unplayed
    /// game lands in the previous year. Only full-date schedules report any.
    pub future_games: usize,
    /// Entries with no resolved date; left out of every count.
    pub undated: usize,
}

/// `today - 7 days < date <= today`, counted by result prefix. A game counts
/// as decided once it is dated no later than today and carries a result.
pub fn last_seven_days(
    entries: &[ScheduleEntry],
    season: i32,
    today: NaiveDate,
) -> Result<WeekSummary, WindowError> {
    if season != today.year() {
        let err = WindowError::NotCurrentSeason {
            season,
            current: today.year(),
        };
        warn!("{err}");
        return Err(err);
    }

    let start = today - Duration::days(WINDOW_DAYS);
    let mut summary = WeekSummary::default();
    let mut decided: Vec<&ScheduleEntry> = Vec::new();

    for entry in entries {
        let Some(date) = entry.date else {
            summary.undated += 1;
            continue;
        };
        if date > today {
            summary.future_games += 1;
            continue;
        }
        if entry.result.is_none() {
            continue;
        }
        decided.push(entry);
        if date <= start {
            continue;
        }
        match entry.outcome() {
            Some(GameResult::Win) => summary.wins += 1,
            Some(GameResult::Loss) => summary.losses += 1,
            _ => {}
        }
    }

    summary.streak = current_streak(&decided);
    Ok(summary)
}

fn current_streak(decided: &[&ScheduleEntry]) -> Option<Streak> {
    let (last, rest) = decided.split_last()?;
    if last.streak.is_some() {
        return last.streak;
    }
    let fallback = rest.last().and_then(|e| e.streak);
    if fallback.is_some() {
        debug!(
            "game {} has no streak; using game {}",
            last.game_number,
            rest.last().map(|e| e.game_number).unwrap_or_default()
        );
    }
    fallback
}

/// Win % as it stood before this week's games:
/// `(W - week W) / ((W - week W) + (L - week L))`.
pub fn win_pct_week_ago(
    wins: u16,
    losses: u16,
    week: &WeekSummary,
) -> Result<f64, DegenerateWindow> {
    let old_wins = f64::from(wins.saturating_sub(week.wins));
    let old_losses = f64::from(losses.saturating_sub(week.losses));
    let decided = old_wins + old_losses;
    if decided == 0.0 {
        return Err(DegenerateWindow);
    }
    Ok(old_wins / decided)
}

/// Change in win % over the last week.
pub fn win_pct_delta(
    standing: &StandingsRecord,
    week: &WeekSummary,
) -> Result<f64, DegenerateWindow> {
    let before = win_pct_week_ago(standing.wins, standing.losses, week)?;
    let decided = standing.decided_games();
    if decided == 0 {
        return Err(DegenerateWindow);
    }
    let now = f64::from(standing.wins) / f64::from(decided);
    Ok(now - before)
}

/// Cumulative position after each decided game, in schedule order.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub game_number: u16,
    pub wins: u16,
    pub losses: u16,
    pub attendance: Option<u32>,
}

pub fn season_trend(entries: &[ScheduleEntry], today: NaiveDate) -> Vec<TrendPoint> {
    let (mut wins, mut losses) = (0u16, 0u16);
    entries
        .iter()
        .filter_map(|e| Some((e, e.date.filter(|d| *d <= today)?, e.outcome()?)))
        .map(|(entry, date, outcome)| {
            match outcome {
                GameResult::Win => wins += 1,
                GameResult::Loss => losses += 1,
                GameResult::Other => {}
            }
            TrendPoint {
                date,
                game_number: entry.game_number,
                wins,
                losses,
                attendance: entry.attendance,
            }
        })
        .collect()
}
