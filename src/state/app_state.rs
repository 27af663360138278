use crate::app::MenuItem;
use mlb_api::dashboard::Dashboard;
use mlb_api::{Team, TeamDirectory};
use std::sync::Arc;

/// Oldest season offered. The club directory knows every name and
/// reference code in use from here on.
pub const FIRST_SEASON: i32 = 2001;

// ---------------------------------------------------------------------------
// Team / season selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Selection {
    directory: Arc<TeamDirectory>,
    pub team_index: usize,
    pub season: i32,
    /// The season in progress (or most recently started); never stepped past.
    pub current_season: i32,
}

impl Selection {
    pub fn new(directory: Arc<TeamDirectory>, team: &str, current_season: i32) -> Self {
        let team_index = directory
            .resolve(team)
            .and_then(|t| directory.index_of(t))
            .unwrap_or_default();
        Self {
            directory,
            team_index,
            season: current_season,
            current_season,
        }
    }

    pub fn team(&self) -> Option<&Team> {
        self.directory.teams().get(self.team_index)
    }

    pub fn next_team(&mut self) {
        let count = self.directory.teams().len();
        if count > 0 {
            self.team_index = (self.team_index + 1) % count;
        }
    }

    pub fn prev_team(&mut self) {
        let count = self.directory.teams().len();
        if count > 0 {
            self.team_index = (self.team_index + count - 1) % count;
        }
    }

    pub fn next_season(&mut self) {
        self.season = (self.season + 1).min(self.current_season);
    }

    pub fn prev_season(&mut self) {
        self.season = (self.season - 1).max(FIRST_SEASON);
    }

    /// Whether a finished load still belongs to what is on screen.
    pub fn is_current(&self, dashboard: &Dashboard) -> bool {
        self.season == dashboard.season
            && self.team().is_some_and(|t| t.abbreviation == dashboard.team.abbreviation)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub selection: Selection,
    pub dashboard: Option<Dashboard>,
    /// Rows of the schedule table scrolled past.
    pub schedule_scroll: u16,
}

impl AppState {
    pub fn new(selection: Selection) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_logs: false,
            selection,
            dashboard: None,
            schedule_scroll: 0,
        }
    }
}
