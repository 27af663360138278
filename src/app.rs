use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Selection};
use crate::state::messages::NetworkRequest;
use chrono::{Datelike, Local};
use log::debug;
use mlb_api::TeamDirectory;
use mlb_api::dashboard::Dashboard;
use std::sync::Arc;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Overview,
    Standings,
    Schedule,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(directory: Arc<TeamDirectory>) -> Self {
        let settings = AppSettings::load();
        let current_season = Local::now().year();
        let selection = Selection::new(directory, &settings.team, current_season);

        let app = Self {
            state: AppState::new(selection),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_dashboard_loaded(&mut self, dashboard: Dashboard) {
        if !self.state.selection.is_current(&dashboard) {
            debug!(
                "dropping stale dashboard for {} {}",
                dashboard.team.abbreviation, dashboard.season
            );
            return;
        }
        self.state.schedule_scroll = 0;
        self.state.dashboard = Some(dashboard);
    }

    // -----------------------------------------------------------------------
    // Selection: each change asks for a fresh one-shot load
    // -----------------------------------------------------------------------

    pub fn load_request(&self) -> Option<NetworkRequest> {
        let selection = &self.state.selection;
        Some(NetworkRequest::LoadDashboard {
            team: selection.team()?.clone(),
            season: selection.season,
        })
    }

    pub fn next_team(&mut self) -> Option<NetworkRequest> {
        self.state.selection.next_team();
        self.load_request()
    }

    pub fn prev_team(&mut self) -> Option<NetworkRequest> {
        self.state.selection.prev_team();
        self.load_request()
    }

    pub fn next_season(&mut self) -> Option<NetworkRequest> {
        let before = self.state.selection.season;
        self.state.selection.next_season();
        (self.state.selection.season != before).then(|| self.load_request()).flatten()
    }

    pub fn prev_season(&mut self) -> Option<NetworkRequest> {
        let before = self.state.selection.season;
        self.state.selection.prev_season();
        (self.state.selection.season != before).then(|| self.load_request()).flatten()
    }

    pub fn schedule_down(&mut self) {
        self.state.schedule_scroll = self.state.schedule_scroll.saturating_add(1);
    }

    pub fn schedule_up(&mut self) {
        self.state.schedule_scroll = self.state.schedule_scroll.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}
