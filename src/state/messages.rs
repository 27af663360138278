use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use mlb_api::Team;
use mlb_api::dashboard::Dashboard;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadDashboard { team: Team, season: i32 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// Always delivered; unavailable panels are carried inside as errors.
    DashboardLoaded { dashboard: Box<Dashboard> },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
