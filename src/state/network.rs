use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::Local;
use log::{debug, error, warn};
use mlb_api::Team;
use mlb_api::dashboard::{Dashboard, DashboardLoader};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self {
            is_loading: false,
            spinner_char: ' ',
        }
    }
}

pub struct NetworkWorker {
    loader: DashboardLoader,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        loader: DashboardLoader,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            loader,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let dashboard = match request {
                NetworkRequest::LoadDashboard { team, season } => {
                    self.handle_load_dashboard(team, season).await
                }
            };

            debug!("network request complete");
            self.stop_loading_animation(any_panel_loaded(&dashboard)).await;

            let response = NetworkResponse::DashboardLoaded {
                dashboard: Box::new(dashboard),
            };
            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_dashboard(&self, team: Team, season: i32) -> Dashboard {
        let today = Local::now().date_naive();
        debug!("loading dashboard for {} {season} as of {today}", team.abbreviation);
        let dashboard = self.loader.load(&team, season, today).await;
        if !any_panel_loaded(&dashboard) {
            warn!("no panel could be loaded for {} {season}", team.name);
        }
        dashboard
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state = LoadingState {
            is_loading: true,
            spinner_char: SPINNER_CHARS[0],
        };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState {
                    is_loading: false,
                    spinner_char,
                },
            })
            .await;
    }
}

/// The spinner only turns into an error marker when every data panel failed.
fn any_panel_loaded(dashboard: &Dashboard) -> bool {
    dashboard.team_stats.is_ok() || dashboard.standings.is_ok() || dashboard.schedule.is_ok()
}
