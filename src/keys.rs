use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    let request = match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => {
            guard.update_tab(MenuItem::Overview);
            None
        }
        (_, Char('2'), _) => {
            guard.update_tab(MenuItem::Standings);
            None
        }
        (_, Char('3'), _) => {
            guard.update_tab(MenuItem::Schedule);
            None
        }
        (_, Char('?'), _) => {
            guard.update_tab(MenuItem::Help);
            None
        }
        (MenuItem::Help, KeyCode::Esc, _) => {
            guard.exit_help();
            None
        }

        // Schedule scrolling
        (MenuItem::Schedule, Char('j'), _) => {
            guard.schedule_down();
            None
        }
        (MenuItem::Schedule, Char('k'), _) => {
            guard.schedule_up();
            None
        }

        // Team / season selection
        (_, Char('l') | KeyCode::Right, _) => guard.next_team(),
        (_, Char('h') | KeyCode::Left, _) => guard.prev_team(),
        (_, KeyCode::Up, _) => guard.next_season(),
        (_, KeyCode::Down, _) => guard.prev_season(),
        (_, Char('r'), _) => guard.load_request(),

        // Global
        (_, Char('f'), _) => {
            guard.toggle_full_screen();
            None
        }
        (_, Char('"'), _) => {
            guard.toggle_show_logs();
            None
        }

        _ => None,
    };

    drop(guard);
    if let Some(request) = request {
        let _ = network_requests.send(request).await;
    }
}
