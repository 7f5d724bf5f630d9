use serde::Serialize;
use std::fmt;
use tracing::{info, warn};

/// Host run state. Starts as `NotFoundWindow` until the first capture succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AppState {
    Stopped,
    Running,
    #[default]
    NotFoundWindow,
}

impl AppState {
    pub fn is_running(self) -> bool {
        self == AppState::Running
    }

    /// Operator toggle. Refused while the window is missing; returns whether the state changed.
    pub fn toggle(&mut self) -> bool {
        match self {
            AppState::NotFoundWindow => {
                warn!("Target window not found, cannot start");
                false
            }
            AppState::Running => {
                info!("Stopping");
                *self = AppState::Stopped;
                true
            }
            AppState::Stopped => {
                info!("Starting");
                *self = AppState::Running;
                true
            }
        }
    }

    pub fn window_found(&mut self) {
        if *self == AppState::NotFoundWindow {
            *self = AppState::Running;
        }
    }

    pub fn window_lost(&mut self) {
        *self = AppState::NotFoundWindow;
    }
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AppState::Stopped => "stopped",
            AppState::Running => "running",
            AppState::NotFoundWindow => "window not found",
        };
        f.write_str(label)
    }
}
