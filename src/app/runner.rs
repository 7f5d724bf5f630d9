use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::app_state::AppState;
use super::fps::FpsMeter;
use super::operator::OperatorCommand;
use crate::common::{Frame, LogOnce};
use crate::config::Settings;
use crate::error::{AppError, FrameError};
use crate::intake::{save_frame, FrameSource};
use crate::pipeline::{EngineSnapshot, SceneEngine, TickReport};

const WINDOW_NOT_FOUND: &str = "Target window not found";

/// What a finished run looked like, for the binary's exit report.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u64,
    pub detections: u64,
    pub final_state: AppState,
    pub final_scene: String,
}

/// Drives the engine on a fixed cadence, samples FPS on a second task and
/// reacts to operator commands until stopped or cancelled.
pub struct Application {
    settings: Settings,
    engine: SceneEngine,
    source: Box<dyn FrameSource>,
    state: Arc<RwLock<AppState>>,
    fps: Arc<Mutex<FpsMeter>>,
    latest_frame: Option<Frame>,
    log_once: LogOnce,
    cancel_token: CancellationToken,
    ticks: u64,
    detections: u64,
}

impl Application {
    pub fn new(settings: Settings, engine: SceneEngine, source: Box<dyn FrameSource>) -> Self {
        Self {
            settings,
            engine,
            source,
            state: Arc::new(RwLock::new(AppState::default())),
            fps: Arc::new(Mutex::new(FpsMeter::new())),
            latest_frame: None,
            log_once: LogOnce::new(),
            cancel_token: CancellationToken::new(),
            ticks: 0,
            detections: 0,
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn state_handle(&self) -> Arc<RwLock<AppState>> {
        self.state.clone()
    }

    pub fn state(&self) -> AppState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let fps = self.fps.lock().unwrap_or_else(PoisonError::into_inner).fps();
        self.engine.snapshot(fps)
    }

    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<OperatorCommand>,
    ) -> Result<RunSummary, AppError> {
        info!(
            "Application started, watching \"{}\" every {} ms",
            self.settings.target_window_title, self.settings.tick_interval_ms
        );
        let fps_task = self.start_fps_task();
        let cancel_token = self.cancel_token.clone();

        let mut ticker = interval(self.settings.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    debug!("Application cancelled");
                    break;
                }
                Some(command) = commands.recv() => {
                    if command == OperatorCommand::Stop {
                        info!("Stop requested");
                        break;
                    }
                    self.handle_command(command);
                }
                _ = ticker.tick() => {
                    self.tick_once();
                }
            }
        }

        cancel_token.cancel();
        if let Err(e) = fps_task.await {
            error!("FPS task failed: {}", e);
        }

        let summary = RunSummary {
            ticks: self.ticks,
            detections: self.detections,
            final_state: self.state(),
            final_scene: self.engine.context().current_scene_name(),
        };
        info!("Application exited after {} ticks", summary.ticks);
        Ok(summary)
    }

    fn start_fps_task(&self) -> JoinHandle<()> {
        let fps = self.fps.clone();
        let state = self.state.clone();
        let cancel_token = self.cancel_token.clone();
        let period = self.settings.fps_interval();

        tokio::spawn(async move {
            let mut ticker = interval(period);
            // interval fires immediately; the first real sample is one period in.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let running = state.read().unwrap_or_else(PoisonError::into_inner).is_running();
                        if !running {
                            continue;
                        }
                        let mut meter = fps.lock().unwrap_or_else(PoisonError::into_inner);
                        if meter.sample().is_some() {
                            debug!("{}", meter.label());
                        }
                    }
                }
            }
        })
    }

    /// One capture, and a detection pass if running.
    pub fn tick_once(&mut self) -> Option<TickReport> {
        self.ticks += 1;
        let frame = match self.source.capture_frame() {
            Ok(frame) => frame,
            Err(FrameError::Unavailable) => {
                self.write_state().window_lost();
                self.log_once.error_once(WINDOW_NOT_FOUND);
                return None;
            }
            Err(e) => {
                warn!("Capture failed: {}", e);
                return None;
            }
        };
        self.log_once.clear_error(WINDOW_NOT_FOUND);
        self.write_state().window_found();

        let report = if self.state().is_running() {
            let report = self.engine.process_frame(&frame);
            if !report.founds.is_empty() {
                self.detections += 1;
                for (marker, boxed) in report.overlay_boxes(self.settings.display_size()) {
                    debug!(
                        "{} at {:?}-{:?} ({:.3})",
                        marker, boxed.top_left, boxed.bottom_right, boxed.confidence
                    );
                }
            }
            // The sampler skips while stopped, so only running ticks are counted.
            self.fps
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .record(Instant::now());
            Some(report)
        } else {
            None
        };

        self.latest_frame = Some(frame);
        report
    }

    pub fn handle_command(&mut self, command: OperatorCommand) {
        match command {
            OperatorCommand::ToggleRunning => {
                self.write_state().toggle();
            }
            OperatorCommand::SaveFrame => self.save_latest_frame(),
            OperatorCommand::Stop => self.cancel_token.cancel(),
        }
    }

    fn save_latest_frame(&self) {
        let Some(frame) = &self.latest_frame else {
            warn!("No frame captured yet, nothing to save");
            return;
        };
        let path = self.settings.save_path();
        if let Err(e) = save_frame(frame, &path) {
            error!("{}", e);
        }
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
