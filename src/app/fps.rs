use std::collections::VecDeque;
use std::time::Instant;

use crate::common::LogOnce;

const NO_FRAMES: &str = "No frame timestamps recorded, cannot compute FPS";

/// Frame-rate estimate fed by frame timestamps and read out at a fixed interval.
///
/// Each sample counts the frames recorded since the previous sample and divides by
/// the time between the previous sample's newest timestamp and the current newest.
#[derive(Debug, Default)]
pub struct FpsMeter {
    pending: VecDeque<Instant>,
    last_newest: Option<Instant>,
    fps: Option<f64>,
    log_once: LogOnce,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, at: Instant) {
        self.pending.push_back(at);
    }

    /// Consumes the recorded timestamps. `None` when nothing was recorded since the
    /// last sample; a zero interval keeps the previous estimate.
    pub fn sample(&mut self) -> Option<f64> {
        let Some(&newest) = self.pending.back() else {
            self.log_once.debug_once(NO_FRAMES);
            return None;
        };
        self.log_once.clear_debug(NO_FRAMES);

        let count = self.pending.len() as f64;
        self.pending.clear();

        if let Some(previous) = self.last_newest {
            let elapsed = newest.saturating_duration_since(previous).as_secs_f64();
            if elapsed > 0.0 {
                self.fps = Some(count / elapsed);
            }
        }
        self.last_newest = Some(newest);
        self.fps
    }

    /// Timestamps recorded since the last sample.
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    pub fn fps(&self) -> Option<f64> {
        self.fps
    }

    pub fn label(&self) -> String {
        format!("FPS: {:.2}", self.fps.unwrap_or(0.0))
    }
}
