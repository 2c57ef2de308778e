//! Model — CaptureConfig and its defaults.

use serde::{Deserialize, Serialize};

use crate::ingest::SessionKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub session: SessionKind,
    pub port: String,
    pub baud: u32,
    /// Read timeout; the session kind picks one when unset
    pub read_timeout_ms: Option<u64>,
    pub settle_ms: u64,
    pub poll_interval_ms: u64,
    pub tick_interval_ms: u64,
    pub window: usize,
    pub scatter_window: usize,
    pub sentinel_text: String,
    pub output_dir: String,
    /// PNG refreshed on every redraw; `None` disables the live view
    pub live_view: Option<String>,
    /// Setpoint sent to the firmware as `T<value>` once connected
    pub target: Option<f64>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            session: SessionKind::SweepUp,
            port: "COM6".to_string(),
            baud: 115_200,
            read_timeout_ms: None,
            settle_ms: 2000,
            poll_interval_ms: 10,
            tick_interval_ms: 50,
            window: 100,
            scatter_window: 300,
            sentinel_text: "Sweep Finished".to_string(),
            output_dir: ".".to_string(),
            live_view: Some("live_view.png".to_string()),
            target: None,
        }
    }
}

impl CaptureConfig {
    /// Reject values that would make the session meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.port.trim().is_empty() {
            return Err("port must not be empty".to_string());
        }
        if self.baud == 0 {
            return Err("baud must be > 0".to_string());
        }
        if self.window == 0 {
            return Err("window must be > 0".to_string());
        }
        if self.scatter_window == 0 {
            return Err("scatter_window must be > 0".to_string());
        }
        if self.sentinel_text.is_empty() {
            return Err("sentinel_text must not be empty".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("poll_interval_ms must be > 0".to_string());
        }
        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be > 0".to_string());
        }
        if let Some(target) = self.target {
            if !target.is_finite() {
                return Err("target must be a finite number".to_string());
            }
        }
        Ok(())
    }

    pub fn read_timeout_ms(&self) -> u64 {
        self.read_timeout_ms
            .unwrap_or_else(|| self.session.default_read_timeout_ms())
    }
}
