use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::conf::CaptureConfig;
use crate::parser::Schema;
use crate::render::{preset, PanelSpec};
use crate::transport::TransportSettings;

/// `chrono` format used to stamp output file names.
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Level climbs 0 -> 255, one `level,lux` line per step
    SweepUp,
    /// Level falls 255 -> 0
    SweepDown,
    /// Continuous six-field control loop telemetry
    Live,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::SweepUp => "sweep_up",
            SessionKind::SweepDown => "sweep_down",
            SessionKind::Live => "live",
        }
    }

    pub fn schema(&self) -> Schema {
        match self {
            SessionKind::SweepUp | SessionKind::SweepDown => Schema::sweep(),
            SessionKind::Live => Schema::live(),
        }
    }

    /// Sweeps must not lose a single step; the live view must not lag.
    pub fn mode(&self) -> IngestMode {
        match self {
            SessionKind::SweepUp | SessionKind::SweepDown => IngestMode::Exhaustive,
            SessionKind::Live => IngestMode::LatestOnly,
        }
    }

    pub fn default_read_timeout_ms(&self) -> u64 {
        match self {
            SessionKind::SweepUp | SessionKind::SweepDown => 1000,
            SessionKind::Live => 10,
        }
    }

    /// Column reported as the session peak.
    pub fn measured_column(&self) -> &'static str {
        match self {
            SessionKind::SweepUp | SessionKind::SweepDown => "Lux",
            SessionKind::Live => "Filtered_Lux",
        }
    }

    pub fn csv_name(&self, stamp: &str) -> String {
        match self {
            SessionKind::SweepUp => format!("sweep_data_{}.csv", stamp),
            SessionKind::SweepDown => format!("down_sweep_{}.csv", stamp),
            SessionKind::Live => format!("light_log_{}.csv", stamp),
        }
    }

    /// Final image name. The live session is interactive only.
    pub fn image_name(&self, stamp: &str) -> Option<String> {
        match self {
            SessionKind::SweepUp => Some(format!("characteristic_curve_{}.png", stamp)),
            SessionKind::SweepDown => Some(format!("down_sweep_graph_{}.png", stamp)),
            SessionKind::Live => None,
        }
    }

    pub fn panels(&self, window: usize, scatter_window: usize) -> Vec<PanelSpec> {
        match self {
            SessionKind::SweepUp => preset::sweep_up(),
            SessionKind::SweepDown => preset::sweep_down(),
            SessionKind::Live => preset::live(window, scatter_window),
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sweep_up" | "sweep" => Ok(SessionKind::SweepUp),
            "sweep_down" => Ok(SessionKind::SweepDown),
            "live" => Ok(SessionKind::Live),
            other => Err(format!("unknown session kind: {:?}", other)),
        }
    }
}

/// Which lines of a drained chunk become candidate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// Every complete line
    Exhaustive,
    /// Only the newest complete line; older ones are dropped unparsed
    LatestOnly,
}

/// Immutable run context, built once from configuration.
#[derive(Debug, Clone)]
pub struct Session {
    pub kind: SessionKind,
    pub transport: TransportSettings,
    pub settle: Duration,
    pub schema: Schema,
    pub mode: IngestMode,
    pub sentinel: String,
    pub csv_path: PathBuf,
    pub image_path: Option<PathBuf>,
    pub live_view_path: Option<PathBuf>,
    pub panels: Vec<PanelSpec>,
    pub poll_interval: Duration,
    pub tick_interval: Duration,
    pub target: Option<f64>,
    /// Overwrite-in-place progress line on stdout
    pub progress: bool,
}

impl Session {
    pub fn from_config(config: &CaptureConfig, stamp: &str) -> Self {
        let kind = config.session;
        let dir = Path::new(&config.output_dir);

        Self {
            kind,
            transport: TransportSettings {
                port: config.port.clone(),
                baud: config.baud,
                read_timeout: Duration::from_millis(config.read_timeout_ms()),
            },
            settle: Duration::from_millis(config.settle_ms),
            schema: kind.schema(),
            mode: kind.mode(),
            sentinel: config.sentinel_text.clone(),
            csv_path: dir.join(kind.csv_name(stamp)),
            image_path: kind.image_name(stamp).map(|name| dir.join(name)),
            live_view_path: config.live_view.as_ref().map(|name| dir.join(name)),
            panels: kind.panels(config.window, config.scatter_window),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            target: config.target,
            progress: true,
        }
    }
}
