//! Render — incremental plotting of the series buffer.
//!
//! - `panel.rs`: panel specs, axis policies and frame projection
//! - `preset.rs`: panel layouts per session kind
//! - `surface.rs`: drawing targets (PNG via plotters, null)
//!
//! Drawing failures are never fatal: they are logged and the session
//! carries on, since the CSV log is the authoritative record.

pub mod panel;
pub mod preset;
pub mod surface;

use std::path::Path;

use tracing::{debug, warn};

use crate::series::SeriesBuffer;

pub use panel::{PanelFrame, PanelSpec};
pub use surface::{NullSurface, PlotSurface, PngSurface, RenderError};

pub struct Renderer {
    panels: Vec<PanelSpec>,
    live: Box<dyn PlotSurface>,
    export_size: (u32, u32),
    redraws: u64,
}

impl Renderer {
    pub fn new(panels: Vec<PanelSpec>, live: Box<dyn PlotSurface>) -> Self {
        let export_size = canvas_size(panels.len());
        Self {
            panels,
            live,
            export_size,
            redraws: 0,
        }
    }

    /// Renderer with no live output; export still works.
    pub fn headless(panels: Vec<PanelSpec>) -> Self {
        Self::new(panels, Box::new(NullSurface))
    }

    pub fn frames(&self, buffer: &SeriesBuffer) -> Vec<PanelFrame> {
        self.panels.iter().map(|p| p.frame(buffer)).collect()
    }

    /// Replace everything on the live surface with the current tail.
    pub fn redraw(&mut self, buffer: &SeriesBuffer) {
        let frames = self.frames(buffer);
        if let Err(e) = self.live.draw(&frames) {
            warn!("Live redraw failed: {}", e);
        }
        self.redraws += 1;
    }

    /// Render the final state once to `path`.
    pub fn export(&self, buffer: &SeriesBuffer, path: &Path) -> Result<(), RenderError> {
        let frames = self.frames(buffer);
        PngSurface::new(path, self.export_size).draw(&frames)?;
        debug!("Exported {} panel(s) to {}", frames.len(), path.display());
        Ok(())
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

/// 1000x600 for a single panel, 400px of height per panel when stacked.
pub fn canvas_size(panels: usize) -> (u32, u32) {
    match panels {
        0 | 1 => (1000, 600),
        n => (1000, 400 * n as u32),
    }
}
