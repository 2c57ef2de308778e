//! Surface — where panel frames end up.
//!
//! [`PngSurface`] draws with plotters' bitmap backend, stacking panels
//! vertically. Re-drawing the same path replaces the previous image, which
//! is how the live view refreshes in place.

use std::path::{Path, PathBuf};

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use super::panel::{FrameSeries, PanelFrame, Rgb, SeriesStyle};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Plot backend error: {0}")]
    Backend(String),
    #[error("Failed to publish {}: {source}", path.display())]
    Publish {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for rendered frames.
pub trait PlotSurface {
    fn draw(&mut self, frames: &[PanelFrame]) -> Result<(), RenderError>;
}

/// Discards every frame. Used when no live view is configured.
#[derive(Debug, Default)]
pub struct NullSurface;

impl PlotSurface for NullSurface {
    fn draw(&mut self, _frames: &[PanelFrame]) -> Result<(), RenderError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PngSurface {
    path: PathBuf,
    size: (u32, u32),
}

impl PngSurface {
    pub fn new(path: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlotSurface for PngSurface {
    /// Draws to a sibling file and renames it over `path`, so readers
    /// only ever see a complete image.
    fn draw(&mut self, frames: &[PanelFrame]) -> Result<(), RenderError> {
        let staging = staging_path(&self.path);

        if let Err(e) = render_png(&staging, self.size, frames) {
            let _ = std::fs::remove_file(&staging);
            return Err(e);
        }

        std::fs::rename(&staging, &self.path).map_err(|source| {
            let _ = std::fs::remove_file(&staging);
            RenderError::Publish {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// `live_view.png` -> `.live_view.partial.png`; the backend picks the
/// encoder from the extension, so it stays `.png`.
fn staging_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map_or_else(|| "plot".to_string(), |s| s.to_string_lossy().into_owned());
    path.with_file_name(format!(".{}.partial.png", stem))
}

fn render_png(path: &Path, size: (u32, u32), frames: &[PanelFrame]) -> Result<(), RenderError> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(backend)?;

    let areas = root.split_evenly((frames.len().max(1), 1));
    for (area, frame) in areas.iter().zip(frames) {
        draw_panel(area, frame).map_err(backend)?;
    }

    root.present().map_err(backend)
}

fn backend<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    frame: &PanelFrame,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    // A reversed axis is drawn over negated values and labelled back.
    let flip = if frame.is_reversed() { -1.0 } else { 1.0 };
    let (x0, x1) = (frame.x_range.0 * flip, frame.x_range.1 * flip);
    let (y0, y1) = frame.y_range;

    let mut chart = ChartBuilder::on(area)
        .caption(&frame.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let precision = if (x1 - x0).abs() >= 10.0 { 0 } else { 2 };
    let x_fmt = |v: &f64| format!("{:.*}", precision, v * flip + 0.0);
    chart
        .configure_mesh()
        .x_desc(frame.x_label.as_str())
        .y_desc(frame.y_label.as_str())
        .x_label_formatter(&x_fmt)
        .light_line_style(&RGBColor(235, 235, 235))
        .draw()?;

    for series in &frame.series {
        draw_series(&mut chart, series, flip)?;
    }

    if frame.series.len() > 1 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

fn draw_series<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    series: &FrameSeries,
    flip: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let color = rgb(series.color);
    let points = series.points.iter().map(move |(x, y)| (x * flip, *y));

    let style = match series.style {
        SeriesStyle::Faint => color.mix(0.3).stroke_width(1),
        SeriesStyle::Scatter => color.mix(0.5).filled(),
        _ => color.stroke_width(2),
    };

    let anno = match series.style {
        SeriesStyle::Line | SeriesStyle::Faint => chart.draw_series(LineSeries::new(points, style))?,
        SeriesStyle::LineMarkers => {
            chart.draw_series(LineSeries::new(points, style).point_size(3))?
        }
        SeriesStyle::Dashed => chart.draw_series(DashedLineSeries::new(points, 6, 4, style))?,
        SeriesStyle::Scatter => {
            chart.draw_series(points.map(|p| Circle::new(p, 2, style)))?
        }
    };

    anno.label(series.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_record, Schema};
    use crate::render::{canvas_size, preset};
    use crate::series::SeriesBuffer;

    #[test]
    fn test_null_surface_accepts_anything() {
        let mut surface = NullSurface;
        assert!(surface.draw(&[]).is_ok());
    }

    #[test]
    fn test_png_surface_keeps_path() {
        let surface = PngSurface::new("live_view.png", (200, 100));
        assert_eq!(surface.path(), Path::new("live_view.png"));
    }

    #[test]
    fn test_staging_path_is_hidden_sibling() {
        assert_eq!(
            staging_path(Path::new("runs/live_view.png")),
            Path::new("runs/.live_view.partial.png")
        );
    }

    // ── PNG output ───────────────────────────────────────────────

    fn live_frames(lines: &[&str]) -> Vec<PanelFrame> {
        let schema = Schema::live();
        let mut buffer = SeriesBuffer::new(&schema);
        for line in lines {
            buffer.append(&parse_record(line, &schema).unwrap()).unwrap();
        }
        preset::live(100, 300).iter().map(|p| p.frame(&buffer)).collect()
    }

    #[test]
    fn test_png_surface_draws_live_panels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live_view.png");
        let frames = live_frames(&["1000,300,250,260,120,0.5", "1050,300,255,262,119,0.5"]);

        let mut surface = PngSurface::new(&path, canvas_size(frames.len()));
        surface.draw(&frames).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_png_surface_replaces_previous_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live_view.png");
        let mut surface = PngSurface::new(&path, canvas_size(3));

        surface.draw(&live_frames(&["1000,300,250,260,120,0.5"])).unwrap();
        surface
            .draw(&live_frames(&["1000,300,250,260,120,0.5", "1050,300,255,262,119,0.5"]))
            .unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["live_view.png"]);
    }
}
