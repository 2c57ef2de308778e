//! Panel — what a plot shows and how its axes are scaled.
//!
//! A [`PanelSpec`] is projected onto the current [`SeriesBuffer`] tail to
//! produce a [`PanelFrame`]: plain points and resolved axis ranges that a
//! surface can draw without looking at the buffer again.

use crate::series::SeriesBuffer;

/// Range used whenever the data gives no usable extent.
pub const DEFAULT_RANGE: (f64, f64) = (0.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(31, 119, 180);
    pub const RED: Rgb = Rgb(214, 39, 40);
    pub const GREEN: Rgb = Rgb(44, 160, 44);
    pub const PURPLE: Rgb = Rgb(128, 0, 128);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    /// Line with a marker on every sample
    LineMarkers,
    Dashed,
    /// Thin translucent line drawn behind the main trace
    Faint,
    Scatter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSpec {
    pub label: String,
    pub column: String,
    pub style: SeriesStyle,
    pub color: Rgb,
}

impl SeriesSpec {
    pub fn new(label: &str, column: &str, style: SeriesStyle, color: Rgb) -> Self {
        Self {
            label: label.to_string(),
            column: column.to_string(),
            style,
            color,
        }
    }
}

/// How much history a panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Full,
    /// Only the most recent `n` samples; keeps redraw cost flat
    Recent(usize),
}

impl Window {
    pub fn take(&self, len: usize) -> usize {
        match self {
            Window::Full => len,
            Window::Recent(n) => (*n).min(len),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XAxis {
    /// Fixed domain. `from > to` draws a reversed axis.
    Fixed { from: f64, to: f64 },
    FollowData,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YAxis {
    /// `0 ..= factor * max` over the full history, `0 ..= fallback` before data exists.
    Headroom { factor: f64, fallback: f64 },
    FollowData,
}

/// Latest value of a column appended to the panel title.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub label: String,
    pub column: String,
    pub precision: usize,
    pub unit: &'static str,
}

impl Annotation {
    pub fn new(label: &str, column: &str, precision: usize, unit: &'static str) -> Self {
        Self {
            label: label.to_string(),
            column: column.to_string(),
            precision,
            unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub title: String,
    pub annotations: Vec<Annotation>,
    pub x_column: String,
    /// Multiplier applied to x values before drawing (ms -> s)
    pub x_scale: f64,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesSpec>,
    pub window: Window,
    pub x_axis: XAxis,
    pub y_axis: YAxis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSeries {
    pub label: String,
    pub style: SeriesStyle,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub series: Vec<FrameSeries>,
}

impl PanelFrame {
    pub fn is_reversed(&self) -> bool {
        self.x_range.0 > self.x_range.1
    }
}

impl PanelSpec {
    /// Project this panel onto the current buffer.
    pub fn frame(&self, buffer: &SeriesBuffer) -> PanelFrame {
        let n = self.window.take(buffer.len());
        let xs = buffer.tail(&self.x_column, n).unwrap_or(&[]);

        let series: Vec<FrameSeries> = self
            .series
            .iter()
            .map(|spec| {
                let ys = buffer.tail(&spec.column, n).unwrap_or(&[]);
                FrameSeries {
                    label: spec.label.clone(),
                    style: spec.style,
                    color: spec.color,
                    points: xs
                        .iter()
                        .zip(ys)
                        .map(|(x, y)| (x * self.x_scale, *y))
                        .collect(),
                }
            })
            .collect();

        let x_range = match self.x_axis {
            XAxis::Fixed { from, to } => (from, to),
            XAxis::FollowData => data_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0))),
        };

        let y_range = match self.y_axis {
            YAxis::Headroom { factor, fallback } => {
                let peak = self
                    .series
                    .iter()
                    .map(|s| buffer.max_or(&s.column, f64::NEG_INFINITY))
                    .fold(f64::NEG_INFINITY, f64::max);
                headroom_range(peak, factor, fallback)
            }
            YAxis::FollowData => data_range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1))),
        };

        PanelFrame {
            title: self.title_for(buffer),
            x_label: self.x_label.clone(),
            y_label: self.y_label.clone(),
            x_range,
            y_range,
            series,
        }
    }

    fn title_for(&self, buffer: &SeriesBuffer) -> String {
        let parts: Vec<String> = self
            .annotations
            .iter()
            .filter_map(|a| {
                buffer.latest(&a.column).map(|v| {
                    format!("{}: {:.*}{}", a.label, a.precision, v, a.unit)
                })
            })
            .collect();

        if parts.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, parts.join(" | "))
        }
    }
}

/// `0 ..= factor * peak`, falling back to `0 ..= fallback` when the peak is
/// missing, non-positive or not finite.
pub fn headroom_range(peak: f64, factor: f64, fallback: f64) -> (f64, f64) {
    let top = peak * factor;
    if top.is_finite() && top > 0.0 {
        (0.0, top)
    } else {
        (0.0, fallback)
    }
}

/// Min/max of the finite values, padded when the extent collapses to a point.
pub fn data_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if lo > hi {
        return DEFAULT_RANGE;
    }
    if hi - lo < f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_record, Schema};

    fn buffer(schema: &Schema, lines: &[&str]) -> SeriesBuffer {
        let mut buffer = SeriesBuffer::new(schema);
        for line in lines {
            buffer.append(&parse_record(line, schema).unwrap()).unwrap();
        }
        buffer
    }

    fn sweep_panel(x_axis: XAxis) -> PanelSpec {
        PanelSpec {
            title: "Lux vs PSM Level".to_string(),
            annotations: Vec::new(),
            x_column: "PSM_Level".to_string(),
            x_scale: 1.0,
            x_label: "PSM Level".to_string(),
            y_label: "Lux".to_string(),
            series: vec![SeriesSpec::new("Lux", "Lux", SeriesStyle::LineMarkers, Rgb::BLUE)],
            window: Window::Full,
            x_axis,
            y_axis: YAxis::Headroom { factor: 1.1, fallback: 100.0 },
        }
    }

    // ── Axis policy ──────────────────────────────────────────────

    #[test]
    fn test_headroom_scales_to_peak() {
        let schema = Schema::sweep();
        let frame = sweep_panel(XAxis::Fixed { from: 0.0, to: 260.0 })
            .frame(&buffer(&schema, &["10,50", "20,200", "30,100"]));

        assert_eq!(frame.x_range, (0.0, 260.0));
        assert_eq!(frame.y_range.0, 0.0);
        assert!((frame.y_range.1 - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_headroom_fallback_without_data() {
        let frame = sweep_panel(XAxis::Fixed { from: 0.0, to: 260.0 })
            .frame(&SeriesBuffer::new(&Schema::sweep()));
        assert_eq!(frame.y_range, (0.0, 100.0));
        assert!(frame.series[0].points.is_empty());
    }

    #[test]
    fn test_headroom_fallback_for_all_zero_values() {
        let schema = Schema::sweep();
        let frame = sweep_panel(XAxis::Fixed { from: 0.0, to: 260.0 })
            .frame(&buffer(&schema, &["0,0", "1,0"]));
        assert_eq!(frame.y_range, (0.0, 100.0));
    }

    #[test]
    fn test_reversed_fixed_axis() {
        let schema = Schema::sweep();
        let frame = sweep_panel(XAxis::Fixed { from: 255.0, to: 0.0 })
            .frame(&buffer(&schema, &["255,300", "254,298"]));
        assert!(frame.is_reversed());
        assert_eq!(frame.x_range, (255.0, 0.0));
    }

    #[test]
    fn test_data_range_pads_single_value() {
        assert_eq!(data_range([5.0, 5.0].into_iter()), (4.5, 5.5));
        assert_eq!(data_range(std::iter::empty()), DEFAULT_RANGE);
        assert_eq!(data_range([f64::NAN, 2.0, -1.0].into_iter()), (-1.0, 2.0));
    }

    // ── Windowing ────────────────────────────────────────────────

    #[test]
    fn test_recent_window_limits_points() {
        let schema = Schema::live();
        let lines: Vec<String> = (0..10)
            .map(|i| format!("{},300,{},{},{},0.5", i * 100, 250 + i, 260 + i, 100 + i))
            .collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let data = buffer(&schema, &refs);

        let panel = PanelSpec {
            title: "Control Output".to_string(),
            annotations: vec![Annotation::new("Current Level", "PSM_Level", 0, "")],
            x_column: "Time_ms".to_string(),
            x_scale: 0.001,
            x_label: "Time (s)".to_string(),
            y_label: "PSM Level".to_string(),
            series: vec![SeriesSpec::new("PSM Level", "PSM_Level", SeriesStyle::Line, Rgb::GREEN)],
            window: Window::Recent(3),
            x_axis: XAxis::FollowData,
            y_axis: YAxis::FollowData,
        };

        let frame = panel.frame(&data);
        let points = &frame.series[0].points;
        assert_eq!(points.len(), 3);
        assert!((points[0].0 - 0.7).abs() < 1e-9);
        assert_eq!(points[2].1, 109.0);
        assert!((frame.x_range.0 - 0.7).abs() < 1e-9);
        assert!((frame.x_range.1 - 0.9).abs() < 1e-9);
        assert_eq!(frame.title, "Control Output (Current Level: 109)");
    }

    #[test]
    fn test_title_without_data_has_no_annotations() {
        let mut panel = sweep_panel(XAxis::FollowData);
        panel.annotations.push(Annotation::new("Peak", "Lux", 1, " lx"));
        let frame = panel.frame(&SeriesBuffer::new(&Schema::sweep()));
        assert_eq!(frame.title, "Lux vs PSM Level");
    }
}
