//! Preset — panel layouts for each session kind.

use super::panel::{Annotation, PanelSpec, Rgb, SeriesSpec, SeriesStyle, Window, XAxis, YAxis};

const LUX_HEADROOM: YAxis = YAxis::Headroom {
    factor: 1.1,
    fallback: 100.0,
};

/// Characteristic curve while the level climbs 0 -> 255.
pub fn sweep_up() -> Vec<PanelSpec> {
    vec![sweep_panel(
        "Lux vs PSM Level Characteristic Curve",
        "PSM Level (0 - 255)",
        "Illuminance (Lux)",
        SeriesSpec::new("Measured Lux", "Lux", SeriesStyle::LineMarkers, Rgb::BLUE),
        XAxis::Fixed { from: 0.0, to: 260.0 },
    )]
}

/// Same curve walked downwards; the reversed axis makes the direction visible.
pub fn sweep_down() -> Vec<PanelSpec> {
    vec![sweep_panel(
        "Lux vs PSM Level (255 -> 0)",
        "PSM Level",
        "Lux",
        SeriesSpec::new("Down-Sweep Lux", "Lux", SeriesStyle::LineMarkers, Rgb::RED),
        XAxis::Fixed { from: 255.0, to: 0.0 },
    )]
}

fn sweep_panel(title: &str, x_label: &str, y_label: &str, series: SeriesSpec, x_axis: XAxis) -> PanelSpec {
    PanelSpec {
        title: title.to_string(),
        annotations: Vec::new(),
        x_column: "PSM_Level".to_string(),
        x_scale: 1.0,
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        series: vec![series],
        window: Window::Full,
        x_axis,
        y_axis: LUX_HEADROOM,
    }
}

/// Three stacked panels for the live tuning session: lux stability,
/// control output and the lux/level correlation.
pub fn live(window: usize, scatter_window: usize) -> Vec<PanelSpec> {
    let over_time = |title: &str, y_label: &str| PanelSpec {
        title: title.to_string(),
        annotations: Vec::new(),
        x_column: "Time_ms".to_string(),
        x_scale: 0.001,
        x_label: "Time (s)".to_string(),
        y_label: y_label.to_string(),
        series: Vec::new(),
        window: Window::Recent(window),
        x_axis: XAxis::FollowData,
        y_axis: YAxis::FollowData,
    };

    let mut stability = over_time("Lux Stability", "Lux");
    stability.annotations = vec![
        Annotation::new("Target", "Target", 0, ""),
        Annotation::new("Filtered", "Filtered_Lux", 1, " lx"),
    ];
    stability.series = vec![
        SeriesSpec::new("Target", "Target", SeriesStyle::Dashed, Rgb::RED),
        SeriesSpec::new("Raw Lux", "Raw_Lux", SeriesStyle::Faint, Rgb::BLUE),
        SeriesSpec::new("Filtered Lux", "Filtered_Lux", SeriesStyle::Line, Rgb::BLUE),
    ];

    let mut control = over_time("Control Output", "PSM Level");
    control.annotations = vec![Annotation::new("Current Level", "PSM_Level", 0, "")];
    control.series = vec![SeriesSpec::new("PSM Level", "PSM_Level", SeriesStyle::Line, Rgb::GREEN)];

    let correlation = PanelSpec {
        title: "Correlation Analysis".to_string(),
        annotations: Vec::new(),
        x_column: "PSM_Level".to_string(),
        x_scale: 1.0,
        x_label: "PSM Level".to_string(),
        y_label: "Filtered Lux".to_string(),
        series: vec![SeriesSpec::new("Filtered Lux", "Filtered_Lux", SeriesStyle::Scatter, Rgb::PURPLE)],
        window: Window::Recent(scatter_window),
        x_axis: XAxis::FollowData,
        y_axis: YAxis::FollowData,
    };

    vec![stability, control, correlation]
}
