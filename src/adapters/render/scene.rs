//! Chart scene construction.
//!
//! Builds a fully materialized, deterministic scene of drawing primitives
//! from a render job, so the backends stay isolated from chart layout and
//! brand styling. Both the SVG and the Cairo backend consume the same scene.

use crate::domain::chart::{BrandPalette, ChartType};
use crate::ports::renderer::RenderJob;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 50.0;
const VALUE_TICKS: usize = 5;
const BAR_FILL_RATIO: f64 = 0.7;
const MARKER_RADIUS: f64 = 4.0;

/// A filled rectangle (bars).
#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: &'static str,
    pub stroke: &'static str,
}

/// A stroked line segment (axes, grid, polyline).
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: &'static str,
    pub width: f64,
    pub opacity: f64,
}

/// A filled circle (line-chart markers).
#[derive(Debug, Clone, PartialEq)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: &'static str,
}

/// Horizontal anchoring of a text primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A text label.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub size: f64,
    pub anchor: TextAnchor,
    pub color: &'static str,
}

/// Deterministic scene handed to a rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScene {
    pub width: u32,
    pub height: u32,
    pub background: &'static str,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

/// Build the scene for one job at the given canvas size.
pub fn build_scene(job: &RenderJob, width: u32, height: u32) -> ChartScene {
    let palette = job.style.palette();
    let mut scene = ChartScene {
        width,
        height,
        background: palette.background,
        rects: Vec::new(),
        lines: Vec::new(),
        circles: Vec::new(),
        texts: Vec::new(),
    };

    let plot_left = MARGIN_LEFT;
    let plot_right = f64::from(width) - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = f64::from(height) - MARGIN_BOTTOM;
    let plot_width = plot_right - plot_left;
    let plot_height = plot_bottom - plot_top;

    let values: Vec<f64> = job.data.points().iter().map(|p| p.value).collect();
    let (min_value, max_value) = value_range(&values);
    let to_y = |value: f64| -> f64 {
        plot_bottom - (value - min_value) / (max_value - min_value) * plot_height
    };

    add_value_axis(&mut scene, &palette, min_value, max_value, plot_left, plot_right, to_y);

    // Baseline sits at zero when the range straddles it.
    let baseline = to_y(min_value.max(0.0).min(max_value));
    scene.lines.push(LinePrimitive {
        x1: plot_left,
        y1: baseline,
        x2: plot_right,
        y2: baseline,
        stroke: palette.content,
        width: 1.0,
        opacity: 1.0,
    });

    let n = job.data.len();
    let slot = plot_width / n as f64;

    match job.chart_type {
        ChartType::Bar => {
            let bar_width = slot * BAR_FILL_RATIO;
            for (i, point) in job.data.points().iter().enumerate() {
                let center = plot_left + slot * (i as f64 + 0.5);
                let top = to_y(point.value.max(0.0));
                let bottom = to_y(point.value.min(0.0));
                scene.rects.push(RectPrimitive {
                    x: center - bar_width / 2.0,
                    y: top,
                    width: bar_width,
                    height: (bottom - top).max(0.0),
                    fill: palette.primary,
                    stroke: palette.content,
                });
            }
        }
        ChartType::Line => {
            let mut previous: Option<(f64, f64)> = None;
            for (i, point) in job.data.points().iter().enumerate() {
                let x = plot_left + slot * (i as f64 + 0.5);
                let y = to_y(point.value);
                if let Some((px, py)) = previous {
                    scene.lines.push(LinePrimitive {
                        x1: px,
                        y1: py,
                        x2: x,
                        y2: y,
                        stroke: palette.primary,
                        width: 2.0,
                        opacity: 1.0,
                    });
                }
                scene.circles.push(CirclePrimitive {
                    cx: x,
                    cy: y,
                    radius: MARKER_RADIUS,
                    fill: palette.primary,
                });
                previous = Some((x, y));
            }
        }
    }

    // Category labels under the baseline.
    for (i, point) in job.data.points().iter().enumerate() {
        let center = plot_left + slot * (i as f64 + 0.5);
        scene.texts.push(TextPrimitive {
            x: center,
            y: plot_bottom + 20.0,
            text: point.label.clone(),
            size: 12.0,
            anchor: TextAnchor::Middle,
            color: palette.content,
        });
    }

    scene
}

fn add_value_axis(
    scene: &mut ChartScene,
    palette: &BrandPalette,
    min_value: f64,
    max_value: f64,
    plot_left: f64,
    plot_right: f64,
    to_y: impl Fn(f64) -> f64,
) {
    let step = (max_value - min_value) / (VALUE_TICKS - 1) as f64;
    for i in 0..VALUE_TICKS {
        let value = min_value + step * i as f64;
        let y = to_y(value);
        scene.lines.push(LinePrimitive {
            x1: plot_left,
            y1: y,
            x2: plot_right,
            y2: y,
            stroke: palette.content,
            width: 0.5,
            opacity: 0.2,
        });
        scene.texts.push(TextPrimitive {
            x: plot_left - 8.0,
            y: y + 4.0,
            text: format_tick(value),
            size: 11.0,
            anchor: TextAnchor::End,
            color: palette.content,
        });
    }
}

/// Value range padded so a flat series still has visible height.
fn value_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
    let mut max = values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(0.0);
    if (max - min).abs() < f64::EPSILON {
        max = min + 1.0;
    }
    (min, max)
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.1}")
    }
}
