//! Cairo backend - raster (PNG) output.
//!
//! Compiled only with the `cairo-backend` feature, so builds without the
//! native cairo libraries still get full vector support. Draws the same
//! [`ChartScene`] the SVG backend consumes onto an image surface and writes
//! it out as PNG.

use cairo::{Context, Format, ImageSurface};
use std::f64::consts::PI;
use std::fs::File;
use std::path::Path;

use super::scene::{ChartScene, TextAnchor};
use crate::ports::renderer::RenderError;

/// Render the scene to a PNG file at `path`.
pub fn write_png(scene: &ChartScene, path: &Path) -> Result<(), RenderError> {
    let surface = ImageSurface::create(Format::ARgb32, scene.width as i32, scene.height as i32)
        .map_err(|e| RenderError::Backend(format!("failed to create surface: {e}")))?;
    let context = Context::new(&surface)
        .map_err(|e| RenderError::Backend(format!("failed to create context: {e}")))?;

    set_color(&context, scene.background, 1.0);
    context
        .paint()
        .map_err(|e| RenderError::Backend(format!("failed to clear surface: {e}")))?;

    for line in &scene.lines {
        set_color(&context, line.stroke, line.opacity);
        context.set_line_width(line.width);
        context.move_to(line.x1, line.y1);
        context.line_to(line.x2, line.y2);
        context
            .stroke()
            .map_err(|e| RenderError::Backend(format!("failed to stroke line: {e}")))?;
    }

    for rect in &scene.rects {
        set_color(&context, rect.fill, 1.0);
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        context
            .fill_preserve()
            .map_err(|e| RenderError::Backend(format!("failed to fill rect: {e}")))?;
        set_color(&context, rect.stroke, 1.0);
        context.set_line_width(1.0);
        context
            .stroke()
            .map_err(|e| RenderError::Backend(format!("failed to stroke rect: {e}")))?;
    }

    for circle in &scene.circles {
        set_color(&context, circle.fill, 1.0);
        context.arc(circle.cx, circle.cy, circle.radius, 0.0, 2.0 * PI);
        context
            .fill()
            .map_err(|e| RenderError::Backend(format!("failed to fill marker: {e}")))?;
    }

    for text in &scene.texts {
        set_color(&context, text.color, 1.0);
        context.select_font_face("sans-serif", cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        context.set_font_size(text.size);
        let extents = context
            .text_extents(&text.text)
            .map_err(|e| RenderError::Backend(format!("failed to measure text: {e}")))?;
        let x = match text.anchor {
            TextAnchor::Start => text.x,
            TextAnchor::Middle => text.x - extents.width() / 2.0,
            TextAnchor::End => text.x - extents.width(),
        };
        context.move_to(x, text.y);
        context
            .show_text(&text.text)
            .map_err(|e| RenderError::Backend(format!("failed to draw text: {e}")))?;
    }

    let mut file =
        File::create(path).map_err(|e| RenderError::Io(e.to_string()))?;
    surface
        .write_to_png(&mut file)
        .map_err(|e| RenderError::Io(e.to_string()))
}

/// Apply a `#rrggbb` (or `#rgb`) color to the context.
fn set_color(context: &Context, hex: &str, alpha: f64) {
    let (r, g, b) = parse_hex(hex);
    context.set_source_rgba(r, g, b, alpha);
}

fn parse_hex(hex: &str) -> (f64, f64, f64) {
    let digits = hex.trim_start_matches('#');
    let component = |slice: &str| -> f64 {
        u8::from_str_radix(slice, 16).map(f64::from).unwrap_or(0.0) / 255.0
    };
    match digits.len() {
        3 => {
            let expand = |c: &str| format!("{c}{c}");
            (
                component(&expand(&digits[0..1])),
                component(&expand(&digits[1..2])),
                component(&expand(&digits[2..3])),
            )
        }
        6 => (
            component(&digits[0..2]),
            component(&digits[2..4]),
            component(&digits[4..6]),
        ),
        _ => (0.0, 0.0, 0.0),
    }
}
