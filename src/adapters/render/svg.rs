//! SVG backend - always available vector output.
//!
//! Serializes a [`ChartScene`] into a standalone SVG document. Labels are
//! user-supplied text, so they are XML-escaped.

use super::scene::{ChartScene, TextAnchor};

/// Serialize the scene to an SVG document.
pub fn write_svg(scene: &ChartScene) -> String {
    let mut svg = String::with_capacity(4096);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height,
    ));
    svg.push('\n');
    svg.push_str(&format!(
        r#"  <rect x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
        scene.width, scene.height, scene.background
    ));
    svg.push('\n');

    for line in &scene.lines {
        svg.push_str(&format!(
            r#"  <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{}" stroke-opacity="{}"/>"#,
            line.x1, line.y1, line.x2, line.y2, line.stroke, line.width, line.opacity
        ));
        svg.push('\n');
    }

    for rect in &scene.rects {
        svg.push_str(&format!(
            r#"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="{}"/>"#,
            rect.x, rect.y, rect.width, rect.height, rect.fill, rect.stroke
        ));
        svg.push('\n');
    }

    for circle in &scene.circles {
        svg.push_str(&format!(
            r#"  <circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
            circle.cx, circle.cy, circle.radius, circle.fill
        ));
        svg.push('\n');
    }

    for text in &scene.texts {
        let anchor = match text.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        svg.push_str(&format!(
            r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="{}" text-anchor="{}" fill="{}">{}</text>"#,
            text.x,
            text.y,
            text.size,
            anchor,
            text.color,
            escape_xml(&text.text)
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&apos;".to_string(),
            other => other.to_string(),
        })
        .collect()
}
