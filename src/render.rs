use crate::ir::{Graph, Node, NodeKind, Side};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Control-point distance for edge curves, as a fraction of the span.
const CURVE_PULL: f32 = 0.4;
const MIN_CURVE_PULL: f32 = 30.0;

struct Bounds {
    min_x: f32,
    min_y: f32,
    width: f32,
    height: f32,
}

fn canvas_bounds(graph: &Graph, padding: f32) -> Bounds {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for node in graph.nodes() {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }
    if min_x == f32::MAX {
        return Bounds {
            min_x: 0.0,
            min_y: 0.0,
            width: padding * 2.0,
            height: padding * 2.0,
        };
    }
    Bounds {
        min_x: min_x - padding,
        min_y: min_y - padding,
        width: (max_x - min_x) + padding * 2.0,
        height: (max_y - min_y) + padding * 2.0,
    }
}

fn side_normal(side: Side) -> (f32, f32) {
    match side {
        Side::Left => (-1.0, 0.0),
        Side::Right => (1.0, 0.0),
        Side::Top => (0.0, -1.0),
        Side::Bottom => (0.0, 1.0),
    }
}

/// Renders a static SVG preview of the canvas.
pub fn render_svg(graph: &Graph, theme: &Theme) -> String {
    let bounds = canvas_bounds(graph, theme.padding);
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w:.0}\" height=\"{h:.0}\" viewBox=\"{x:.2} {y:.2} {w:.2} {h:.2}\">",
        x = bounds.min_x,
        y = bounds.min_y,
        w = bounds.width,
        h = bounds.height,
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        bounds.min_x, bounds.min_y, theme.background
    ));
    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    for node in graph.nodes() {
        if let NodeKind::Group { label } = &node.kind {
            render_group(&mut svg, node, label.as_deref(), theme);
        }
    }

    for edge in graph.edges() {
        let (Some(from), Some(to)) = (graph.node(&edge.from_node), graph.node(&edge.to_node)) else {
            continue;
        };
        let (from_rect, to_rect) = (from.rect(), to.rect());
        let from_side = edge
            .from_side
            .unwrap_or_else(|| Side::facing(&from_rect, &to_rect));
        let to_side = edge
            .to_side
            .unwrap_or_else(|| Side::facing(&to_rect, &from_rect));
        let start = from_side.anchor(&from_rect);
        let end = to_side.anchor(&to_rect);
        let span = ((end.0 - start.0).powi(2) + (end.1 - start.1).powi(2)).sqrt();
        let pull = (span * CURVE_PULL).max(MIN_CURVE_PULL);
        let (nx1, ny1) = side_normal(from_side);
        let (nx2, ny2) = side_normal(to_side);
        let stroke = theme
            .resolve_color(edge.color.as_deref())
            .unwrap_or_else(|| theme.line_color.clone());
        svg.push_str(&format!(
            "<path d=\"M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\" marker-end=\"url(#arrow)\"/>",
            start.0,
            start.1,
            start.0 + nx1 * pull,
            start.1 + ny1 * pull,
            end.0 + nx2 * pull,
            end.1 + ny2 * pull,
            end.0,
            end.1,
            stroke
        ));
        if let Some(label) = &edge.label {
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                (start.0 + end.0) / 2.0,
                (start.1 + end.1) / 2.0,
                escape_xml(&theme.font_family),
                theme.font_size,
                theme.node_text_color,
                escape_xml(label)
            ));
        }
    }

    for node in graph.nodes() {
        if matches!(node.kind, NodeKind::Group { .. }) {
            continue;
        }
        render_card(&mut svg, node, theme);
    }

    svg.push_str("</svg>");
    svg
}

fn render_group(svg: &mut String, node: &Node, label: Option<&str>, theme: &Theme) {
    let border = theme
        .resolve_color(node.color.as_deref())
        .unwrap_or_else(|| theme.group_border.clone());
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"12\" ry=\"12\" fill=\"{}\" stroke=\"{}\" stroke-dasharray=\"6 4\" stroke-width=\"1.5\"/>",
        node.x, node.y, node.width, node.height, theme.group_background, border
    ));
    if let Some(label) = label {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            node.x + 12.0,
            node.y - 8.0,
            escape_xml(&theme.font_family),
            theme.font_size,
            theme.node_text_color,
            escape_xml(label)
        ));
    }
}

fn render_card(svg: &mut String, node: &Node, theme: &Theme) {
    let border = theme
        .resolve_color(node.color.as_deref())
        .unwrap_or_else(|| theme.node_border_color.clone());
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"8\" ry=\"8\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\"/>",
        node.x, node.y, node.width, node.height, theme.node_fill, border
    ));
    let caption = node.kind.caption();
    if caption.is_empty() {
        return;
    }
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        node.x + node.width / 2.0,
        node.y + node.height / 2.0,
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.node_text_color,
        escape_xml(&caption)
    ));
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&theme.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(
        channel(0)?,
        channel(2)?,
        channel(4)?,
        255,
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
