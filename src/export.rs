//! Chart export to SVG and PNG

use crate::chart::{self, ChartGeometry};
use crate::constants::*;
use crate::ranking::ActivityRanking;
use crate::theme::{self, hex};
use crate::utils::premul_to_straight;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

pub const EXPORT_WIDTH: f32 = 1800.0;
pub const EXPORT_HEIGHT: f32 = 1200.0;

const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";
/// Labels longer than this are cut with an ellipsis
const MAX_LABEL_CHARS: usize = 60;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn truncate_label(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_LABEL_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{}…", cut.trim_end())
    }
}

/// Render the chart as a standalone SVG document.
pub fn chart_svg(ranking: &ActivityRanking, width: f32, height: f32) -> Result<String> {
    let geometry = chart::layout(ranking, width, height);
    let mut svg = String::new();
    write_svg(&mut svg, &geometry).context("Failed to render chart SVG")?;
    Ok(svg)
}

fn write_svg(svg: &mut String, g: &ChartGeometry) -> std::fmt::Result {
    let blue = hex(theme::CHART_BAR);
    let grid = hex(theme::CHART_GRID);

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}">"#,
        w = g.width,
        h = g.height
    )?;
    writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        svg,
        r#"<text x="{}" y="36" text-anchor="middle" font-size="24" font-weight="bold" fill="{blue}">{}</text>"#,
        g.width / 2.0,
        escape_xml(&g.title)
    )?;

    for tick in &g.ticks {
        writeln!(
            svg,
            r#"<line x1="{x}" y1="{top}" x2="{x}" y2="{bottom}" stroke="{grid}" stroke-dasharray="6,4" stroke-opacity="0.7"/>"#,
            x = tick.x,
            top = g.plot.y,
            bottom = g.plot.bottom()
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="14" fill="{blue}">{}</text>"#,
            tick.x,
            g.plot.bottom() + 20.0,
            tick.label
        )?;
    }

    for bar in &g.bars {
        writeln!(
            svg,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{blue}"/>"#,
            bar.rect.x, bar.rect.y, bar.rect.w, bar.rect.h
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="end" dominant-baseline="middle" font-size="14" fill="{blue}">{}</text>"#,
            g.label_right,
            bar.rect.center_y(),
            escape_xml(&truncate_label(&bar.activity))
        )?;
        writeln!(
            svg,
            r#"<text x="{}" y="{}" dominant-baseline="middle" font-size="13" fill="{blue}">{}</text>"#,
            bar.value_x,
            bar.rect.center_y(),
            bar.value_label
        )?;
    }

    writeln!(
        svg,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{blue}"/>"#,
        g.plot.x, g.plot.y, g.plot.w, g.plot.h
    )?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-size="16" font-weight="bold" fill="{blue}">{}</text>"#,
        g.plot.x + g.plot.w / 2.0,
        g.plot.bottom() + 48.0,
        escape_xml(CHART_X_LABEL)
    )?;
    writeln!(
        svg,
        r#"<text x="22" y="{y}" transform="rotate(-90 22 {y})" text-anchor="middle" font-size="16" font-weight="bold" fill="{blue}">{}</text>"#,
        escape_xml(CHART_Y_LABEL),
        y = g.plot.y + g.plot.h / 2.0
    )?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="end" font-size="16" font-weight="bold" fill="{blue}">{ORG_SHORT}</text>"#,
        g.width - 24.0,
        g.height - 24.0
    )?;
    writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="end" font-size="12" fill="{blue}">{ORG_URL_LABEL}</text>"#,
        g.width - 24.0,
        g.height - 8.0
    )?;
    svg.push_str("</svg>\n");
    Ok(())
}

/// Rasterize an SVG document into straight-alpha RGBA pixels.
pub fn rasterize_svg(svg: &str) -> Result<(Vec<u8>, u32, u32)> {
    let mut options = resvg::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = resvg::usvg::Tree::from_str(svg, &options).context("Failed to parse chart SVG")?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .context("Chart has an empty canvas")?;
    resvg::render(&tree, resvg::usvg::Transform::default(), &mut pixmap.as_mut());
    Ok((premul_to_straight(&pixmap), size.width(), size.height()))
}

/// Save the chart at `path`; `.svg` writes the vector document, anything else a PNG.
pub fn save_chart(ranking: &ActivityRanking, path: &Path) -> Result<()> {
    let svg = chart_svg(ranking, EXPORT_WIDTH, EXPORT_HEIGHT)?;
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    if is_svg {
        std::fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
    } else {
        let (pixels, w, h) = rasterize_svg(&svg)?;
        let img = image::RgbaImage::from_raw(w, h, pixels).context("Pixel buffer size mismatch")?;
        img.save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    info!(path = %path.display(), year = ranking.year, "Chart exported");
    Ok(())
}

/// Suggested file name for the chart of `year`
pub fn default_file_name(year: i32) -> String {
    format!("ranking-atividades-{year}.png")
}
