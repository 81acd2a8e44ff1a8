// Execute a LayoutPlan on a plotters backend and export the image

use crate::ir::{DrawCommand, LayoutPlan, Point, TextLabel, MAX_CANVAS_SIDE};
use crate::palette::Color as FieldColor;
use anyhow::{anyhow, Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: f64 = 12.0;
const TITLE_FONT_SIZE: f64 = 20.0;
const SERIES_LINE_WIDTH: u32 = 2;
/// Arc resolution used when approximating pie slices with polygons
const ARC_STEPS_PER_TURN: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

/// Render the plan to encoded image bytes
pub fn render(plan: &LayoutPlan, format: ExportFormat) -> Result<Vec<u8>> {
    let (width, height) = pixel_size(plan)?;
    match format {
        ExportFormat::Png => render_png(plan, width, height),
        ExportFormat::Svg => render_svg(plan, width, height),
    }
}

fn pixel_size(plan: &LayoutPlan) -> Result<(u32, u32)> {
    let width = plan.width.round();
    let height = plan.height.round();
    if !(width >= 1.0 && height >= 1.0) {
        anyhow::bail!("Cannot render a {}x{} canvas", plan.width, plan.height);
    }
    if width > MAX_CANVAS_SIDE as f64 || height > MAX_CANVAS_SIDE as f64 {
        anyhow::bail!(
            "Canvas {}x{} is too large (max {} px per side)",
            width,
            height,
            MAX_CANVAS_SIDE
        );
    }
    Ok((width as u32, height as u32))
}

fn render_png(plan: &LayoutPlan, width: u32, height: u32) -> Result<Vec<u8>> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| anyhow!("Canvas {}x{} is too large to rasterize", width, height))?;
    let mut buffer = vec![0u8; len];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_plan(&root, plan)?;
        root.present().context("Failed to present drawing")?;
    }

    let mut png_bytes = Vec::new();
    {
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, width, height, image::ColorType::Rgb8)
            .context("Failed to encode PNG")?;
    }

    Ok(png_bytes)
}

fn render_svg(plan: &LayoutPlan, width: u32, height: u32) -> Result<Vec<u8>> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_plan(&root, plan)?;
        root.present().context("Failed to present drawing")?;
    }
    Ok(svg.into_bytes())
}

fn draw_plan<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, plan: &LayoutPlan) -> Result<()> {
    let fail = |what: &str| {
        let what = what.to_string();
        move |e: DrawingAreaErrorKind<DB::ErrorType>| anyhow!("Failed to draw {}: {:?}", what, e)
    };

    root.fill(&WHITE).map_err(fail("background"))?;

    for seg in plan.gridlines.iter().chain(plan.axes.iter()) {
        root.draw(&PathElement::new(
            vec![coord(seg.from), coord(seg.to)],
            rgb(seg.color).stroke_width(seg.width),
        ))
        .map_err(fail("axis"))?;
    }

    for cmd in &plan.commands {
        match cmd {
            DrawCommand::Polyline {
                points,
                color,
                marker_radius,
                ..
            } => {
                let pixels: Vec<(i32, i32)> = points.iter().map(|&p| coord(p)).collect();
                if pixels.len() > 1 {
                    root.draw(&PathElement::new(
                        pixels.clone(),
                        rgb(*color).stroke_width(SERIES_LINE_WIDTH),
                    ))
                    .map_err(fail("line"))?;
                }
                let radius = marker_radius.round() as i32;
                for p in pixels {
                    root.draw(&Circle::new(p, radius, rgb(*color).filled()))
                        .map_err(fail("marker"))?;
                }
            }
            DrawCommand::Rect { tl, br, color, .. } => {
                root.draw(&Rectangle::new([coord(*tl), coord(*br)], rgb(*color).filled()))
                    .map_err(fail("bar"))?;
            }
            DrawCommand::Slice {
                center,
                radius,
                start_angle,
                end_angle,
                color,
                label,
                ..
            } => {
                let outline = slice_outline(*center, *radius, *start_angle, *end_angle);
                root.draw(&Polygon::new(outline, rgb(*color).filled()))
                    .map_err(fail("slice"))?;
                draw_text(root, label, FONT_SIZE, Pos::new(HPos::Center, VPos::Center))
                    .map_err(fail("slice label"))?;
            }
        }
    }

    let baseline_left = Pos::new(HPos::Left, VPos::Bottom);
    for label in plan.y_ticks.iter().chain(plan.x_labels.iter()) {
        draw_text(root, label, FONT_SIZE, baseline_left).map_err(fail("label"))?;
    }

    for entry in &plan.legend {
        root.draw(&Rectangle::new(
            [coord(entry.swatch_tl), coord(entry.swatch_br)],
            rgb(entry.color).filled(),
        ))
        .map_err(fail("legend swatch"))?;
        let text = TextLabel {
            text: entry.label.clone(),
            at: entry.text_at,
        };
        draw_text(root, &text, FONT_SIZE, baseline_left).map_err(fail("legend"))?;
    }

    if let Some(caption) = &plan.caption {
        draw_text(root, caption, FONT_SIZE, baseline_left).map_err(fail("caption"))?;
    }

    if let Some(title) = plan.title.as_deref().filter(|t| !t.is_empty()) {
        let label = TextLabel {
            text: title.to_string(),
            at: (plan.width / 2.0, 4.0),
        };
        draw_text(root, &label, TITLE_FONT_SIZE, Pos::new(HPos::Center, VPos::Top))
            .map_err(fail("title"))?;
    }

    Ok(())
}

fn draw_text<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    label: &TextLabel,
    size: f64,
    pos: Pos,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = (FONT_FAMILY, size).into_font().color(&BLACK).pos(pos);
    root.draw(&Text::new(label.text.clone(), coord(label.at), style))
}

/// Pie slice as a closed polygon: center, then points along the arc
fn slice_outline(center: Point, radius: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let sweep = end - start;
    let steps = ((sweep / std::f64::consts::TAU) * ARC_STEPS_PER_TURN).ceil().max(1.0) as usize;
    let mut outline = Vec::with_capacity(steps + 2);
    outline.push(coord(center));
    for i in 0..=steps {
        let angle = start + sweep * i as f64 / steps as f64;
        outline.push(coord((
            center.0 + radius * angle.cos(),
            center.1 + radius * angle.sin(),
        )));
    }
    outline
}

fn coord(p: Point) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn rgb(c: FieldColor) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}
