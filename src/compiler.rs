// Compile a dataset + selection + view into a LayoutPlan of drawing primitives

use crate::ir::{CanvasSize, ChartKind, DrawCommand, LayoutPlan, LegendEntry, Point, Segment, TextLabel};
use crate::palette::{Color, ColorSource};
use crate::scale::{max_value, ValueScale};
use crate::selection::ChartSelection;
use crate::value::{Dataset, Row};
use crate::view::ViewTransform;
use std::f64::consts::TAU;

/// Margin reserved around the plot for axes and labels
pub const PADDING: f64 = 30.0;
/// Column reserved on the right of line and bar charts for the legend
pub const LEGEND_WIDTH: f64 = 160.0;
pub const MARKER_RADIUS: f64 = 4.0;
/// Fraction of a bar cluster left empty on each side
const BAR_GUTTER: f64 = 0.1;
const LEGEND_ROW_HEIGHT: f64 = 20.0;
const SWATCH_SIZE: f64 = 12.0;
const AXIS_WIDTH: u32 = 3;

/// Compute the full geometry for one chart.
///
/// Never fails: empty data or an empty value selection yields a plan with no
/// series, and the caller decides whether to show a message instead.
/// `pie_row` selects the row shown by pie charts (wrapped modulo row count).
pub fn compute_layout(
    data: &Dataset,
    kind: ChartKind,
    selection: &ChartSelection,
    canvas: CanvasSize,
    view: &ViewTransform,
    pie_row: usize,
    colors: &mut dyn ColorSource,
) -> LayoutPlan {
    match kind {
        ChartKind::Line | ChartKind::Bar => {
            compile_cartesian(data, kind, selection, canvas, view, colors)
        }
        ChartKind::Pie => compile_pie(data, selection, canvas, view, pie_row, colors),
    }
}

/// Plot rectangle for line and bar charts, with the view applied
struct PlotArea {
    left: f64,
    width: f64,
    height: f64,
    baseline: f64,
    shift: (f64, f64),
}

impl PlotArea {
    fn new(canvas: CanvasSize, view: &ViewTransform) -> Self {
        let unscaled = (canvas.width - 2.0 * PADDING - LEGEND_WIDTH).max(0.0);
        PlotArea {
            left: PADDING,
            width: unscaled * view.effective_scale(),
            height: (canvas.height - 2.0 * PADDING).max(0.0),
            baseline: canvas.height - PADDING,
            shift: (view.offset_x, view.offset_y),
        }
    }

    fn at(&self, x: f64, y: f64) -> Point {
        (x + self.shift.0, y + self.shift.1)
    }
}

fn compile_cartesian(
    data: &Dataset,
    kind: ChartKind,
    selection: &ChartSelection,
    canvas: CanvasSize,
    view: &ViewTransform,
    colors: &mut dyn ColorSource,
) -> LayoutPlan {
    let mut plan = LayoutPlan::empty(kind, canvas);
    let area = PlotArea::new(canvas, view);
    let y_fields = selection.y_fields();

    plan.max_value = max_value(data, y_fields);
    let scale = ValueScale::new(plan.max_value, area.baseline, area.height);

    plan.axes = vec![
        Segment {
            from: area.at(area.left, PADDING),
            to: area.at(area.left, area.baseline),
            color: Color::BLACK,
            width: AXIS_WIDTH,
        },
        Segment {
            from: area.at(area.left, area.baseline),
            to: area.at(area.left + area.width, area.baseline),
            color: Color::BLACK,
            width: AXIS_WIDTH,
        },
    ];

    for (y, label) in scale.ticks(area.left - 25.0, area.shift) {
        plan.gridlines.push(Segment {
            from: (area.left + area.shift.0, y),
            to: (area.left + area.width + area.shift.0, y),
            color: Color::GRID,
            width: 1,
        });
        plan.y_ticks.push(label);
    }

    if data.is_empty() || y_fields.is_empty() {
        return plan;
    }

    let series_colors: Vec<Color> = y_fields
        .iter()
        .enumerate()
        .map(|(pos, field)| colors.color_of(field, pos))
        .collect();

    match kind {
        ChartKind::Bar => compile_bars(&mut plan, data, selection, &area, &scale, &series_colors),
        _ => compile_lines(&mut plan, data, selection, &area, &scale, &series_colors),
    }

    plan.legend = legend_entries(canvas, y_fields, &series_colors);
    plan
}

fn compile_lines(
    plan: &mut LayoutPlan,
    data: &Dataset,
    selection: &ChartSelection,
    area: &PlotArea,
    scale: &ValueScale,
    series_colors: &[Color],
) {
    let n = data.len();
    // A single row has no spacing to divide
    let spacing = if n > 1 { area.width / (n - 1) as f64 } else { 0.0 };
    let x_of = |i: usize| area.left + i as f64 * spacing;

    for (field, &color) in selection.y_fields().iter().zip(series_colors) {
        let points: Vec<Point> = data
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let v = row.get(field)?.as_number()?;
                Some(area.at(x_of(i), scale.to_pixel(v)))
            })
            .collect();
        if points.is_empty() {
            continue;
        }
        plan.commands.push(DrawCommand::Polyline {
            field: field.clone(),
            points,
            color,
            marker_radius: MARKER_RADIUS,
        });
    }

    for (i, row) in data.iter().enumerate() {
        if let Some(text) = x_label(row, selection.x_fields()) {
            plan.x_labels.push(TextLabel {
                text,
                at: area.at(x_of(i) - 10.0, area.baseline + 20.0),
            });
        }
    }
}

fn compile_bars(
    plan: &mut LayoutPlan,
    data: &Dataset,
    selection: &ChartSelection,
    area: &PlotArea,
    scale: &ValueScale,
    series_colors: &[Color],
) {
    let categories = bar_categories(data, selection.x_fields());
    if categories.is_empty() {
        return;
    }

    let cluster_width = area.width / categories.len() as f64;
    let bar_width = cluster_width * (1.0 - 2.0 * BAR_GUTTER) / series_colors.len() as f64;

    for (c, category) in categories.iter().enumerate() {
        let cluster_left = area.left + c as f64 * cluster_width;
        let row = data.iter().find(|row| {
            selection
                .x_fields()
                .iter()
                .any(|f| row.get(f).and_then(|v| v.label()).as_deref() == Some(category.as_str()))
        });

        if let Some(row) = row {
            for (j, (field, &color)) in selection.y_fields().iter().zip(series_colors).enumerate() {
                let Some(v) = row.get(field).and_then(|v| v.as_number()) else {
                    continue;
                };
                let x0 = cluster_left + cluster_width * BAR_GUTTER + j as f64 * bar_width;
                let top = scale.to_pixel(v);
                plan.commands.push(DrawCommand::Rect {
                    field: field.clone(),
                    tl: area.at(x0, top.min(area.baseline)),
                    br: area.at(x0 + bar_width, top.max(area.baseline)),
                    color,
                });
            }
        }

        plan.x_labels.push(TextLabel {
            text: category.clone(),
            at: area.at(cluster_left + cluster_width / 2.0 - 10.0, area.baseline + 20.0),
        });
    }
}

/// Distinct values across all x fields, in insertion order
fn bar_categories(data: &Dataset, x_fields: &[String]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for row in data.iter() {
        for field in x_fields {
            if let Some(label) = row.get(field).and_then(|v| v.label()) {
                if !categories.contains(&label) {
                    categories.push(label);
                }
            }
        }
    }
    categories
}

fn x_label(row: &Row, x_fields: &[String]) -> Option<String> {
    x_fields.iter().find_map(|f| row.get(f).and_then(|v| v.label()))
}

fn legend_entries(canvas: CanvasSize, y_fields: &[String], series_colors: &[Color]) -> Vec<LegendEntry> {
    let left = canvas.width - LEGEND_WIDTH + 10.0;
    y_fields
        .iter()
        .zip(series_colors)
        .enumerate()
        .map(|(i, (field, &color))| {
            let top = PADDING + i as f64 * LEGEND_ROW_HEIGHT;
            LegendEntry {
                label: field.clone(),
                color,
                swatch_tl: (left, top),
                swatch_br: (left + SWATCH_SIZE, top + SWATCH_SIZE),
                text_at: (left + SWATCH_SIZE + 6.0, top + 10.0),
            }
        })
        .collect()
}

fn compile_pie(
    data: &Dataset,
    selection: &ChartSelection,
    canvas: CanvasSize,
    view: &ViewTransform,
    pie_row: usize,
    colors: &mut dyn ColorSource,
) -> LayoutPlan {
    let mut plan = LayoutPlan::empty(ChartKind::Pie, canvas);
    if data.is_empty() || selection.y_fields().is_empty() {
        return plan;
    }
    let index = pie_row % data.len();
    let row = &data.rows[index];

    let center = (
        canvas.width / 2.0 + view.offset_x,
        canvas.height / 2.0 + view.offset_y,
    );
    let radius = (canvas.width.min(canvas.height) / 2.0 - PADDING).max(0.0);

    // Slices only for numeric, non-negative values; selection order is slice order
    let slices: Vec<(usize, &String, f64)> = selection
        .y_fields()
        .iter()
        .enumerate()
        .filter_map(|(pos, field)| {
            let v = row.get(field)?.as_number()?;
            (v >= 0.0).then_some((pos, field, v))
        })
        .collect();

    plan.max_value = slices.iter().map(|s| s.2).fold(f64::NEG_INFINITY, f64::max);
    let caption = x_label(row, selection.x_fields()).unwrap_or_else(|| format!("Row {}", index + 1));
    plan.caption = Some(TextLabel {
        text: caption,
        at: (center.0 - 20.0, center.1 + radius + 20.0),
    });

    let total: f64 = slices.iter().map(|s| s.2).sum();
    if !(total > 0.0 && total.is_finite()) {
        return plan;
    }

    let mut start = 0.0;
    for (pos, field, value) in slices {
        let sweep = value / total * TAU;
        let mid = start + sweep / 2.0;
        let label_r = radius * 2.0 / 3.0;
        plan.commands.push(DrawCommand::Slice {
            field: field.clone(),
            center,
            radius,
            start_angle: start,
            end_angle: start + sweep,
            color: colors.color_of(field, pos),
            label: TextLabel {
                text: field.clone(),
                at: (center.0 + mid.cos() * label_r, center.1 + mid.sin() * label_r),
            },
        });
        start += sweep;
    }

    plan
}
