use crate::palette::Color;
use serde::{Deserialize, Serialize};

/// Pixel coordinate, origin top-left
pub type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Pie,
}

/// Largest canvas side, in pixels, that config and rendering accept
pub const MAX_CANVAS_SIDE: u32 = 16_384;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        CanvasSize {
            width: width as f64,
            height: height as f64,
        }
    }
}

// =============================================================================
// Primitives
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    /// Baseline-left anchor, as a 2D canvas would draw it
    pub at: Point,
}

/// One series' geometry. The backend executes these blindly.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Connected points with a circular marker of `marker_radius` on each
    Polyline {
        field: String,
        points: Vec<Point>,
        color: Color,
        marker_radius: f64,
    },
    Rect {
        field: String,
        // Top-Left, Bottom-Right
        tl: Point,
        br: Point,
        color: Color,
    },
    /// Angles in radians, clockwise from 3 o'clock (canvas convention)
    Slice {
        field: String,
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
        label: TextLabel,
    },
}

impl DrawCommand {
    pub fn field(&self) -> &str {
        match self {
            DrawCommand::Polyline { field, .. }
            | DrawCommand::Rect { field, .. }
            | DrawCommand::Slice { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
    pub swatch_tl: Point,
    pub swatch_br: Point,
    pub text_at: Point,
}

// =============================================================================
// Plan
// =============================================================================

/// Render-agnostic description of one chart
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub kind: ChartKind,
    pub width: f64,
    pub height: f64,
    pub title: Option<String>,
    /// Pie charts name the row being shown
    pub caption: Option<TextLabel>,
    /// Largest numeric value among the selected value fields;
    /// `f64::NEG_INFINITY` when there is none
    pub max_value: f64,
    pub axes: Vec<Segment>,
    pub gridlines: Vec<Segment>,
    pub y_ticks: Vec<TextLabel>,
    pub x_labels: Vec<TextLabel>,
    pub commands: Vec<DrawCommand>,
    pub legend: Vec<LegendEntry>,
}

impl LayoutPlan {
    pub fn empty(kind: ChartKind, canvas: CanvasSize) -> Self {
        LayoutPlan {
            kind,
            width: canvas.width,
            height: canvas.height,
            title: None,
            caption: None,
            max_value: f64::NEG_INFINITY,
            axes: Vec::new(),
            gridlines: Vec::new(),
            y_ticks: Vec::new(),
            x_labels: Vec::new(),
            commands: Vec::new(),
            legend: Vec::new(),
        }
    }

    /// True when there is no series geometry to show
    pub fn has_no_series(&self) -> bool {
        self.commands.is_empty()
    }

    /// Distinct fields with geometry, in draw order
    pub fn series_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = Vec::new();
        for cmd in &self.commands {
            if !fields.contains(&cmd.field()) {
                fields.push(cmd.field());
            }
        }
        fields
    }
}
