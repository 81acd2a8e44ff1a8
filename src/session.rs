// Explicit chart session: all UI state in one place, driving
// load -> normalize -> compute_layout on demand

use crate::compiler::compute_layout;
use crate::config::AppConfig;
use crate::error::LoadError;
use crate::ir::{CanvasSize, ChartKind, LayoutPlan};
use crate::loader;
use crate::normalize::{normalize_with, MissingKeyPolicy};
use crate::palette::{Color, FieldColorMap};
use crate::selection::{ChartSelection, SelectionPolicy};
use crate::value::Dataset;
use crate::view::{PieCursor, ViewTransform};
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ChartSession {
    dataset: Option<Dataset>,
    pub category_field: String,
    pub kind: ChartKind,
    pub selection: ChartSelection,
    colors: FieldColorMap,
    view: ViewTransform,
    pie_cursor: PieCursor,
    pub canvas: CanvasSize,
    pub title: Option<String>,
    pub normalize: bool,
    pub missing_key: MissingKeyPolicy,
}

impl Default for ChartSession {
    fn default() -> Self {
        ChartSession {
            dataset: None,
            category_field: "Year".to_string(),
            kind: ChartKind::Line,
            selection: ChartSelection::new(SelectionPolicy::Exclusive),
            colors: FieldColorMap::default(),
            view: ViewTransform::default(),
            pie_cursor: PieCursor::default(),
            canvas: CanvasSize::new(800, 600),
            title: None,
            normalize: true,
            missing_key: MissingKeyPolicy::Drop,
        }
    }
}

impl ChartSession {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(ChartSession {
            category_field: config.chart.category_field.clone(),
            kind: config.chart.kind,
            selection: ChartSelection::new(config.selection.policy),
            colors: FieldColorMap::new(config.color_palette()?),
            canvas: CanvasSize::new(config.canvas.width, config.canvas.height),
            title: config.chart.title.clone(),
            normalize: config.normalize.enabled,
            missing_key: config.normalize.missing_key,
            ..Self::default()
        })
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn colors(&self) -> &FieldColorMap {
        &self.colors
    }

    /// Load a file and make it the current dataset.
    /// On error the previous dataset and selection are left untouched.
    pub fn load_path(&mut self, path: &Path) -> Result<(), LoadError> {
        self.load_file(path, None)
    }

    /// Like [`ChartSession::load_path`], with the MIME type reported by the source
    pub fn load_file(&mut self, path: &Path, mime: Option<&str>) -> Result<(), LoadError> {
        let data = loader::load_file(path, mime)?;
        self.replace_dataset(data);
        Ok(())
    }

    /// Swap in a new dataset wholesale; field pickers start over.
    pub fn replace_dataset(&mut self, data: Dataset) {
        self.dataset = Some(data);
        self.selection.clear();
        self.view.reset();
        self.pie_cursor.reset();
    }

    /// Forget the dataset and all per-chart state
    pub fn reset(&mut self) {
        self.dataset = None;
        self.selection.clear();
        self.colors.clear();
        self.view.reset();
        self.pie_cursor.reset();
    }

    /// Switching chart type never carries pan/zoom over
    pub fn set_kind(&mut self, kind: ChartKind) {
        self.kind = kind;
        self.view.reset();
    }

    pub fn select_x(&mut self, field: &str) {
        self.selection.select_x(field);
    }

    pub fn select_y(&mut self, field: &str) {
        self.selection.select_y(field);
    }

    pub fn deselect_x(&mut self, field: &str) {
        self.selection.deselect_x(field);
    }

    /// The field's color stays cached; see [`ChartSession::clear_field_color`]
    pub fn deselect_y(&mut self, field: &str) {
        self.selection.deselect_y(field);
    }

    pub fn set_field_color(&mut self, field: &str, color: Color) {
        self.colors.set(field, color);
    }

    pub fn clear_field_color(&mut self, field: &str) {
        self.colors.remove(field);
    }

    /// Rows as charted: normalized fresh on every call, never cached
    pub fn chart_data(&self) -> Dataset {
        match &self.dataset {
            Some(data) if self.normalize => {
                normalize_with(data, &self.category_field, self.missing_key)
            }
            Some(data) => data.clone(),
            None => Dataset::default(),
        }
    }

    /// A full redraw: starts from a fresh view
    pub fn draw(&mut self) -> LayoutPlan {
        self.view.reset();
        self.layout()
    }

    /// Re-layout with the current view (after a gesture)
    pub fn layout(&mut self) -> LayoutPlan {
        let data = self.chart_data();
        let pie_row = self.pie_cursor.current(data.len()).unwrap_or(0);
        let mut plan = compute_layout(
            &data,
            self.kind,
            &self.selection,
            self.canvas,
            &self.view,
            pie_row,
            &mut self.colors,
        );
        plan.title = self.title.clone();
        tracing::debug!(
            "Layout {:?}: {} rows, {} commands, max value {}",
            self.kind,
            data.len(),
            plan.commands.len(),
            plan.max_value
        );
        plan
    }

    pub fn zoom(&mut self, delta: f64) -> LayoutPlan {
        self.view.zoom(delta);
        self.layout()
    }

    pub fn pan(&mut self, dx: f64, dy: f64) -> LayoutPlan {
        self.view.pan(dx, dy);
        self.layout()
    }

    /// Advance the pie chart to the next row, wrapping at the end
    pub fn next_pie_row(&mut self) -> LayoutPlan {
        let len = self.chart_data().len();
        self.pie_cursor.next(len);
        self.layout()
    }
}
