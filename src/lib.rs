// Library exports for chartdrop

pub mod error;
pub mod loader;
pub mod value;

// Pipeline: normalize -> select -> layout -> render
pub mod normalize;
pub mod selection;
pub mod palette;
pub mod view;
pub mod ir;
pub mod scale;
pub mod compiler;
pub mod session;
pub mod render;
pub mod config;

pub use compiler::compute_layout;
pub use error::LoadError;
pub use ir::{CanvasSize, ChartKind, LayoutPlan};
pub use normalize::normalize;
pub use session::ChartSession;
pub use value::{Dataset, Row, Value};
