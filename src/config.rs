use crate::ir::{ChartKind, MAX_CANVAS_SIDE};
use crate::normalize::MissingKeyPolicy;
use crate::palette::ColorPalette;
use crate::selection::SelectionPolicy;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "chartdrop";
const CONFIG_FILE: &str = "config.toml";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub chart: ChartConfig,
    pub selection: SelectionConfig,
    pub normalize: NormalizeConfig,
    pub palette: PaletteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            width: 800,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub kind: ChartKind,
    /// Field rows are grouped by before charting
    pub category_field: String,
    pub title: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            kind: ChartKind::Line,
            category_field: "Year".to_string(),
            title: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub policy: SelectionPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub enabled: bool,
    pub missing_key: MissingKeyPolicy,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig {
            enabled: true,
            missing_key: MissingKeyPolicy::Drop,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// `#rrggbb` entries; empty means the built-in five-color palette
    pub colors: Vec<String>,
}

impl AppConfig {
    /// `<config dir>/chartdrop/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Load the default config file, or built-in defaults when it does not exist
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(anyhow!(
                "Canvas size must be positive (got {}x{})",
                self.canvas.width,
                self.canvas.height
            ));
        }
        if self.canvas.width > MAX_CANVAS_SIDE || self.canvas.height > MAX_CANVAS_SIDE {
            return Err(anyhow!(
                "Canvas size {}x{} exceeds the {} px limit",
                self.canvas.width,
                self.canvas.height,
                MAX_CANVAS_SIDE
            ));
        }
        if self.chart.category_field.trim().is_empty() {
            return Err(anyhow!("chart.category_field must not be empty"));
        }
        self.color_palette()?;
        Ok(())
    }

    pub fn color_palette(&self) -> Result<ColorPalette> {
        ColorPalette::from_hex_list(&self.palette.colors)
    }
}
