// Field colors: a fixed palette plus a per-field cache

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fmt;

/// 24-bit display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const GRID: Color = Color { r: 0xdd, g: 0xdd, b: 0xdd };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow!("Invalid color '{}': expected #rrggbb", hex));
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Ordered list of colors handed out by selection position
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl ColorPalette {
    /// The five-color default palette
    pub fn default_five() -> Self {
        ColorPalette {
            colors: vec![
                Color::rgb(0x00, 0xaf, 0xff),
                Color::rgb(0xff, 0x63, 0x84),
                Color::rgb(0x4b, 0xc0, 0xc0),
                Color::rgb(0xff, 0xce, 0x56),
                Color::rgb(0x99, 0x66, 0xff),
            ],
        }
    }

    /// Build from `#rrggbb` strings; an empty list falls back to the default
    pub fn from_hex_list(hexes: &[String]) -> Result<Self> {
        if hexes.is_empty() {
            return Ok(Self::default_five());
        }
        let colors = hexes
            .iter()
            .map(|h| Color::from_hex(h))
            .collect::<Result<Vec<_>>>()?;
        Ok(ColorPalette { colors })
    }

    /// Get color for a specific index (wraps around if index > palette size)
    pub fn get_color(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::default_five()
    }
}

/// Anything the layout compiler can ask for a series color.
/// `position` is the field's index in the current y-selection.
pub trait ColorSource {
    fn color_of(&mut self, field: &str, position: usize) -> Color;
}

impl<F> ColorSource for F
where
    F: FnMut(&str, usize) -> Color,
{
    fn color_of(&mut self, field: &str, position: usize) -> Color {
        self(field, position)
    }
}

/// Per-field color cache.
///
/// A field is colored the first time it is asked for, by its y-selection
/// position; afterwards it keeps that color until [`FieldColorMap::remove`]
/// clears it, even if it leaves and re-enters the selection.
#[derive(Debug, Clone, Default)]
pub struct FieldColorMap {
    palette: ColorPalette,
    assigned: HashMap<String, Color>,
}

impl FieldColorMap {
    pub fn new(palette: ColorPalette) -> Self {
        FieldColorMap {
            palette,
            assigned: HashMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<Color> {
        self.assigned.get(field).copied()
    }

    /// Explicit choice from a color picker
    pub fn set(&mut self, field: &str, color: Color) {
        self.assigned.insert(field.to_string(), color);
    }

    pub fn remove(&mut self, field: &str) -> Option<Color> {
        self.assigned.remove(field)
    }

    pub fn clear(&mut self) {
        self.assigned.clear();
    }
}

impl ColorSource for FieldColorMap {
    fn color_of(&mut self, field: &str, position: usize) -> Color {
        let palette = &self.palette;
        *self
            .assigned
            .entry(field.to_string())
            .or_insert_with(|| palette.get_color(position))
    }
}
