//! Core types shared by the kosmo crates.

mod clock;

pub use clock::FrameClock;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Width of one terminal cell in virtual pixels.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Height of one terminal cell in virtual pixels.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Viewports narrower than this (in pixels) are treated as mobile.
pub const MOBILE_BREAKPOINT_PX: f32 = 640.0;

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport from pixel dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a viewport covering `columns` x `rows` terminal cells.
    pub fn from_cells(columns: u16, rows: u16) -> Self {
        Self {
            width: columns as f32 * CELL_WIDTH_PX,
            height: rows as f32 * CELL_HEIGHT_PX,
        }
    }

    /// Whether both dimensions are known and non-zero.
    pub fn is_known(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Convert percentage coordinates (0-100) into pixels.
    pub fn to_pixels(&self, left: f32, top: f32) -> (f32, f32) {
        (left / 100.0 * self.width, top / 100.0 * self.height)
    }
}

/// Device class resolved from a viewport width snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

impl DeviceClass {
    /// Classify a viewport width in pixels.
    pub fn from_width(width_px: f32) -> Self {
        if width_px < MOBILE_BREAKPOINT_PX {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Pixel distance below which two stars are joined by a line.
    pub fn connect_distance(self) -> f32 {
        match self {
            DeviceClass::Mobile => 100.0,
            DeviceClass::Desktop => 200.0,
        }
    }

    /// Stroke width of connecting lines, for hosts that draw real pixels.
    pub fn line_width(self) -> f32 {
        match self {
            DeviceClass::Mobile => 2.0,
            DeviceClass::Desktop => 5.0,
        }
    }
}

/// Star initial velocity multiplier. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed(f32);

impl Speed {
    /// Create a speed multiplier, rejecting non-finite or non-positive values.
    pub fn new(value: f32) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Light or dark color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Dark,
    Light,
}

impl ColorTheme {
    /// Switch between light and dark.
    pub fn toggle(self) -> Self {
        match self {
            ColorTheme::Dark => ColorTheme::Light,
            ColorTheme::Light => ColorTheme::Dark,
        }
    }

    /// Display name of the theme.
    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Dark => "dark",
            ColorTheme::Light => "light",
        }
    }

    /// Color of the lines joining nearby stars.
    pub fn line_color(self) -> Color {
        match self {
            ColorTheme::Dark => Color::Rgb(255, 255, 255),
            ColorTheme::Light => Color::Rgb(0, 0, 0),
        }
    }

    /// Color of the stars themselves.
    pub fn star_color(self) -> Color {
        match self {
            ColorTheme::Dark => Color::Rgb(226, 232, 240),
            ColorTheme::Light => Color::Rgb(30, 41, 59),
        }
    }

    /// Background gradient stops from top-left to bottom-right.
    pub fn gradient(self) -> [Color; 3] {
        match self {
            // blue-950, black, blue-950
            ColorTheme::Dark => [
                Color::Rgb(23, 37, 84),
                Color::Rgb(0, 0, 0),
                Color::Rgb(23, 37, 84),
            ],
            // blue-200, white, blue-400
            ColorTheme::Light => [
                Color::Rgb(191, 219, 254),
                Color::Rgb(255, 255, 255),
                Color::Rgb(96, 165, 250),
            ],
        }
    }

    /// Color of the help line text.
    pub fn muted_color(self) -> Color {
        match self {
            ColorTheme::Dark => Color::Rgb(100, 116, 139),
            ColorTheme::Light => Color::Rgb(71, 85, 105),
        }
    }
}
