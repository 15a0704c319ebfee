//! Map colors and their conversion to plotters styles.
//!
//! Context counties get a translucent neutral fill with a thin gray outline; the
//! selected county is redrawn on top in translucent red with a heavier black outline.

use plotters::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, the form SVG output uses.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A color with opacity in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub rgb: Rgb8,
    pub alpha: f64,
}

impl Paint {
    pub const fn opaque(rgb: Rgb8) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub const fn translucent(rgb: Rgb8, alpha: f64) -> Self {
        Self { rgb, alpha }
    }
}

pub const LIGHT_BLUE: Rgb8 = Rgb8::new(173, 216, 230);
pub const GRAY: Rgb8 = Rgb8::new(128, 128, 128);
pub const HIGHLIGHT_RED: Rgb8 = Rgb8::new(255, 0, 0);
pub const OUTLINE_BLACK: Rgb8 = Rgb8::new(0, 0, 0);
pub const TITLE_BLUE: Rgb8 = Rgb8::new(0, 0, 139);
pub const PAPER: Rgb8 = Rgb8::new(255, 255, 255);

#[derive(Clone, Debug, PartialEq)]
pub struct MapStyle {
    pub background: Rgb8,
    pub base_fill: Paint,
    pub base_stroke: Paint,
    pub base_stroke_width: u32,
    pub highlight_fill: Paint,
    pub highlight_stroke: Paint,
    pub highlight_stroke_width: u32,
    pub title_color: Rgb8,
    pub title_font_px: u32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background: PAPER,
            base_fill: Paint::translucent(LIGHT_BLUE, 0.5),
            base_stroke: Paint::opaque(GRAY),
            base_stroke_width: 1,
            highlight_fill: Paint::translucent(HIGHLIGHT_RED, 0.7),
            highlight_stroke: Paint::opaque(OUTLINE_BLACK),
            highlight_stroke_width: 2,
            title_color: TITLE_BLUE,
            title_font_px: 22,
        }
    }
}

pub fn rgb_color(rgb: Rgb8) -> RGBColor {
    RGBColor(rgb.r, rgb.g, rgb.b)
}

pub fn rgba_color(paint: Paint) -> RGBAColor {
    rgb_color(paint.rgb).mix(paint.alpha.clamp(0.0, 1.0))
}

/// Filled polygon style.
pub fn fill_style(paint: Paint) -> ShapeStyle {
    rgba_color(paint).filled()
}

/// Outline stroke style.
pub fn line_style(paint: Paint, width: u32) -> ShapeStyle {
    rgba_color(paint).stroke_width(width)
}
