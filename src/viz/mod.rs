//! Map rendering: draw a county collection to **SVG** or **PNG** with one county
//! highlighted.
//!
//! - Every county polygon drawn with a neutral translucent fill and thin outline
//! - The selected county redrawn on top with an emphasized fill and heavier outline
//! - A centred title naming the county and its state
//! - No axes, ticks or grid: the map is the content
//!
//! The output format follows the file extension (`.svg`, anything else is PNG).

pub mod projection;
pub mod style;
pub mod text;

pub use style::MapStyle;

use crate::error::{Error, Result};
use crate::models::{Bounds, FeatureCollection, Geometry, Position, Selection};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use projection::{crosses_antimeridian, fit_extent, unwrap_position};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use style::{fill_style, line_style, rgb_color};
use text::{fit_font_px, truncate_to_width};

const MARGIN: i32 = 16;
const MIN_TITLE_PX: u32 = 12;

/// Fonts tried, in order, when PNG output needs a title font and none was configured.
const SYSTEM_FONTS: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Size, colors and title of a rendered map.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Overrides the selection's own title.
    pub title: Option<String>,
    pub style: MapStyle,
    /// TrueType font for PNG titles. SVG output does not need one; PNG output fails
    /// without a usable font.
    pub font_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            title: None,
            style: MapStyle::default(),
            font_path: None,
        }
    }
}

/// Outer rings (filled) and every ring (outlined), already unwrapped across the
/// antimeridian.
#[derive(Debug, Default)]
struct Layer {
    fills: Vec<Vec<Position>>,
    outlines: Vec<Vec<Position>>,
}

impl Layer {
    fn push(&mut self, geometry: &Geometry, wrap: bool) {
        for polygon in geometry.polygons() {
            for (i, ring) in polygon.iter().enumerate() {
                if ring.len() < 2 {
                    continue;
                }
                let pts: Vec<Position> = ring.iter().map(|p| unwrap_position(*p, wrap)).collect();
                if i == 0 && pts.len() >= 3 {
                    self.fills.push(pts.clone());
                }
                self.outlines.push(pts);
            }
        }
    }

    fn bounds(&self) -> Option<Bounds> {
        Bounds::of_positions(self.outlines.iter().flatten().copied())
    }
}

/// Render `collection` with `selection` emphasized to `out_path`.
///
/// ### Errors
/// - `Error::Render` when the selected county has no geometry in either the selection
///   or the collection, or when the drawing backend fails (e.g. unwritable path)
/// - `Error::Render` for PNG output when no title font can be registered; nothing is
///   written in that case
pub fn render_map<P: AsRef<Path>>(
    collection: &FeatureCollection,
    selection: &Selection,
    out_path: P,
    options: &RenderOptions,
) -> Result<()> {
    let selected = selection
        .feature
        .geometry
        .as_ref()
        .or_else(|| {
            collection
                .iter()
                .find(|f| f.geoid == selection.feature.geoid)
                .and_then(|f| f.geometry.as_ref())
        })
        .ok_or_else(|| {
            Error::Render(format!(
                "selected county {} ({}) has no geometry",
                selection.feature.name, selection.feature.geoid
            ))
        })?;

    let raw_bounds = collection
        .bounds()
        .into_iter()
        .chain(selected.bounds())
        .reduce(Bounds::union)
        .ok_or_else(|| Error::Render("nothing to draw".into()))?;
    let wrap = crosses_antimeridian(&raw_bounds);

    let mut base = Layer::default();
    for f in collection {
        if let Some(g) = &f.geometry {
            base.push(g, wrap);
        }
    }
    let mut highlight = Layer::default();
    highlight.push(selected, wrap);

    let bounds = base
        .bounds()
        .into_iter()
        .chain(highlight.bounds())
        .reduce(Bounds::union)
        .ok_or_else(|| Error::Render("nothing to draw".into()))?;

    let title = options.title.clone().unwrap_or_else(|| selection.title());
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (options.width.max(64), options.height.max(64));

    log::info!(
        "rendering {} feature(s) to {} ({}x{})",
        collection.len(),
        out_path.display(),
        size.0,
        size.1
    );

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_map(root, &base, &highlight, &bounds, &title, &options.style)
    } else {
        ensure_font_registered(options.font_path.as_deref())?;
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw_map(root, &base, &highlight, &bounds, &title, &options.style)
    }
}

fn draw_map<DB>(
    root: DrawingArea<DB, Shift>,
    base: &Layer,
    highlight: &Layer,
    bounds: &Bounds,
    title: &str,
    style: &MapStyle,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&rgb_color(style.background))
        .map_err(Error::render)?;

    let (w, _) = root.dim_in_pixel();
    let band = (style.title_font_px as i32) * 2 + MARGIN;
    let (title_area, map_area) = root.split_vertically(band);

    let max_px = (w as i32 - 2 * MARGIN).max(40) as u32;
    let px = fit_font_px(title, style.title_font_px, MIN_TITLE_PX, max_px);
    let shown = truncate_to_width(title, px, max_px);
    let title_color = rgb_color(style.title_color);
    let text_style = TextStyle::from((FontFamily::SansSerif, px))
        .color(&title_color)
        .pos(Pos::new(HPos::Center, VPos::Center));
    title_area
        .draw(&Text::new(shown, (w as i32 / 2, band / 2), text_style))
        .map_err(Error::render)?;

    let (mw, mh) = map_area.dim_in_pixel();
    let extent = fit_extent(
        bounds,
        (mw as i32 - 2 * MARGIN).max(1) as u32,
        (mh as i32 - 2 * MARGIN).max(1) as u32,
        0.03,
    );

    // No configure_mesh(): axes, ticks and labels stay suppressed.
    let mut chart = ChartBuilder::on(&map_area)
        .margin(MARGIN)
        .build_cartesian_2d(extent.lon, extent.lat)
        .map_err(Error::render)?;

    for (layer, fill, stroke, width) in [
        (
            base,
            style.base_fill,
            style.base_stroke,
            style.base_stroke_width,
        ),
        (
            highlight,
            style.highlight_fill,
            style.highlight_stroke,
            style.highlight_stroke_width,
        ),
    ] {
        chart
            .draw_series(
                layer
                    .fills
                    .iter()
                    .map(|ring| Polygon::new(ring.clone(), fill_style(fill))),
            )
            .map_err(Error::render)?;
        chart
            .draw_series(
                layer
                    .outlines
                    .iter()
                    .map(|ring| PathElement::new(ring.clone(), line_style(stroke, width))),
            )
            .map_err(Error::render)?;
    }

    root.present().map_err(Error::render)?;
    Ok(())
}

/// Register a "sans-serif" font for the `ab_glyph` text path, which does not discover OS
/// fonts. A configured path must be usable; otherwise common system fonts are tried.
/// Only a successful registration is remembered.
fn ensure_font_registered(configured: Option<&Path>) -> Result<()> {
    static REGISTERED: Mutex<Option<PathBuf>> = Mutex::new(None);
    let mut registered = REGISTERED.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(path) = configured {
        if registered.as_deref() == Some(path) {
            return Ok(());
        }
        return match register_font_file(path) {
            Ok(()) => {
                log::debug!("registered title font {}", path.display());
                *registered = Some(path.to_path_buf());
                Ok(())
            }
            Err(reason) => {
                log::warn!("font {} unusable: {reason}", path.display());
                Err(Error::Render(format!(
                    "cannot use font {}: {reason}",
                    path.display()
                )))
            }
        };
    }

    if registered.is_some() {
        return Ok(());
    }
    for path in SYSTEM_FONTS.iter().map(Path::new) {
        if register_font_file(path).is_ok() {
            log::debug!("registered title font {}", path.display());
            *registered = Some(path.to_path_buf());
            return Ok(());
        }
    }
    Err(Error::Render(
        "no font available for PNG title; pass --font or render .svg".into(),
    ))
}

fn register_font_file(path: &Path) -> std::result::Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    // ab_glyph keeps a 'static reference for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| "not a usable TrueType font".to_string())
}
