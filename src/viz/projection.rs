//! Lon/lat layout: antimeridian handling and aspect-correct map extents.
//!
//! Maps use a plain equirectangular projection with longitude compressed by
//! `cos(mid-latitude)`, which keeps county shapes recognisable at state scale.

use crate::models::{Bounds, Position};
use std::ops::Range;

/// Extent in degrees passed to the chart coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct Extent {
    pub lon: Range<f64>,
    pub lat: Range<f64>,
}

/// True when longitudes span more than half the globe, i.e. the geometry straddles the
/// antimeridian (the Aleutians sit at +179° next to the rest of Alaska at -130°..-170°).
pub fn crosses_antimeridian(bounds: &Bounds) -> bool {
    bounds.width() > 180.0
}

/// Move eastern-hemisphere longitudes west by 360° so the shape stays contiguous.
pub fn unwrap_position((lon, lat): Position, wrap: bool) -> Position {
    if wrap && lon > 0.0 {
        (lon - 360.0, lat)
    } else {
        (lon, lat)
    }
}

/// Extent containing `bounds`, padded by `pad` (fraction per side) and widened in one
/// direction so it fills a `px_w` × `px_h` pixel area without distortion.
pub fn fit_extent(bounds: &Bounds, px_w: u32, px_h: u32, pad: f64) -> Extent {
    const MIN_SPAN: f64 = 0.01;

    let mid_lat = (bounds.min_lat + bounds.max_lat) / 2.0;
    let k = mid_lat.to_radians().cos().max(0.1);

    let mut w = (bounds.width() * k).max(MIN_SPAN) * (1.0 + 2.0 * pad);
    let mut h = bounds.height().max(MIN_SPAN) * (1.0 + 2.0 * pad);

    let target = px_w.max(1) as f64 / px_h.max(1) as f64;
    if w / h < target {
        w = h * target;
    } else {
        h = w / target;
    }

    let cx = (bounds.min_lon + bounds.max_lon) / 2.0;
    let half_lon = w / k / 2.0;
    let half_lat = h / 2.0;
    Extent {
        lon: (cx - half_lon)..(cx + half_lon),
        lat: (mid_lat - half_lat)..(mid_lat + half_lat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Bounds {
        Bounds {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    #[test]
    fn extent_contains_bounds_and_matches_aspect() {
        let bounds = b(-124.4, 32.5, -114.1, 42.0);
        let e = fit_extent(&bounds, 800, 1000, 0.03);
        assert!(e.lon.start < bounds.min_lon && e.lon.end > bounds.max_lon);
        assert!(e.lat.start < bounds.min_lat && e.lat.end > bounds.max_lat);

        let k = 37.25f64.to_radians().cos();
        let ratio = (e.lon.end - e.lon.start) * k / (e.lat.end - e.lat.start);
        assert!((ratio - 0.8).abs() < 1e-9, "ratio {ratio}");
    }

    #[test]
    fn degenerate_bounds_get_min_span() {
        let e = fit_extent(&b(-100.0, 40.0, -100.0, 40.0), 500, 500, 0.0);
        assert!(e.lat.end - e.lat.start >= 0.01);
        assert!(e.lon.end > e.lon.start);
    }

    #[test]
    fn aleutians_unwrap() {
        assert!(crosses_antimeridian(&b(-179.2, 51.0, 179.8, 55.0)));
        assert!(!crosses_antimeridian(&b(-124.4, 32.5, -114.1, 42.0)));
        assert_eq!(unwrap_position((179.5, 52.0), true), (-180.5, 52.0));
        assert_eq!(unwrap_position((179.5, 52.0), false), (179.5, 52.0));
        assert_eq!(unwrap_position((-170.0, 52.0), true), (-170.0, 52.0));
    }
}
