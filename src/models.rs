use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;

/// A `(longitude, latitude)` pair in degrees.
pub type Position = (f64, f64);

/// Closed ring of positions (first == last in well-formed GeoJSON, not enforced).
pub type Ring = Vec<Position>;

/// Coordinate reference system tag carried by a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// WGS84 longitude/latitude, the only system the query service emits.
    pub const EPSG_4326: Crs = Crs { epsg: 4326 };

    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Parse a legacy GeoJSON `crs.properties.name` value.
    ///
    /// Accepts the spellings the OGC and EPSG registries use for WGS84 lon/lat.
    pub fn from_name(name: &str) -> Option<Crs> {
        let n = name.trim().to_ascii_uppercase();
        match n.as_str() {
            "EPSG:4326"
            | "URN:OGC:DEF:CRS:EPSG::4326"
            | "URN:OGC:DEF:CRS:OGC:1.3:CRS84"
            | "OGC:CRS84"
            | "CRS84" => Some(Crs::EPSG_4326),
            _ => None,
        }
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

/// Polygonal geometry of one county.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Outer ring followed by holes.
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// Iterate the polygons (each a slice of rings, outer ring first).
    pub fn polygons(&self) -> Box<dyn Iterator<Item = &[Ring]> + '_> {
        match self {
            Geometry::Polygon(rings) => Box::new(std::iter::once(rings.as_slice())),
            Geometry::MultiPolygon(polys) => Box::new(polys.iter().map(|p| p.as_slice())),
        }
    }

    /// Iterate every ring of every polygon.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        self.polygons().flat_map(|p| p.iter())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::of_positions(self.rings().flat_map(|r| r.iter().copied()))
    }
}

/// Axis-aligned lon/lat bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn of_positions(positions: impl IntoIterator<Item = Position>) -> Option<Bounds> {
        let mut it = positions.into_iter();
        let (lon, lat) = it.next()?;
        let mut b = Bounds {
            min_lon: lon,
            min_lat: lat,
            max_lon: lon,
            max_lat: lat,
        };
        for (lon, lat) in it {
            b.min_lon = b.min_lon.min(lon);
            b.max_lon = b.max_lon.max(lon);
            b.min_lat = b.min_lat.min(lat);
            b.max_lat = b.max_lat.max(lat);
        }
        Some(b)
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// One county as returned by the query service.
///
/// Geometry is skipped when serializing; exports carry the attribute table only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub geoid: String,
    pub state_fips: String,
    pub county_fips: String,
    pub state_name: String,
    pub name: String,
    #[serde(skip)]
    pub geometry: Option<Geometry>,
}

/// Ordered features from one query, in response order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    crs: Crs,
}

impl FeatureCollection {
    /// Build a collection, rejecting duplicate GEOIDs and repeated state/county code pairs.
    pub fn new(features: Vec<Feature>, crs: Crs) -> Result<Self> {
        let mut geoids = HashSet::with_capacity(features.len());
        let mut codes = HashSet::with_capacity(features.len());
        for f in &features {
            if !geoids.insert(f.geoid.as_str()) {
                return Err(Error::malformed(format!("duplicate GEOID {}", f.geoid)));
            }
            if !codes.insert((f.state_fips.as_str(), f.county_fips.as_str())) {
                return Err(Error::malformed(format!(
                    "duplicate county code {}/{} (GEOID {})",
                    f.state_fips, f.county_fips, f.geoid
                )));
            }
        }
        Ok(Self { features, crs })
    }

    pub fn empty() -> Self {
        Self {
            features: Vec::new(),
            crs: Crs::EPSG_4326,
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Bounding box over every feature that carries geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref()?.bounds())
            .reduce(Bounds::union)
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// How a selection was made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Provenance {
    /// Exact GEOID match.
    FixedGeoid { geoid: String },
    /// Exact state + county FIPS match.
    FixedCounty { state_fips: String, county_fips: String },
    /// Uniform draw over the whole collection.
    Random,
    /// Uniform region draw, then uniform draw within that region.
    RandomState { state_fips: String },
}

/// The chosen county and how it was chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub feature: Feature,
    pub provenance: Provenance,
    /// State name shown to the user; the region table's name for two-stage draws.
    pub state_display: String,
}

impl Selection {
    pub fn new(feature: Feature, provenance: Provenance) -> Self {
        let state_display = feature.state_name.clone();
        Self {
            feature,
            provenance,
            state_display,
        }
    }

    /// Map title for this selection.
    pub fn title(&self) -> String {
        let county = &self.feature.name;
        let state = &self.state_display;
        match self.provenance {
            Provenance::FixedGeoid { .. } | Provenance::FixedCounty { .. } => {
                format!("{state} Counties with {county} Highlighted")
            }
            Provenance::Random => format!("{county}, {state}"),
            Provenance::RandomState { .. } => {
                format!("Random County from {state} - {county} Highlighted")
            }
        }
    }
}
