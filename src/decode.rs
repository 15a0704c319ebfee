//! GeoJSON decoding for query service responses.
//!
//! The service returns a standard GeoJSON `FeatureCollection`. Properties are validated
//! into a fixed [`Feature`] record here, so later stages never deal with missing keys.
//!
//! ### Notes
//! - ArcGIS signals some failures with HTTP 200 and an `{"error": {...}}` document.
//!   That is surfaced as [`Error::Service`], never decoded as geography.
//! - Truncated pages carry `exceededTransferLimit: true`, either at the top level or
//!   under `properties` depending on the server version; both are honored.
//! - A missing `crs` member means EPSG:4326 and is assigned explicitly.

use crate::error::{Error, Result};
use crate::models::{Crs, Feature, FeatureCollection, Geometry, Position, Ring};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

pub(crate) static STATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}$").unwrap());
pub(crate) static COUNTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}$").unwrap());
pub(crate) static GEOID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}$").unwrap());

/// One decoded response page.
#[derive(Debug, Clone)]
pub struct Page {
    pub features: Vec<Feature>,
    pub crs: Crs,
    /// The server truncated this page; more features are available at a higher offset.
    pub exceeded_transfer_limit: bool,
}

/// Decode a complete response body into a collection.
///
/// ### Errors
/// - [`Error::Service`] for an ArcGIS error document
/// - [`Error::MalformedPayload`] when `features` is absent or not an array, a feature
///   lacks `properties`/`geometry`, a required property is missing, or GEOIDs repeat
pub fn decode(body: &str) -> Result<FeatureCollection> {
    let page = decode_page(body)?;
    FeatureCollection::new(page.features, page.crs)
}

/// Decode one (possibly truncated) response page.
pub fn decode_page(body: &str) -> Result<Page> {
    let v: Value = serde_json::from_str(body)
        .map_err(|e| Error::malformed(format!("invalid JSON: {e}")))?;
    let root = v
        .as_object()
        .ok_or_else(|| Error::malformed("top level is not an object"))?;

    if let Some(err) = root.get("error") {
        return Err(service_error(err));
    }

    if let Some(t) = root.get("type") {
        if t.as_str() != Some("FeatureCollection") {
            return Err(Error::malformed(format!(
                "expected type FeatureCollection, got {t}"
            )));
        }
    }

    let raw_features = root
        .get("features")
        .ok_or_else(|| Error::malformed("missing `features`"))?
        .as_array()
        .ok_or_else(|| Error::malformed("`features` is not an array"))?;

    let crs = match root.get("crs") {
        None | Some(Value::Null) => {
            log::debug!("payload carries no crs; assigning {}", Crs::EPSG_4326);
            Crs::EPSG_4326
        }
        Some(c) => parse_crs(c)?,
    };

    let features = raw_features
        .iter()
        .enumerate()
        .map(|(i, f)| parse_feature(f).map_err(|e| at_index(i, e)))
        .collect::<Result<Vec<_>>>()?;

    let exceeded_transfer_limit = flag(root.get("exceededTransferLimit"))
        || flag(
            root.get("properties")
                .and_then(|p| p.get("exceededTransferLimit")),
        );

    Ok(Page {
        features,
        crs,
        exceeded_transfer_limit,
    })
}

fn flag(v: Option<&Value>) -> bool {
    v.and_then(Value::as_bool).unwrap_or(false)
}

fn at_index(i: usize, e: Error) -> Error {
    match e {
        Error::MalformedPayload(msg) => Error::malformed(format!("feature {i}: {msg}")),
        other => other,
    }
}

fn service_error(err: &Value) -> Error {
    let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    Error::Service { code, message }
}

fn parse_crs(c: &Value) -> Result<Crs> {
    let name = c
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed(format!("unrecognised crs member: {c}")))?;
    Crs::from_name(name)
        .ok_or_else(|| Error::malformed(format!("unsupported coordinate reference system {name}")))
}

fn parse_feature(f: &Value) -> Result<Feature> {
    let obj = f
        .as_object()
        .ok_or_else(|| Error::malformed("not an object"))?;
    let props = obj
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| Error::malformed("missing `properties` object"))?;
    let geometry = match obj.get("geometry") {
        None => return Err(Error::malformed("missing `geometry`")),
        Some(Value::Null) => None,
        Some(g) => Some(parse_geometry(g)?),
    };

    let state_name = required_str(props, "STATE_NAME")?;
    let name = required_str(props, "NAME")?;
    let geoid = required_str(props, "GEOID")?;

    let state_fips = match optional_str(props, "STATE")? {
        Some(s) => checked(s, &STATE_RE, "STATE")?,
        None => derived(&geoid, 0..2, "STATE")?,
    };
    let county_fips = match optional_str(props, "COUNTY")? {
        Some(s) => checked(s, &COUNTY_RE, "COUNTY")?,
        None => derived(&geoid, 2..5, "COUNTY")?,
    };
    if geoid != format!("{state_fips}{county_fips}") {
        return Err(Error::malformed(format!(
            "GEOID {geoid} disagrees with STATE {state_fips} and COUNTY {county_fips}"
        )));
    }

    Ok(Feature {
        geoid,
        state_fips,
        county_fips,
        state_name,
        name,
        geometry,
    })
}

fn required_str(props: &Map<String, Value>, key: &str) -> Result<String> {
    match optional_str(props, key)? {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(Error::malformed(format!("property {key} is empty"))),
        None => Err(Error::malformed(format!("missing property {key}"))),
    }
}

fn optional_str(props: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match props.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(Error::malformed(format!(
            "property {key} is not a string: {other}"
        ))),
    }
}

fn checked(value: String, re: &Regex, key: &str) -> Result<String> {
    if re.is_match(&value) {
        Ok(value)
    } else {
        Err(Error::malformed(format!("property {key} has bad code {value:?}")))
    }
}

fn derived(geoid: &str, range: std::ops::Range<usize>, key: &str) -> Result<String> {
    if GEOID_RE.is_match(geoid) {
        Ok(geoid[range].to_string())
    } else {
        Err(Error::malformed(format!(
            "missing property {key} and GEOID {geoid:?} is not a 5-digit county code"
        )))
    }
}

fn parse_geometry(g: &Value) -> Result<Geometry> {
    let kind = g
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::malformed("geometry without `type`"))?;
    let coords = g
        .get("coordinates")
        .ok_or_else(|| Error::malformed("geometry without `coordinates`"))?;
    match kind {
        "Polygon" => {
            let raw: Vec<Vec<Vec<f64>>> = serde_json::from_value(coords.clone())
                .map_err(|e| Error::malformed(format!("bad Polygon coordinates: {e}")))?;
            Ok(Geometry::Polygon(polygon(raw)?))
        }
        "MultiPolygon" => {
            let raw: Vec<Vec<Vec<Vec<f64>>>> = serde_json::from_value(coords.clone())
                .map_err(|e| Error::malformed(format!("bad MultiPolygon coordinates: {e}")))?;
            let polys = raw.into_iter().map(polygon).collect::<Result<Vec<_>>>()?;
            Ok(Geometry::MultiPolygon(polys))
        }
        other => Err(Error::malformed(format!(
            "unsupported geometry type {other}"
        ))),
    }
}

fn polygon(rings: Vec<Vec<Vec<f64>>>) -> Result<Vec<Ring>> {
    rings
        .into_iter()
        .map(|ring| ring.into_iter().map(position).collect())
        .collect()
}

fn position(p: Vec<f64>) -> Result<Position> {
    match p.as_slice() {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok((*lon, *lat)),
        _ => Err(Error::malformed(format!("bad position {p:?}"))),
    }
}
