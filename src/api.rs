//! Synchronous client for the **Census TIGERweb** county feature query service.
//!
//! This module targets the ArcGIS `MapServer/<layer>/query` endpoint with `f=geojson`
//! and returns decoded `models::FeatureCollection`s. Truncated result sets are paged
//! automatically.
//!
//! ### Notes
//! - Only HTTP 200 is accepted; any other status fails with `Error::Fetch` and the body
//!   is discarded.
//! - No retries are attempted; the transport's default timeout applies.
//! - Filter values are validated FIPS codes, never free text, so the `where` expression
//!   cannot be altered by caller input.
//!
//! Typical usage:
//! ```no_run
//! # use county_spotlight::{Client, Query, CountySource};
//! let client = Client::default();
//! let california = client.fetch_collection(&Query::state("06")?)?;
//! # Ok::<(), county_spotlight::Error>(())
//! ```

use crate::decode::{self, GEOID_RE, STATE_RE};
use crate::error::{Error, Result};
use crate::models::{Feature, FeatureCollection};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;

/// County layer of the 2020 census TIGERweb map service.
pub const DEFAULT_BASE_URL: &str = "https://tigerweb.geo.census.gov/arcgis/rest/services/TIGERweb/tigerWMS_Census2020/MapServer/82/query";

/// Attributes requested when the whole property table is not needed.
pub const ATTRIBUTE_FIELDS: [&str; 5] = ["STATE_NAME", "NAME", "GEOID", "STATE", "COUNTY"];

/// Which attributes the service should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutFields {
    /// `outFields=*`
    All,
    /// Explicit attribute names.
    Fields(Vec<String>),
}

impl OutFields {
    pub fn attributes() -> Self {
        OutFields::Fields(ATTRIBUTE_FIELDS.iter().map(|s| s.to_string()).collect())
    }

    fn to_param(&self) -> String {
        match self {
            OutFields::All => "*".into(),
            OutFields::Fields(f) => f.join(","),
        }
    }
}

/// Parameters of one feature query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub where_clause: String,
    pub out_fields: OutFields,
    pub return_geometry: bool,
}

impl Query {
    /// Every county in the layer (`1=1`).
    pub fn all() -> Self {
        Self {
            where_clause: "1=1".into(),
            out_fields: OutFields::All,
            return_geometry: true,
        }
    }

    /// Counties of one state, e.g. `Query::state("06")` → `STATE='06'`.
    pub fn state(state_fips: &str) -> Result<Self> {
        if !STATE_RE.is_match(state_fips) {
            return Err(Error::InvalidArgument(format!(
                "state FIPS code must be two digits, got {state_fips:?}"
            )));
        }
        Ok(Self {
            where_clause: format!("STATE='{state_fips}'"),
            ..Self::all()
        })
    }

    /// A single county by GEOID, e.g. `GEOID='06109'`.
    pub fn geoid(geoid: &str) -> Result<Self> {
        if !GEOID_RE.is_match(geoid) {
            return Err(Error::InvalidArgument(format!(
                "county GEOID must be five digits, got {geoid:?}"
            )));
        }
        Ok(Self {
            where_clause: format!("GEOID='{geoid}'"),
            ..Self::all()
        })
    }

    pub fn with_out_fields(mut self, out_fields: OutFields) -> Self {
        self.out_fields = out_fields;
        self
    }

    /// Ask for the attribute table only (`returnGeometry=false`).
    pub fn attributes_only(mut self) -> Self {
        self.return_geometry = false;
        self
    }

    /// Ordered `(name, value)` pairs for the request, optionally at a paging offset.
    pub fn params(&self, offset: Option<usize>) -> Vec<(&'static str, String)> {
        let mut p = vec![
            ("where", self.where_clause.clone()),
            ("outFields", self.out_fields.to_param()),
        ];
        if self.return_geometry {
            p.push(("geometryType", "esriGeometryPolygon".into()));
            p.push(("returnGeometry", "true".into()));
        } else {
            p.push(("returnGeometry", "false".into()));
        }
        if let Some(o) = offset {
            p.push(("resultOffset", o.to_string()));
        }
        p.push(("f", "geojson".into()));
        p
    }

    /// Encoded query string (without the leading `?`).
    pub fn to_query_string(&self, offset: Option<usize>) -> String {
        self.params(offset)
            .iter()
            .map(|(k, v)| format!("{}={}", k, enc(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// Keep `-`, `_`, `.` and `*` readable in URLs (field lists, `outFields=*`).
const SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, SAFE).to_string()
}

/// Anything that can answer a county query with a decoded collection.
///
/// Implemented by [`Client`] over HTTP; tests substitute fixture-backed sources.
pub trait CountySource {
    fn fetch_collection(&self, query: &Query) -> Result<FeatureCollection>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    /// Safety cap on paged requests for one query.
    pub max_pages: u32,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("county-spotlight/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self {
            base_url: base_url.into(),
            max_pages: 100,
            http,
        }
    }

    /// Full request URL for a query page.
    pub fn url_for(&self, query: &Query, offset: Option<usize>) -> String {
        format!("{}?{}", self.base_url, query.to_query_string(offset))
    }

    /// Perform one GET and return the raw body.
    ///
    /// ### Errors
    /// - `Error::Fetch` carrying the status for anything but HTTP 200
    /// - `Error::Transport` when no response arrives
    pub fn fetch_raw(&self, query: &Query, offset: Option<usize>) -> Result<String> {
        let url = self.url_for(query, offset);
        log::debug!("GET {url}");
        let resp = self.http.get(&url).send()?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Fetch {
                status: status.as_u16(),
                url,
            });
        }
        Ok(resp.text()?)
    }
}

impl CountySource for Client {
    /// Fetch and decode every page of a query.
    fn fetch_collection(&self, query: &Query) -> Result<FeatureCollection> {
        let mut features: Vec<Feature> = Vec::new();
        let mut crs = None;
        let mut page = 1u32;
        loop {
            if page > self.max_pages {
                return Err(Error::malformed(format!(
                    "page limit exceeded ({})",
                    self.max_pages
                )));
            }
            let offset = (page > 1).then_some(features.len());
            let body = self.fetch_raw(query, offset)?;
            let decoded = decode::decode_page(&body)?;
            log::info!(
                "{}: page {} returned {} feature(s)",
                query.where_clause,
                page,
                decoded.features.len()
            );

            crs.get_or_insert(decoded.crs);
            let got = decoded.features.len();
            features.extend(decoded.features);

            if !decoded.exceeded_transfer_limit {
                break;
            }
            if got == 0 {
                return Err(Error::malformed(
                    "server reported more results but returned an empty page",
                ));
            }
            page += 1;
        }
        FeatureCollection::new(features, crs.unwrap_or(crate::models::Crs::EPSG_4326))
    }
}
