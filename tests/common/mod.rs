//! Fixture payloads and a canned `CountySource` shared by the integration tests.
#![allow(dead_code)]

use county_spotlight::regions::REGIONS;
use county_spotlight::{CountySource, Error, FeatureCollection, Query, decode};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

/// California counties in FIPS order (001, 003, ... 115).
pub const CALIFORNIA: [&str; 58] = [
    "Alameda",
    "Alpine",
    "Amador",
    "Butte",
    "Calaveras",
    "Colusa",
    "Contra Costa",
    "Del Norte",
    "El Dorado",
    "Fresno",
    "Glenn",
    "Humboldt",
    "Imperial",
    "Inyo",
    "Kern",
    "Kings",
    "Lake",
    "Lassen",
    "Los Angeles",
    "Madera",
    "Marin",
    "Mariposa",
    "Mendocino",
    "Merced",
    "Modoc",
    "Mono",
    "Monterey",
    "Napa",
    "Nevada",
    "Orange",
    "Placer",
    "Plumas",
    "Riverside",
    "Sacramento",
    "San Benito",
    "San Bernardino",
    "San Diego",
    "San Francisco",
    "San Joaquin",
    "San Luis Obispo",
    "San Mateo",
    "Santa Barbara",
    "Santa Clara",
    "Santa Cruz",
    "Shasta",
    "Sierra",
    "Siskiyou",
    "Solano",
    "Sonoma",
    "Stanislaus",
    "Sutter",
    "Tehama",
    "Trinity",
    "Tulare",
    "Tuolumne",
    "Ventura",
    "Yolo",
    "Yuba",
];

/// A small square polygon with its south-west corner at (lon, lat).
pub fn square(lon: f64, lat: f64, size: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [lon, lat],
            [lon + size, lat],
            [lon + size, lat + size],
            [lon, lat + size],
            [lon, lat]
        ]]
    })
}

pub fn feature(state_name: &str, name: &str, geoid: &str, geometry: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "STATE_NAME": state_name,
            "NAME": name,
            "GEOID": geoid,
            "STATE": &geoid[..2],
            "COUNTY": &geoid[2..],
        }
    })
}

pub fn collection(features: Vec<Value>) -> String {
    json!({"type": "FeatureCollection", "features": features}).to_string()
}

/// `STATE='06'` response: 58 counties on a grid of 0.4° squares.
pub fn california_body() -> String {
    let features = CALIFORNIA
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let geoid = format!("06{:03}", 2 * i + 1);
            let lon = -124.0 + (i % 8) as f64 * 0.5;
            let lat = 33.0 + (i / 8) as f64 * 0.5;
            feature("California", name, &geoid, square(lon, lat, 0.4))
        })
        .collect();
    collection(features)
}

/// `1=1` attribute-only response: 3143 counties across the 50 states and DC.
pub fn national_body() -> String {
    let states: Vec<_> = REGIONS.iter().filter(|r| r.fips < "60").collect();
    assert_eq!(states.len(), 51);
    let mut features = Vec::with_capacity(3143);
    for (si, region) in states.iter().enumerate() {
        let n = if si < 32 { 62 } else { 61 };
        for c in 0..n {
            let geoid = format!("{}{:03}", region.fips, 2 * c + 1);
            features.push(feature(
                region.name,
                &format!("County {}", 2 * c + 1),
                &geoid,
                Value::Null,
            ));
        }
    }
    assert_eq!(features.len(), 3143);
    collection(features)
}

/// One county with geometry, as returned for `GEOID='<id>'`.
pub fn single_body(state_name: &str, name: &str, geoid: &str) -> String {
    collection(vec![feature(state_name, name, geoid, square(-100.0, 40.0, 0.5))])
}

/// Canned reply for one `where` expression.
#[derive(Clone, Debug)]
pub enum Reply {
    Body(String),
    Status(u16),
}

/// In-memory `CountySource` keyed by the query's `where` expression.
#[derive(Default)]
pub struct FixtureSource {
    replies: HashMap<String, Reply>,
    /// Fallback for queries without a specific reply.
    fallback: Option<Reply>,
    pub calls: RefCell<Vec<Query>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, where_clause: &str, reply: Reply) -> Self {
        self.replies.insert(where_clause.to_string(), reply);
        self
    }

    pub fn fallback(mut self, reply: Reply) -> Self {
        self.fallback = Some(reply);
        self
    }
}

impl CountySource for FixtureSource {
    fn fetch_collection(&self, query: &Query) -> county_spotlight::Result<FeatureCollection> {
        self.calls.borrow_mut().push(query.clone());
        let reply = self
            .replies
            .get(&query.where_clause)
            .or(self.fallback.as_ref())
            .unwrap_or_else(|| panic!("no fixture for {}", query.where_clause));
        match reply {
            Reply::Body(body) => decode::decode(body),
            Reply::Status(status) => Err(Error::Fetch {
                status: *status,
                url: format!("fixture://{}", query.where_clause),
            }),
        }
    }
}
