//! county_spotlight
//!
//! A small Rust library for fetching U.S. county boundaries from the Census
//! **TIGERweb** feature service, picking a county, and rendering a map that highlights
//! it. Pairs with the `countypick` CLI.
//!
//! ### Features
//! - Query counties nation-wide, per state, or by GEOID (GeoJSON output, automatic paging)
//! - Strictly validated decoding into a fixed county record, CRS pinned to EPSG:4326
//! - Selection by GEOID, by state/county FIPS, uniformly at random, or random
//!   state-then-county, with an injectable random source
//! - SVG/PNG maps with the selected county emphasized
//! - CSV/JSON export of the decoded attribute table
//!
//! ### Example
//! ```no_run
//! use county_spotlight::{Client, Mode, Target, pipeline, viz::RenderOptions};
//!
//! let client = Client::default();
//! let mode = Mode::Fixed(Target::Geoid("06109".into()));
//! let job = pipeline::run(&client, &mode, &mut rand::rng())?;
//! println!("{}", job.title());
//! job.render("tuolumne.svg", &RenderOptions::default())?;
//! # Ok::<(), county_spotlight::Error>(())
//! ```

pub mod api;
pub mod decode;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod regions;
pub mod select;
pub mod storage;
pub mod viz;

pub use api::{Client, CountySource, OutFields, Query};
pub use error::{Error, Result};
pub use models::{Crs, Feature, FeatureCollection, Geometry, Provenance, Selection};
pub use pipeline::{MapJob, Mode, Target};
