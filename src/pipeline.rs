//! Fetch → decode → select, then render: the three ways this crate is driven.
//!
//! [`run`] does all network and selection work and returns a [`MapJob`]. Nothing is
//! drawn unless it succeeds.

use crate::api::{CountySource, OutFields, Query};
use crate::decode::COUNTY_RE;
use crate::error::{Error, Result};
use crate::models::{FeatureCollection, Selection};
use crate::select;
use crate::viz::{self, RenderOptions};
use rand::Rng;
use std::path::Path;

/// Which county to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// A known county within its state's map.
    Fixed(Target),
    /// Any county in the nation, drawn on its own.
    Random,
    /// A random state, then a random county within it.
    RandomState,
}

/// Fixed selection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Geoid(String),
    County { state_fips: String, county_fips: String },
}

impl Target {
    fn state_fips(&self) -> Result<&str> {
        match self {
            Target::Geoid(g) => {
                // Validates the GEOID before any request is made.
                Query::geoid(g)?;
                Ok(&g[..2])
            }
            Target::County {
                state_fips,
                county_fips,
            } => {
                if !COUNTY_RE.is_match(county_fips) {
                    return Err(Error::InvalidArgument(format!(
                        "county code must be three digits, got {county_fips:?}"
                    )));
                }
                Ok(state_fips.as_str())
            }
        }
    }
}

/// Everything needed to draw one map.
#[derive(Debug, Clone)]
pub struct MapJob {
    /// Features drawn as context.
    pub collection: FeatureCollection,
    pub selection: Selection,
}

impl MapJob {
    pub fn title(&self) -> String {
        self.selection.title()
    }

    pub fn render<P: AsRef<Path>>(&self, out_path: P, options: &RenderOptions) -> Result<()> {
        viz::render_map(&self.collection, &self.selection, out_path, options)
    }
}

/// Fetch, decode and select for `mode`.
pub fn run<S, R>(source: &S, mode: &Mode, rng: &mut R) -> Result<MapJob>
where
    S: CountySource + ?Sized,
    R: Rng + ?Sized,
{
    match mode {
        Mode::Fixed(target) => {
            let collection = source.fetch_collection(&Query::state(target.state_fips()?)?)?;
            let selection = match target {
                Target::Geoid(g) => select::by_geoid(&collection, g)?,
                Target::County {
                    state_fips,
                    county_fips,
                } => select::by_county_fips(&collection, state_fips, county_fips)?,
            };
            Ok(MapJob {
                collection,
                selection,
            })
        }
        Mode::Random => {
            let table = source.fetch_collection(
                &Query::all()
                    .with_out_fields(OutFields::attributes())
                    .attributes_only(),
            )?;
            log::info!("nation-wide table has {} counties", table.len());
            let picked = select::random(&table, rng)?;

            // Second request for the boundary of the chosen county only.
            let geoid = picked.feature.geoid.clone();
            let collection = source.fetch_collection(
                &Query::geoid(&geoid)?.with_out_fields(OutFields::attributes()),
            )?;
            let with_geometry = collection
                .iter()
                .find(|f| f.geoid == geoid)
                .ok_or_else(|| Error::NotFound(format!("no boundary returned for GEOID {geoid}")))?
                .clone();
            Ok(MapJob {
                collection,
                selection: Selection {
                    feature: with_geometry,
                    ..picked
                },
            })
        }
        Mode::RandomState => {
            let (collection, selection) = select::random_state(source, rng)?;
            Ok(MapJob {
                collection,
                selection,
            })
        }
    }
}

/// [`run`] then [`MapJob::render`]; returns the selection that was drawn.
pub fn execute<S, R, P>(
    source: &S,
    mode: &Mode,
    rng: &mut R,
    out_path: P,
    options: &RenderOptions,
) -> Result<Selection>
where
    S: CountySource + ?Sized,
    R: Rng + ?Sized,
    P: AsRef<Path>,
{
    let job = run(source, mode, rng)?;
    job.render(out_path, options)?;
    Ok(job.selection)
}
