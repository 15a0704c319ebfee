//! Selection policies: exact identifier, uniform random, and two-stage random.
//!
//! Randomness is always injected. Callers that want reproducible picks pass a seeded
//! generator (`StdRng::seed_from_u64`); interactive use passes `rand::rng()`, which is
//! unseeded on purpose so repeated runs show different counties.
//!
//! Every draw is `rng.random_range(0..len)` over the collection in response order.

use crate::api::{CountySource, Query};
use crate::error::{Error, Result};
use crate::models::{Feature, FeatureCollection, Provenance, Selection};
use crate::regions::{REGIONS, Region};
use rand::Rng;

/// The unique feature whose GEOID equals `geoid`.
pub fn by_geoid(collection: &FeatureCollection, geoid: &str) -> Result<Selection> {
    let feature = unique(collection, |f| f.geoid == geoid)
        .ok_or_else(|| Error::NotFound(format!("no county with GEOID {geoid}")))?;
    Ok(Selection::new(
        feature.clone(),
        Provenance::FixedGeoid {
            geoid: geoid.to_string(),
        },
    ))
}

/// The unique feature with the given state and county FIPS codes.
pub fn by_county_fips(
    collection: &FeatureCollection,
    state_fips: &str,
    county_fips: &str,
) -> Result<Selection> {
    let feature = unique(collection, |f| {
        f.state_fips == state_fips && f.county_fips == county_fips
    })
    .ok_or_else(|| {
        Error::NotFound(format!(
            "no county {county_fips} in state {state_fips}"
        ))
    })?;
    Ok(Selection::new(
        feature.clone(),
        Provenance::FixedCounty {
            state_fips: state_fips.to_string(),
            county_fips: county_fips.to_string(),
        },
    ))
}

fn unique<'a>(
    collection: &'a FeatureCollection,
    pred: impl Fn(&Feature) -> bool,
) -> Option<&'a Feature> {
    let mut matches = collection.iter().filter(|f| pred(f));
    let first = matches.next()?;
    assert!(
        matches.next().is_none(),
        "identifier matched more than one feature (GEOID {})",
        first.geoid
    );
    Some(first)
}

/// One feature drawn uniformly from the whole collection.
pub fn random<R: Rng + ?Sized>(collection: &FeatureCollection, rng: &mut R) -> Result<Selection> {
    let feature = draw(collection, rng, "cannot pick a random county")?;
    Ok(Selection::new(feature.clone(), Provenance::Random))
}

/// Draw a region, fetch its counties, then draw one of them.
///
/// An empty region is an error; no second region is drawn, so a seeded run always
/// touches the same region.
pub fn random_state<S, R>(source: &S, rng: &mut R) -> Result<(FeatureCollection, Selection)>
where
    S: CountySource + ?Sized,
    R: Rng + ?Sized,
{
    let region = random_region(rng);
    log::info!("drew region {} ({})", region.name, region.fips);
    let counties = source.fetch_collection(&Query::state(region.fips)?)?;
    let feature = draw(
        &counties,
        rng,
        &format!("region {} ({}) returned no counties", region.name, region.fips),
    )?
    .clone();
    let selection = Selection {
        feature,
        provenance: Provenance::RandomState {
            state_fips: region.fips.to_string(),
        },
        state_display: region.name.to_string(),
    };
    Ok((counties, selection))
}

/// Uniform draw over the fixed region table.
pub fn random_region<R: Rng + ?Sized>(rng: &mut R) -> &'static Region {
    &REGIONS[rng.random_range(0..REGIONS.len())]
}

fn draw<'a, R: Rng + ?Sized>(
    collection: &'a FeatureCollection,
    rng: &mut R,
    context: &str,
) -> Result<&'a Feature> {
    if collection.is_empty() {
        return Err(Error::EmptyCollection(context.to_string()));
    }
    let idx = rng.random_range(0..collection.len());
    Ok(&collection.features()[idx])
}
