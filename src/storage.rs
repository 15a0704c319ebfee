use crate::error::Result;
use crate::models::FeatureCollection;
use csv::WriterBuilder;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix text cells that a spreadsheet would evaluate as a formula.
fn safe_cell(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Save the county attribute table as CSV with header (geometry is not exported).
pub fn save_csv<P: AsRef<Path>>(collection: &FeatureCollection, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("geoid", "state_fips", "county_fips", "state_name", "name"))?;
    for f in collection {
        wtr.serialize((
            &f.geoid,
            &f.state_fips,
            &f.county_fips,
            safe_cell(&f.state_name),
            safe_cell(&f.name),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the county attribute table as a pretty JSON array.
pub fn save_json<P: AsRef<Path>>(collection: &FeatureCollection, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(collection.features())?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Crs, Feature};
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let fc = FeatureCollection::new(
            vec![Feature {
                geoid: "02013".into(),
                state_fips: "02".into(),
                county_fips: "013".into(),
                state_name: "Alaska".into(),
                name: "Aleutians East Borough".into(),
                geometry: None,
            }],
            Crs::EPSG_4326,
        )
        .unwrap();
        save_csv(&fc, &csvp).unwrap();
        save_json(&fc, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }
}
