//! Fixed table of region codes used by the two-stage random draw.
//!
//! 50 states, the District of Columbia, Puerto Rico and the U.S. Virgin Islands,
//! in FIPS order. The draw indexes this slice, so its order is part of the
//! reproducibility contract for seeded runs.

/// A state-level region: two-digit FIPS code and display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub fips: &'static str,
    pub name: &'static str,
}

const fn r(fips: &'static str, name: &'static str) -> Region {
    Region { fips, name }
}

pub const REGIONS: [Region; 53] = [
    r("01", "Alabama"),
    r("02", "Alaska"),
    r("04", "Arizona"),
    r("05", "Arkansas"),
    r("06", "California"),
    r("08", "Colorado"),
    r("09", "Connecticut"),
    r("10", "Delaware"),
    r("11", "District of Columbia"),
    r("12", "Florida"),
    r("13", "Georgia"),
    r("15", "Hawaii"),
    r("16", "Idaho"),
    r("17", "Illinois"),
    r("18", "Indiana"),
    r("19", "Iowa"),
    r("20", "Kansas"),
    r("21", "Kentucky"),
    r("22", "Louisiana"),
    r("23", "Maine"),
    r("24", "Maryland"),
    r("25", "Massachusetts"),
    r("26", "Michigan"),
    r("27", "Minnesota"),
    r("28", "Mississippi"),
    r("29", "Missouri"),
    r("30", "Montana"),
    r("31", "Nebraska"),
    r("32", "Nevada"),
    r("33", "New Hampshire"),
    r("34", "New Jersey"),
    r("35", "New Mexico"),
    r("36", "New York"),
    r("37", "North Carolina"),
    r("38", "North Dakota"),
    r("39", "Ohio"),
    r("40", "Oklahoma"),
    r("41", "Oregon"),
    r("42", "Pennsylvania"),
    r("44", "Rhode Island"),
    r("45", "South Carolina"),
    r("46", "South Dakota"),
    r("47", "Tennessee"),
    r("48", "Texas"),
    r("49", "Utah"),
    r("50", "Vermont"),
    r("51", "Virginia"),
    r("53", "Washington"),
    r("54", "West Virginia"),
    r("55", "Wisconsin"),
    r("56", "Wyoming"),
    r("72", "Puerto Rico"),
    r("78", "U.S. Virgin Islands"),
];

/// Look up a region by its two-digit code.
pub fn by_fips(fips: &str) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.fips == fips)
}
