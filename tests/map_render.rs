mod common;

use common::{california_body, collection, feature, single_body};
use county_spotlight::decode::decode;
use county_spotlight::select::by_geoid;
use county_spotlight::viz::{self, RenderOptions};
use county_spotlight::{Error, Provenance, Selection};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn svg_has_title_highlight_and_no_axes() {
    let fc = decode(&california_body()).unwrap();
    let sel = by_geoid(&fc, "06109").unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ca.svg");

    viz::render_map(&fc, &sel, &out, &RenderOptions::default()).unwrap();

    let svg = fs::read_to_string(&out).unwrap();
    let lower = svg.to_lowercase();
    assert!(svg.contains("California Counties with Tuolumne Highlighted"));
    assert!(lower.contains("#add8e6"), "neutral fill present");
    assert!(lower.contains("#ff0000"), "highlight fill present");
    // 58 base polygons + 1 highlight.
    assert_eq!(svg.matches("<polygon").count(), 59);
    // The title is the only text: no tick labels.
    assert_eq!(svg.matches("<text").count(), 1);
}

#[test]
fn custom_title_and_size() {
    let fc = decode(&single_body("Hawaii", "Kalawao", "15005")).unwrap();
    let sel = Selection::new(fc.features()[0].clone(), Provenance::Random);
    let dir = tempdir().unwrap();
    let out = dir.path().join("kalawao.svg");
    let opts = RenderOptions {
        width: 640,
        height: 480,
        title: Some("Smallest county".into()),
        ..RenderOptions::default()
    };

    viz::render_map(&fc, &sel, &out, &opts).unwrap();
    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Smallest county"));
    assert!(!svg.contains("Kalawao, Hawaii"));
    assert!(svg.contains("width=\"640\""));
}

fn installed_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

#[test]
fn png_output_written() {
    let Some(font) = installed_font() else {
        eprintln!("no TrueType font installed; skipping PNG render");
        return;
    };
    let fc = decode(&california_body()).unwrap();
    let sel = by_geoid(&fc, "06003").unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ca.png");
    let opts = RenderOptions {
        font_path: Some(font),
        ..RenderOptions::default()
    };

    viz::render_map(&fc, &sel, &out, &opts).unwrap();
    let meta = fs::metadata(&out).expect("file created");
    assert!(meta.len() > 0);
}

#[test]
fn png_with_unreadable_font_fails_without_writing() {
    let fc = decode(&california_body()).unwrap();
    let sel = by_geoid(&fc, "06109").unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ca.png");
    let opts = RenderOptions {
        font_path: Some(dir.path().join("missing.ttf")),
        ..RenderOptions::default()
    };

    let e = viz::render_map(&fc, &sel, &out, &opts).unwrap_err();
    assert!(matches!(e, Error::Render(ref m) if m.contains("missing.ttf")), "{e:?}");
    assert!(!out.exists());
}

#[test]
fn png_with_non_font_file_fails_without_writing() {
    let fc = decode(&california_body()).unwrap();
    let sel = by_geoid(&fc, "06109").unwrap();
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("not-a-font.ttf");
    fs::write(&bogus, b"plain text").unwrap();
    let out = dir.path().join("ca.png");
    let opts = RenderOptions {
        font_path: Some(bogus),
        ..RenderOptions::default()
    };

    let e = viz::render_map(&fc, &sel, &out, &opts).unwrap_err();
    assert!(matches!(e, Error::Render(_)), "{e:?}");
    assert!(!out.exists());
}

#[test]
fn selection_without_geometry_is_render_error() {
    let fc = decode(&collection(vec![feature(
        "Texas",
        "Loving",
        "48301",
        json!(null),
    )]))
    .unwrap();
    let sel = Selection::new(fc.features()[0].clone(), Provenance::Random);
    let out = tempdir().unwrap().path().join("none.svg");
    let e = viz::render_map(&fc, &sel, &out, &RenderOptions::default()).unwrap_err();
    assert!(matches!(e, Error::Render(_)), "{e:?}");
}

#[test]
fn aleutians_stay_on_one_map() {
    let geom = json!({
        "type": "MultiPolygon",
        "coordinates": [
            [[[179.2, 51.3], [179.8, 51.3], [179.8, 51.6], [179.2, 51.3]]],
            [[[-178.0, 51.6], [-176.5, 51.6], [-176.5, 52.0], [-178.0, 51.6]]]
        ]
    });
    let fc = decode(&collection(vec![feature(
        "Alaska",
        "Aleutians West",
        "02016",
        geom,
    )]))
    .unwrap();
    let sel = Selection::new(fc.features()[0].clone(), Provenance::Random);
    let dir = tempdir().unwrap();
    let out = dir.path().join("aleutians.svg");
    viz::render_map(&fc, &sel, &out, &RenderOptions::default()).unwrap();
    assert!(fs::read_to_string(&out).unwrap().contains("Aleutians West, Alaska"));
}
