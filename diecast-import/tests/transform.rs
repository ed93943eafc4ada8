use std::collections::BTreeMap;

use diecast_catalog::types::{Description, RawPage, RawRow};
use diecast_import::transform::*;

fn row(toy: &str, year: &str) -> RawRow {
    RawRow {
        toy_number: Some(toy.to_string()),
        year: Some(year.to_string()),
        ..Default::default()
    }
}

fn page(name: Option<&str>, rows: Vec<RawRow>) -> RawPage {
    let mut metadata = BTreeMap::new();
    if let Some(name) = name {
        metadata.insert("name".to_string(), name.to_string());
    }
    RawPage {
        metadata,
        description: Description::english("A hot rod."),
        releases: rows,
        source_file: None,
    }
}

#[test]
fn year_is_first_four_digit_token() {
    assert_eq!(extract_year("2019"), Some(2019));
    assert_eq!(extract_year("1995 (Mainline)"), Some(1995));
    assert_eq!(extract_year("Released 2003, reissued 2010"), Some(2003));
    assert_eq!(extract_year("n/a"), None);
    assert_eq!(extract_year("1850"), None);
}

#[test]
fn base_splits_on_slash() {
    assert_eq!(
        split_base("Black / Metal"),
        ("Black".to_string(), "Metal".to_string())
    );
    assert_eq!(
        split_base("Chrome/Plastic"),
        ("Chrome".to_string(), "Plastic".to_string())
    );
}

#[test]
fn base_type_defaults_to_plastic() {
    assert_eq!(
        split_base("Unpainted"),
        ("Unpainted".to_string(), DEFAULT_BASE_TYPE.to_string())
    );
    assert_eq!(
        split_base("Black / "),
        ("Black".to_string(), DEFAULT_BASE_TYPE.to_string())
    );
}

#[test]
fn series_index_is_anchored_at_end() {
    let label = split_series("Treasure Hunts 3/10");
    assert_eq!(label.name, "Treasure Hunts");
    assert_eq!(label.index, Some(3));
    assert_eq!(label.total, Some(10));

    let label = split_series("Since '68 1/8 Edition");
    assert_eq!(label.name, "Since '68 1/8 Edition");
    assert_eq!(label.index, None);
}

#[test]
fn series_empty_parens_are_removed() {
    let label = split_series("HW Flames () 5/10");
    assert_eq!(label.name, "HW Flames");
    assert_eq!(label.index, Some(5));
}

#[test]
fn wheel_types_split_on_every_separator() {
    let wheels = split_wheel_types("5SP, PR5 and OH5/MC5");
    let values: Vec<_> = wheels.values().map(String::as_str).collect();
    assert_eq!(values, ["5SP", "PR5", "OH5", "MC5"]);
    assert_eq!(wheels.keys().next().map(String::as_str), Some("0"));
}

#[test]
fn single_wheel_type_uses_position_zero() {
    let wheels = split_wheel_types("10SP");
    assert_eq!(wheels.len(), 1);
    assert_eq!(wheels["0"], "10SP");
    assert!(split_wheel_types("").is_empty());
}

#[test]
fn photos_become_positional_map() {
    let images = image_map("https://a/1.jpg https://a/2.jpg");
    assert_eq!(images["0"], "https://a/1.jpg");
    assert_eq!(images["1"], "https://a/2.jpg");
    assert!(image_map("").is_empty());
}

#[test]
fn full_row_becomes_release() {
    let raw = RawRow {
        toy_number: Some(" FYB12 ".into()),
        year: Some("2019".into()),
        series: Some("HW Flames 3/10".into()),
        color: Some("Red".into()),
        tampo: Some("Flames".into()),
        base: Some("Black / Metal".into()),
        window_color: Some("Clear".into()),
        interior_color: Some("Black".into()),
        wheel_type: Some("5SP / PR5".into()),
        country: Some("Malaysia".into()),
        notes: Some("".into()),
        photo: Some("https://img/fyb12.jpg".into()),
        malformed: None,
    };
    let out = transform_row(&raw, "bone-shaker").unwrap();

    assert_eq!(out.file_stem, "fyb12-bone-shaker");
    assert_eq!(out.release.release_id, "fyb12-bone-shaker-2019");
    assert_eq!(out.release.toy_number, "FYB12");
    assert_eq!(out.release.year, 2019);
    assert_eq!(out.release.series_id.as_deref(), Some("hw-flames"));
    assert_eq!(out.release.series_index, Some(3));
    assert_eq!(out.release.specs.base_color, "Black");
    assert_eq!(out.release.specs.base_type, "Metal");
    assert_eq!(out.release.specs.wheel_type["1"], "PR5");
    assert_eq!(out.release.country, "Malaysia");
    assert_eq!(out.release.images["0"], "https://img/fyb12.jpg");

    let series = out.series.unwrap();
    assert_eq!(series.series_id, "hw-flames");
    assert_eq!(series.name, "HW Flames");
    assert_eq!(series.year, 2019);
    assert_eq!(series.index, Some(3));
}

#[test]
fn row_without_series_has_no_membership() {
    let out = transform_row(&row("GHD01", "2020"), "twin-mill").unwrap();
    assert!(out.series.is_none());
    assert!(out.release.series_id.is_none());
    assert_eq!(out.release.specs.base_type, DEFAULT_BASE_TYPE);
}

#[test]
fn missing_required_fields_skip_the_row() {
    assert_eq!(
        transform_row(&row("  ", "2019"), "x"),
        Err(RowSkip::MissingToyNumber)
    );
    assert_eq!(
        transform_row(&RawRow::default(), "x"),
        Err(RowSkip::MissingToyNumber)
    );
    assert_eq!(
        transform_row(&row("FYB12", "unknown"), "x"),
        Err(RowSkip::MissingYear("unknown".into()))
    );
}

#[test]
fn casting_draft_resolves_manufacturer() {
    let mut raw = page(Some("'67 Camaro"), vec![]);
    raw.metadata.insert("Designer".into(), "Larry Wood".into());
    raw.metadata.insert("image_url".into(), "https://img/camaro.jpg".into());
    let draft = casting_draft(&raw);

    assert_eq!(draft.casting_id, "67-camaro");
    assert_eq!(draft.name, "'67 Camaro");
    assert_eq!(draft.designer, "Larry Wood");
    assert_eq!(draft.manufacturer, "Chevrolet");
    assert_eq!(draft.brand_id, "chevrolet");
    assert_eq!(draft.image_url.as_deref(), Some("https://img/camaro.jpg"));
    assert_eq!(draft.description.en_us, "A hot rod.");
}

#[test]
fn casting_draft_defaults() {
    let draft = casting_draft(&page(None, vec![]));
    assert_eq!(draft.name, UNKNOWN_MODEL);
    assert_eq!(draft.casting_id, "unknown-model");
    assert_eq!(draft.designer, "Unknown");
    assert_eq!(draft.manufacturer, "Mattel");
    assert!(draft.image_url.is_none());
}

#[test]
fn page_collects_kept_and_skipped_rows() {
    let raw = page(
        Some("Ferrari F40"),
        vec![row("A1", "1989"), row("", "1990"), row("A3", "?")],
    );
    let batch = transform_page(&raw, "f40.json");

    assert_eq!(batch.source, "f40.json");
    assert_eq!(batch.casting.brand_id, "ferrari");
    assert_eq!(batch.rows.len(), 1);
    assert_eq!(batch.rows[0].release.casting_id, "ferrari-f40");
    assert_eq!(
        batch.skipped,
        vec![
            SkippedRow {
                position: 1,
                reason: RowSkip::MissingToyNumber
            },
            SkippedRow {
                position: 2,
                reason: RowSkip::MissingYear("?".into())
            },
        ]
    );
}
