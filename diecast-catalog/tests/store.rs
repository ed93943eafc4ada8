use std::fs;

use diecast_catalog::store::{EntityKey, EntityKind, Store, StoreError};
use diecast_catalog::types::{Brand, Description, Series, SeriesReleases};
use tempfile::TempDir;

fn brand_key(id: &str) -> EntityKey {
    EntityKey::Brand(id.to_string())
}

#[test]
fn paths_follow_layout() {
    let store = Store::new("/srv/data");
    assert_eq!(
        store.path_for(&EntityKey::Casting("bone-shaker".into())),
        std::path::Path::new("/srv/data/castings/bone-shaker.json")
    );
    assert_eq!(
        store.path_for(&EntityKey::Release {
            year: 2019,
            file_stem: "fyb12-bone-shaker".into()
        }),
        std::path::Path::new("/srv/data/releases/2019/fyb12-bone-shaker.json")
    );
    assert_eq!(
        store.path_for(&EntityKey::LegacySeries {
            year: "2019".into(),
            series_id: "hw-flames".into()
        }),
        std::path::Path::new("/srv/data/series/2019/hw-flames.json")
    );
}

#[test]
fn save_creates_directories_and_loads_back() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path().join("data"));
    let brand = Brand::new("Citroen");

    store.save(&brand_key("citroen"), &brand).unwrap();
    let loaded: Brand = store.load(&brand_key("citroen")).unwrap().unwrap();
    assert_eq!(loaded, brand);
    assert!(!store.path_for(&brand_key("citroen")).with_extension("json.tmp").exists());
}

#[test]
fn written_json_is_indented_and_keeps_non_ascii() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let mut brand = Brand::new("Citroën");
    brand.brand_id = "citroen".into();

    store.save(&brand_key("citroen"), &brand).unwrap();
    let text = fs::read_to_string(store.path_for(&brand_key("citroen"))).unwrap();
    assert!(text.contains("\n    \"brand_id\": \"citroen\""));
    assert!(text.contains("Fabricante de veículos Citroën."));
    assert!(text.ends_with("}\n"));
}

#[test]
fn missing_file_loads_as_none() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let loaded: Option<Brand> = store.load(&brand_key("nope")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn malformed_file_is_parse_error_or_absent() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let path = store.path_for(&brand_key("broken"));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();

    let strict = store.load::<Brand>(&brand_key("broken"));
    assert!(matches!(strict, Err(StoreError::Parse { .. })));
    assert!(store.load_or_absent::<Brand>(&brand_key("broken")).is_none());
}

#[test]
fn save_new_refuses_to_overwrite() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let key = EntityKey::Series("car-culture".into());
    let first = Series {
        series_id: "car-culture".into(),
        name: "Car Culture".into(),
        total_releases: 4,
        max_index: 5,
        releases: SeriesReleases::default(),
    };
    let mut second = first.clone();
    second.total_releases = 99;

    assert!(store.save_new(&key, &first).unwrap());
    assert!(!store.save_new(&key, &second).unwrap());
    let loaded: Series = store.load(&key).unwrap().unwrap();
    assert_eq!(loaded.total_releases, 4);
}

#[test]
fn delete_reports_presence() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    store.save(&brand_key("ford"), &Brand::new("Ford")).unwrap();

    assert!(store.delete(&brand_key("ford")).unwrap());
    assert!(!store.delete(&brand_key("ford")).unwrap());
    assert!(!store.exists(&brand_key("ford")));
}

#[test]
fn list_ids_sorted_and_ignores_subdirectories() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    for name in ["Mazda", "Audi", "Ford"] {
        let brand = Brand::new(name);
        store.save(&brand_key(&brand.brand_id), &brand).unwrap();
    }
    fs::create_dir_all(tmp.path().join("brands/2019")).unwrap();
    fs::write(tmp.path().join("brands/notes.txt"), "x").unwrap();

    assert_eq!(
        store.list_ids(EntityKind::Brand).unwrap(),
        vec!["audi", "ford", "mazda"]
    );
    assert!(store.list_ids(EntityKind::Casting).unwrap().is_empty());
}

#[test]
fn legacy_series_keys_and_pruning() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let series_dir = tmp.path().join("series");
    fs::create_dir_all(series_dir.join("2019")).unwrap();
    fs::create_dir_all(series_dir.join("2020")).unwrap();
    fs::create_dir_all(series_dir.join("drafts")).unwrap();
    fs::write(series_dir.join("2019/hw-flames.json"), "{}").unwrap();
    fs::write(series_dir.join("top-level.json"), "{}").unwrap();

    let keys = store.legacy_series_keys().unwrap();
    assert_eq!(
        keys,
        vec![EntityKey::LegacySeries {
            year: "2019".into(),
            series_id: "hw-flames".into()
        }]
    );

    assert_eq!(store.prune_empty_legacy_dirs().unwrap(), vec!["2020"]);
    assert!(series_dir.join("2019").exists());
    assert!(series_dir.join("drafts").exists());
}

#[test]
fn brand_with_plain_string_description_loads() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let path = store.path_for(&brand_key("ford"));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"brand_id": "ford", "name": "Ford", "country": "Unknown", "founded_year": null,
            "castings": ["data/castings/ford-gt.json"], "description": "Manufacturer of Ford vehicles."}"#,
    )
    .unwrap();

    let brand: Brand = store.load(&brand_key("ford")).unwrap().unwrap();
    assert_eq!(brand.description, Description::english("Manufacturer of Ford vehicles."));
    assert!(brand.castings.contains("data/castings/ford-gt.json"));
}
