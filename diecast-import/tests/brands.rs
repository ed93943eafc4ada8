use std::fs;

use diecast_catalog::store::{EntityKey, Store};
use diecast_catalog::types::{Brand, Casting, Description};
use diecast_import::{ImportError, SilentProgress, name_from_ref, reassign_brands};
use tempfile::TempDir;

fn brand_key(id: &str) -> EntityKey {
    EntityKey::Brand(id.to_string())
}

fn save_brand(store: &Store, name: &str, castings: &[&str]) {
    let mut brand = Brand::new(name);
    for reference in castings {
        brand.add_casting(reference);
    }
    store.save(&brand_key(&brand.brand_id), &brand).unwrap();
}

fn save_casting(store: &Store, id: &str, name: &str, brand_id: &str) {
    let casting = Casting {
        casting_id: id.to_string(),
        name: name.to_string(),
        description: Description::default(),
        designer: "Unknown".to_string(),
        manufacturer: "Unknown".to_string(),
        brand_id: brand_id.to_string(),
        debut_year: None,
        image_url: None,
        releases: Vec::new(),
    };
    store
        .save(&EntityKey::Casting(id.to_string()), &casting)
        .unwrap();
}

fn load_brand(store: &Store, id: &str) -> Brand {
    store.load(&brand_key(id)).unwrap().unwrap()
}

const F40: &str = "data/castings/ferrari-f40.json";

#[test]
fn misfiled_casting_moves_and_rerun_is_noop() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    save_brand(&store, "Unknown", &[F40]);
    save_casting(&store, "ferrari-f40", "Ferrari F40", "unknown");

    let stats = reassign_brands(&store, &SilentProgress).unwrap();
    assert_eq!(stats.moves.len(), 1);
    assert_eq!(stats.moves[0].from, "unknown");
    assert_eq!(stats.moves[0].to, "ferrari");
    assert_eq!(stats.brands_created, 1);

    assert!(!load_brand(&store, "unknown").castings.contains(F40));
    let ferrari = load_brand(&store, "ferrari");
    assert!(ferrari.castings.contains(F40));
    assert_eq!(ferrari.name, "Ferrari");
    assert_eq!(ferrari.country, "Unknown");

    let casting: Casting = store
        .load(&EntityKey::Casting("ferrari-f40".into()))
        .unwrap()
        .unwrap();
    assert_eq!(casting.brand_id, "ferrari");
    assert_eq!(casting.manufacturer, "Ferrari");

    let again = reassign_brands(&store, &SilentProgress).unwrap();
    assert!(again.moves.is_empty());
    assert_eq!(again.brands_written, 0);
}

#[test]
fn name_falls_back_to_reference_file_name() {
    assert_eq!(
        name_from_ref("data/castings/123-lamborghini-countach.json"),
        "Lamborghini Countach"
    );
    assert_eq!(name_from_ref("data/castings/bone-shaker.json"), "Bone Shaker");

    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let reference = "data/castings/123-lamborghini-countach.json";
    save_brand(&store, "Mattel", &[reference]);

    let stats = reassign_brands(&store, &SilentProgress).unwrap();
    assert_eq!(stats.moves.len(), 1);
    assert!(load_brand(&store, "lamborghini").castings.contains(reference));
    assert!(load_brand(&store, "mattel").castings.is_empty());
}

#[test]
fn correctly_filed_castings_stay() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let reference = "data/castings/bone-shaker.json";
    save_brand(&store, "Mattel", &[reference]);
    save_casting(&store, "bone-shaker", "Bone Shaker", "mattel");
    let before = fs::read_to_string(store.path_for(&brand_key("mattel"))).unwrap();

    let stats = reassign_brands(&store, &SilentProgress).unwrap();
    assert_eq!(stats.castings_checked, 1);
    assert!(stats.moves.is_empty());
    let after = fs::read_to_string(store.path_for(&brand_key("mattel"))).unwrap();
    assert_eq!(before, after);
}

#[test]
fn existing_target_brand_keeps_attributes() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    let mut ferrari = Brand::new("Ferrari");
    ferrari.country = "Italy".into();
    ferrari.founded_year = Some(1939);
    store.save(&brand_key("ferrari"), &ferrari).unwrap();
    save_brand(&store, "Unknown", &[F40]);
    save_casting(&store, "ferrari-f40", "Ferrari F40", "unknown");

    let stats = reassign_brands(&store, &SilentProgress).unwrap();
    assert_eq!(stats.brands_created, 0);

    let ferrari = load_brand(&store, "ferrari");
    assert_eq!(ferrari.country, "Italy");
    assert_eq!(ferrari.founded_year, Some(1939));
    assert!(ferrari.castings.contains(F40));
}

#[test]
fn unreadable_brand_is_skipped() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path());
    save_brand(&store, "Unknown", &[F40]);
    fs::write(store.path_for(&brand_key("broken")), "[1, 2").unwrap();

    let stats = reassign_brands(&store, &SilentProgress).unwrap();
    assert_eq!(stats.brands_unreadable, 1);
    assert_eq!(stats.moves.len(), 1);
    assert_eq!(
        fs::read_to_string(store.path_for(&brand_key("broken"))).unwrap(),
        "[1, 2"
    );
}

#[test]
fn missing_data_root_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let store = Store::new(tmp.path().join("absent"));
    assert!(matches!(
        reassign_brands(&store, &SilentProgress),
        Err(ImportError::DataRootNotFound(_))
    ));
}
