//! Manufacturer resolution from casting display names.
//!
//! Casting names often open with a model year, a slogan or a generation
//! qualifier ("'67 Camaro", "Custom '69 Chevy") rather than the automaker,
//! so known model names are checked before the manufacturer catalog.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Returned when no real automaker can be identified: the toy publisher.
pub const FALLBACK_MANUFACTURER: &str = "Mattel";

/// Model names that identify their manufacturer on their own.
pub const MODEL_MANUFACTURERS: &[(&str, &str)] = &[
    ("Corvette", "Chevrolet"),
    ("Chevelle", "Chevrolet"),
    ("Chevy", "Chevrolet"),
    ("Mustang", "Ford"),
    ("Camaro", "Chevrolet"),
    ("Challenger", "Dodge"),
    ("Charger", "Dodge"),
    ("Impala", "Chevrolet"),
    ("Viper", "Dodge"),
    ("Lancer", "Mitsubishi"),
    ("Escort", "Ford"),
    ("Ram", "Dodge"),
];

/// Real manufacturers, in match priority order.
pub const MANUFACTURERS: &[&str] = &[
    "Acura",
    "Alfa Romeo",
    "Aston Martin",
    "Audi",
    "Bentley",
    "BMW",
    "Bugatti",
    "Buick",
    "Cadillac",
    "Citroen",
    "Chevrolet",
    "Chevy",
    "Datsun",
    "Dodge",
    "Ducati",
    "Ferrari",
    "Fiat",
    "Ford",
    "GMC",
    "Honda",
    "Jaguar",
    "Jeep",
    "Kia",
    "Koenigsegg",
    "Lamborghini",
    "Lancia",
    "Land Rover",
    "Lincoln",
    "Lotus",
    "Maserati",
    "Mercedes",
    "Mercury",
    "Mazda",
    "McLaren",
    "Mini",
    "Mitsubishi",
    "Nissan",
    "Pagani",
    "Peugeot",
    "Plymouth",
    "Pontiac",
    "Porsche",
    "Range Rover",
    "Renault",
    "Rimac",
    "Shelby",
    "Subaru",
    "Tesla",
    "Toyota",
    "Volvo",
    "Volkswagen",
];

static MODEL_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    MODEL_MANUFACTURERS
        .iter()
        .map(|(model, manufacturer)| {
            let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(model)))
                .case_insensitive(true)
                .build()
                .expect("valid regex");
            (pattern, *manufacturer)
        })
        .collect()
});

/// Resolve the manufacturer display name for a casting.
///
/// First match wins:
/// 1. a known model name anywhere in `casting_name` (whole word),
/// 2. the first word equal to a catalog manufacturer,
/// 3. a catalog manufacturer anywhere in the name,
/// 4. [`FALLBACK_MANUFACTURER`].
///
/// All comparisons ignore case. The function is total and deterministic.
pub fn resolve_manufacturer(casting_name: &str) -> &'static str {
    for (pattern, manufacturer) in MODEL_PATTERNS.iter() {
        if pattern.is_match(casting_name) {
            return *manufacturer;
        }
    }

    let first_word = casting_name.split_whitespace().next().unwrap_or_default();
    if let Some(manufacturer) = MANUFACTURERS
        .iter()
        .find(|m| m.eq_ignore_ascii_case(first_word))
    {
        return *manufacturer;
    }

    let lowered = casting_name.to_lowercase();
    MANUFACTURERS
        .iter()
        .find(|m| lowered.contains(&m.to_lowercase()))
        .copied()
        .unwrap_or(FALLBACK_MANUFACTURER)
}
