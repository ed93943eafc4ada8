//! Folding fresh series data into what is already on disk.

use std::collections::{BTreeMap, BTreeSet};

use diecast_catalog::types::{Series, SeriesReleases};

/// Merge a freshly computed series into the persisted one.
///
/// - Release references are unioned per year; nothing already recorded is
///   dropped.
/// - `total_releases` becomes the largest of the fresh count, the persisted
///   count plus the references that are new to it, and the number of
///   distinct references after the union. `max_index` is the larger of the
///   two. Neither counter can go down.
/// - The persisted name wins when it is non-empty.
///
/// A consolidated (per sub-series) record keeps its shape; fresh references
/// are filed under the fresh series' own id.
pub fn merge_series(existing: Option<Series>, fresh: Series) -> Series {
    let Some(existing) = existing else {
        return fresh;
    };

    let fresh_years = fresh.releases.per_year();
    let net_new = fresh_years
        .iter()
        .flat_map(|(year, refs)| refs.iter().map(move |r| (year, r)))
        .filter(|(year, reference)| !existing.releases.contains(year, reference))
        .count();

    let releases = match existing.releases {
        SeriesReleases::BySubSeries(mut years) => {
            for (year, refs) in fresh_years {
                years
                    .entry(year)
                    .or_default()
                    .entry(fresh.series_id.clone())
                    .or_default()
                    .extend(refs);
            }
            SeriesReleases::BySubSeries(years)
        }
        other => {
            let mut years = other.per_year();
            union_years(&mut years, fresh_years);
            SeriesReleases::ByYear(years)
        }
    };

    let distinct = releases.distinct_count();
    let total_releases = fresh
        .total_releases
        .max(existing.total_releases.saturating_add(net_new as u32))
        .max(distinct as u32);

    Series {
        series_id: fresh.series_id,
        name: if existing.name.trim().is_empty() {
            fresh.name
        } else {
            existing.name
        },
        total_releases,
        max_index: existing.max_index.max(fresh.max_index),
        releases,
    }
}

pub(crate) fn union_years(
    into: &mut BTreeMap<String, BTreeSet<String>>,
    from: BTreeMap<String, BTreeSet<String>>,
) {
    for (year, refs) in from {
        into.entry(year).or_default().extend(refs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(name: &str, total: u32, max_index: u32, years: &[(&str, &[&str])]) -> Series {
        Series {
            series_id: "hw-flames".into(),
            name: name.into(),
            total_releases: total,
            max_index,
            releases: SeriesReleases::ByYear(
                years
                    .iter()
                    .map(|(y, refs)| (y.to_string(), refs.iter().map(|r| r.to_string()).collect()))
                    .collect(),
            ),
        }
    }

    #[test]
    fn absent_existing_returns_fresh() {
        let fresh = series("HW Flames", 1, 3, &[("2019", &["a"])]);
        assert_eq!(merge_series(None, fresh.clone()), fresh);
    }

    #[test]
    fn counters_never_regress() {
        let existing = series("HW Flames", 10, 9, &[("2019", &["a", "b"])]);
        let fresh = series("Hw Flames", 3, 4, &[("2019", &["b", "c"]), ("2020", &["d", "e"])]);
        let merged = merge_series(Some(existing), fresh);

        assert_eq!(merged.name, "HW Flames");
        assert_eq!(merged.max_index, 9);
        // c, d and e are new.
        assert_eq!(merged.total_releases, 13);
        assert_eq!(merged.releases.per_year()["2019"].len(), 3);
    }

    #[test]
    fn remerging_same_data_is_stable() {
        let existing = series("HW Flames", 2, 5, &[("2019", &["a", "b"])]);
        let fresh = series("HW Flames", 2, 5, &[("2019", &["a", "b"])]);
        let merged = merge_series(Some(existing.clone()), fresh);
        assert_eq!(merged, existing);
    }

    #[test]
    fn empty_persisted_name_is_replaced() {
        let existing = series("", 1, 1, &[("2019", &["a"])]);
        let fresh = series("HW Flames", 1, 1, &[("2019", &["a"])]);
        assert_eq!(merge_series(Some(existing), fresh).name, "HW Flames");
    }

    #[test]
    fn nested_record_keeps_shape() {
        let mut sub = BTreeMap::new();
        sub.insert(
            "car-culture-gulf".to_string(),
            BTreeSet::from(["a".to_string()]),
        );
        let existing = Series {
            series_id: "car-culture".into(),
            name: "Car Culture".into(),
            total_releases: 1,
            max_index: 5,
            releases: SeriesReleases::BySubSeries(BTreeMap::from([("2019".to_string(), sub)])),
        };
        let mut fresh = series("Car Culture", 1, 2, &[("2019", &["b"])]);
        fresh.series_id = "car-culture".into();

        let merged = merge_series(Some(existing), fresh);
        let SeriesReleases::BySubSeries(years) = &merged.releases else {
            panic!("shape changed: {:?}", merged.releases);
        };
        assert!(years["2019"]["car-culture"].contains("b"));
        assert_eq!(merged.total_releases, 2);
    }
}
