//! Result projector — raw trial record plus optional origin → summary view.
//!
//! Deterministic and pure: the same record and origin always produce the
//! same projection. Distance is computed only for sites with coordinates;
//! when the origin ZIP is unresolvable every distance is `None` and callers
//! sort those entries last.

use trialscout_core::trial::{ClosestSite, FullTrial, SlimTrial, TrialRecord, TrialSite};
use trialscout_geo::{distance_miles, LatLon};

/// The site closest to the origin, with its distance when computable.
///
/// Falls back to the first listed site (distance `None`) when no origin is
/// available or no site has coordinates.
fn closest_site(record: &TrialRecord, origin: Option<LatLon>) -> Option<(&TrialSite, Option<f64>)> {
    if let Some(origin) = origin {
        let nearest = record
            .sites
            .iter()
            .filter_map(|site| {
                let (lat, lon) = (site.latitude?, site.longitude?);
                Some((site, distance_miles(origin, LatLon::new(lat, lon))))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        if let Some((site, distance)) = nearest {
            return Some((site, Some(round_tenth(distance))));
        }
    }

    record.sites.first().map(|site| (site, None))
}

fn round_tenth(miles: f64) -> f64 {
    (miles * 10.0).round() / 10.0
}

/// Project a record to the slim view used in search results.
pub fn project_slim(record: &TrialRecord, portal_url: String, origin: Option<LatLon>) -> SlimTrial {
    let closest = closest_site(record, origin);

    SlimTrial {
        id: record.id.clone(),
        name: record.name.clone(),
        nct_id: record.nct_id.clone(),
        phases: record.phases.clone(),
        closest_city: closest.map(|(site, _)| site.city.clone()),
        closest_state: closest.map(|(site, _)| site.state.clone()),
        distance_miles: closest.and_then(|(_, d)| d),
        portal_url,
    }
}

/// Project a record to the full view used by detail lookups.
pub fn project_full(
    record: &TrialRecord,
    portal_url: String,
    registry_url: Option<String>,
    origin: Option<LatLon>,
) -> FullTrial {
    let closest = closest_site(record, origin).map(|(site, distance)| ClosestSite {
        name: site.name.clone(),
        city: site.city.clone(),
        state: site.state.clone(),
        distance_miles: distance,
        phone: site.phone.clone(),
    });

    FullTrial {
        id: record.id.clone(),
        name: record.name.clone(),
        title: record.title.clone(),
        nct_id: record.nct_id.clone(),
        phases: record.phases.clone(),
        cancer_types: record.cancer_types.clone(),
        location_count: record.sites.len(),
        closest_location: closest,
        locations: record.sites.clone(),
        portal_url,
        registry_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trialscout_geo::lookup;

    fn site(name: &str, city: &str, lat: Option<f64>, lon: Option<f64>) -> TrialSite {
        TrialSite {
            name: name.into(),
            city: city.into(),
            state: "TN".into(),
            latitude: lat,
            longitude: lon,
            phone: Some("615-555-0100".into()),
        }
    }

    fn record(sites: Vec<TrialSite>) -> TrialRecord {
        TrialRecord {
            id: "BRE-430-001".into(),
            name: "S2206".into(),
            title: "A Randomized Trial".into(),
            nct_id: Some("NCT04379596".into()),
            phases: vec!["Phase 3".into()],
            cancer_types: vec!["Breast".into()],
            sites,
        }
    }

    #[test]
    fn picks_nearest_site_by_distance() {
        let record = record(vec![
            site("Chicago Site", "Chicago", Some(41.88), Some(-87.63)),
            site("Nashville Site", "Nashville", Some(36.1420), Some(-86.8027)),
        ]);
        let origin = lookup("37203");

        let slim = project_slim(&record, "https://example.org/study/BRE-430-001".into(), origin);
        assert_eq!(slim.closest_city.as_deref(), Some("Nashville"));
        // Vanderbilt is about a mile from 37203
        assert!(slim.distance_miles.unwrap() < 5.0);
    }

    #[test]
    fn no_origin_falls_back_to_first_site() {
        let record = record(vec![
            site("First", "Memphis", Some(35.15), Some(-90.05)),
            site("Second", "Nashville", Some(36.14), Some(-86.80)),
        ]);

        let slim = project_slim(&record, "url".into(), None);
        assert_eq!(slim.closest_city.as_deref(), Some("Memphis"));
        assert!(slim.distance_miles.is_none());
    }

    #[test]
    fn sites_without_coordinates_fall_back_without_distance() {
        let record = record(vec![site("No Coords", "Somewhere", None, None)]);
        let slim = project_slim(&record, "url".into(), lookup("37203"));
        assert_eq!(slim.closest_city.as_deref(), Some("Somewhere"));
        assert!(slim.distance_miles.is_none());
    }

    #[test]
    fn no_sites_projects_empty_closest() {
        let record = record(vec![]);
        let full = project_full(&record, "url".into(), None, lookup("37203"));
        assert!(full.closest_location.is_none());
        assert_eq!(full.location_count, 0);
    }

    #[test]
    fn full_projection_carries_links_and_counts() {
        let record = record(vec![site("Vanderbilt", "Nashville", Some(36.14), Some(-86.80))]);
        let full = project_full(
            &record,
            "https://example.org/study/BRE-430-001".into(),
            Some("https://clinicaltrials.gov/study/NCT04379596".into()),
            lookup("37203"),
        );
        assert_eq!(full.location_count, 1);
        assert_eq!(
            full.registry_url.as_deref(),
            Some("https://clinicaltrials.gov/study/NCT04379596")
        );
        let closest = full.closest_location.unwrap();
        assert_eq!(closest.name, "Vanderbilt");
        assert_eq!(closest.phone.as_deref(), Some("615-555-0100"));
    }

    #[test]
    fn projection_is_deterministic() {
        let record = record(vec![site("A", "Nashville", Some(36.14), Some(-86.80))]);
        let origin = lookup("37203");
        let a = project_slim(&record, "url".into(), origin);
        let b = project_slim(&record, "url".into(), origin);
        assert_eq!(a, b);
    }
}
