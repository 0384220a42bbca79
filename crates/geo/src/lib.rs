//! Geo resolver — ZIP-to-coordinate lookup and great-circle distance.
//!
//! Pure functions, no state. The lookup table covers exact ZIP codes for
//! major cancer-center metros plus a 3-digit-prefix centroid fallback for
//! the rest of the country. An unresolvable ZIP returns `None`; callers
//! then omit distance from projections and sort those entries last.

use serde::{Deserialize, Serialize};

/// A resolved geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Exact ZIP entries for major metros and cancer-center neighborhoods.
const ZIP_TABLE: &[(&str, f64, f64)] = &[
    ("02115", 42.3420, -71.1003), // Boston (Longwood)
    ("10001", 40.7506, -73.9972), // New York
    ("10065", 40.7645, -73.9626), // New York (Upper East Side)
    ("15232", 40.4520, -79.9326), // Pittsburgh (Shadyside)
    ("19104", 39.9597, -75.1983), // Philadelphia (University City)
    ("21287", 39.2970, -76.5929), // Baltimore
    ("27710", 36.0014, -78.9382), // Durham
    ("30322", 33.7925, -84.3216), // Atlanta (Emory)
    ("33136", 25.7867, -80.2110), // Miami
    ("37203", 36.1527, -86.7898), // Nashville
    ("37232", 36.1420, -86.8027), // Nashville (Vanderbilt)
    ("44195", 41.5036, -81.6207), // Cleveland
    ("48201", 42.3470, -83.0604), // Detroit
    ("53792", 43.0766, -89.4308), // Madison
    ("55905", 44.0225, -92.4668), // Rochester, MN
    ("60601", 41.8853, -87.6216), // Chicago
    ("60611", 41.8955, -87.6200), // Chicago (Streeterville)
    ("63110", 38.6212, -90.2625), // St. Louis
    ("73104", 35.4787, -97.4997), // Oklahoma City
    ("75390", 32.8135, -96.8417), // Dallas
    ("77030", 29.7070, -95.4010), // Houston (Texas Medical Center)
    ("80045", 39.7452, -104.8384), // Aurora, CO
    ("84112", 40.7649, -111.8421), // Salt Lake City
    ("85054", 33.6560, -111.9450), // Phoenix
    ("90033", 34.0619, -118.2079), // Los Angeles
    ("94143", 37.7631, -122.4586), // San Francisco (UCSF)
    ("97239", 45.4860, -122.6919), // Portland
    ("98109", 47.6320, -122.3415), // Seattle (South Lake Union)
];

/// Regional centroids keyed by the first three ZIP digits.
const PREFIX_TABLE: &[(&str, f64, f64)] = &[
    ("021", 42.34, -71.10),  // Boston
    ("100", 40.75, -73.99),  // Manhattan
    ("191", 39.95, -75.17),  // Philadelphia
    ("212", 39.29, -76.61),  // Baltimore
    ("277", 35.99, -78.90),  // Durham/Chapel Hill
    ("303", 33.75, -84.39),  // Atlanta
    ("331", 25.77, -80.21),  // Miami
    ("372", 36.16, -86.78),  // Nashville
    ("378", 35.96, -83.92),  // Knoxville
    ("381", 35.15, -90.05),  // Memphis
    ("402", 38.25, -85.76),  // Louisville
    ("441", 41.50, -81.69),  // Cleveland
    ("432", 39.96, -83.00),  // Columbus
    ("482", 42.33, -83.05),  // Detroit
    ("537", 43.07, -89.40),  // Madison
    ("551", 44.95, -93.09),  // St. Paul
    ("559", 44.02, -92.47),  // Rochester, MN
    ("606", 41.88, -87.63),  // Chicago
    ("631", 38.63, -90.20),  // St. Louis
    ("641", 39.10, -94.58),  // Kansas City
    ("731", 35.47, -97.52),  // Oklahoma City
    ("752", 32.78, -96.80),  // Dallas
    ("770", 29.76, -95.37),  // Houston
    ("782", 29.42, -98.49),  // San Antonio
    ("800", 39.74, -104.99), // Denver
    ("841", 40.76, -111.89), // Salt Lake City
    ("850", 33.45, -112.07), // Phoenix
    ("871", 35.08, -106.65), // Albuquerque
    ("900", 34.05, -118.24), // Los Angeles
    ("921", 32.72, -117.16), // San Diego
    ("941", 37.77, -122.42), // San Francisco
    ("945", 37.80, -122.27), // Oakland
    ("951", 37.34, -121.89), // San Jose
    ("972", 45.52, -122.68), // Portland
    ("981", 47.61, -122.33), // Seattle
];

/// Resolve a postal code to coordinates.
///
/// Exact match first, then the 3-digit-prefix centroid. Inputs shorter than
/// five digits or containing non-digits resolve to `None`.
pub fn lookup(zip: &str) -> Option<LatLon> {
    let zip = zip.trim();
    if zip.len() < 5 || !zip.chars().take(5).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let zip5 = &zip[..5];

    if let Some(&(_, lat, lon)) = ZIP_TABLE.iter().find(|(z, _, _)| *z == zip5) {
        return Some(LatLon::new(lat, lon));
    }

    let prefix = &zip5[..3];
    PREFIX_TABLE
        .iter()
        .find(|(p, _, _)| *p == prefix)
        .map(|&(_, lat, lon)| LatLon::new(lat, lon))
}

/// Great-circle distance between two points in statute miles (haversine).
pub fn distance_miles(a: LatLon, b: LatLon) -> f64 {
    const EARTH_RADIUS_MILES: f64 = 3958.8;

    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * h.sqrt().asin()
}
