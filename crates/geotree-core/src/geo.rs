#![forbid(unsafe_code)]

//! Geographic primitives: coordinates and comparison keys.

use std::fmt;

/// Mean Earth radius in metres, used for great-circle distances.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Number of decimal degrees kept when rounding a coordinate into a key.
///
/// Five decimals is roughly 1.1 m at the equator, which is tight enough to
/// tell neighbouring placemarks apart and loose enough to absorb the float
/// noise two independent parsers produce from the same source text.
const KEY_DECIMALS: i32 = 5;

/// A longitude/latitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    /// Longitude in degrees, east positive.
    pub lon: f64,
    /// Latitude in degrees, north positive.
    pub lat: f64,
}

impl Coord {
    /// Create a coordinate from longitude and latitude degrees.
    #[inline]
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle distance to `other` in metres (haversine).
    #[must_use]
    pub fn distance_m(&self, other: &Coord) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

/// Round a degree value to [`KEY_DECIMALS`] places, normalizing `-0.0`.
///
/// `-0.000001` and `0.0` must produce the same key text.
fn round_key_degrees(value: f64) -> f64 {
    let scale = 10f64.powi(KEY_DECIMALS);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Opaque comparison key correlating two representations of one feature.
///
/// Combines a trimmed, case-preserving name with a coordinate rounded to
/// five decimal degrees, or just the name when no coordinate is available.
/// Two placemarks sharing a name and a rounded coordinate collide to the
/// same key; that is accepted, not a defect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeoKey(String);

impl GeoKey {
    /// Derive a key from a display name and an optional coordinate.
    #[must_use]
    pub fn new(name: &str, coordinate: Option<Coord>) -> Self {
        let name = name.trim();
        match coordinate {
            Some(coord) => {
                let lon = round_key_degrees(coord.lon);
                let lat = round_key_degrees(coord.lat);
                Self(format!("{name}|{lon:.5},{lat:.5}"))
            }
            None => Self(name.to_owned()),
        }
    }

    /// The key's textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
