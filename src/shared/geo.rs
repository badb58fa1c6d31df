use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Earth's mean radius in kilometers (for Haversine formula)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Stored coordinates keep 7 decimal places (about 1 cm)
const COORDINATE_SCALE: f64 = 1e7;

/// Errors produced when a `"lat,lng"` location string cannot be parsed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationParseError {
    #[error("Location '{0}' must be in 'lat,lng' format")]
    MissingSeparator(String),

    #[error("Location '{0}' has a non-numeric coordinate")]
    InvalidNumber(String),

    #[error("Location '{0}' is outside valid latitude/longitude bounds")]
    OutOfRange(String),
}

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in kilometers
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self.lat, self.lng, other.lat, other.lng)
    }
}

impl FromStr for GeoPoint {
    type Err = LocationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| LocationParseError::MissingSeparator(s.to_string()))?;

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| LocationParseError::InvalidNumber(s.to_string()))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| LocationParseError::InvalidNumber(s.to_string()))?;

        // "NaN" and "inf" parse as f64, reject them along with out-of-range values
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(LocationParseError::OutOfRange(s.to_string()));
        }

        Ok(Self { lat, lng })
    }
}

/// Canonical `"lat,lng"` form; always short enough for the location columns
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{}",
            round_coordinate(self.lat),
            round_coordinate(self.lng)
        )
    }
}

fn round_coordinate(value: f64) -> f64 {
    (value * COORDINATE_SCALE).round() / COORDINATE_SCALE
}

/// Calculate Haversine distance between two points in kilometers
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_canonical_and_bounded() {
        let padded = format!("40.4168{},-3.7038{}", "0".repeat(40), "0".repeat(40));
        let point: GeoPoint = padded.parse().unwrap();
        assert_eq!(point.to_string(), "40.4168,-3.7038");

        let tiny: GeoPoint = "0.000000000000000000001,-179.123456789123".parse().unwrap();
        assert_eq!(tiny.to_string(), "0,-179.1234568");
        assert!(tiny.to_string().len() <= 64);
    }

    #[test]
    fn test_haversine_same_point() {
        let distance = haversine_km(40.4168, -3.7038, 40.4168, -3.7038);
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let distance = haversine_km(0.0, 0.0, 1.0, 0.0);
        // 2 * pi * 6371 / 360
        assert!((distance - 111.195).abs() < 0.01, "got {}", distance);
    }

    #[test]
    fn test_haversine_madrid_barcelona() {
        let madrid = GeoPoint::new(40.4168, -3.7038);
        let barcelona = GeoPoint::new(41.3874, 2.1686);

        let distance = madrid.distance_km(&barcelona);

        // Great-circle distance is roughly 505 km
        assert!(distance > 495.0 && distance < 515.0, "got {}", distance);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let a = GeoPoint::new(36.7213, -4.4214);
        let b = GeoPoint::new(37.3891, -5.9845);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_parse_valid_location() {
        let point: GeoPoint = "40.4168,-3.7038".parse().unwrap();
        assert_eq!(point, GeoPoint::new(40.4168, -3.7038));

        let spaced: GeoPoint = " 40.4168 , -3.7038 ".parse().unwrap();
        assert_eq!(spaced, point);
    }

    #[test]
    fn test_parse_missing_separator() {
        assert_eq!(
            "40.4168 -3.7038".parse::<GeoPoint>(),
            Err(LocationParseError::MissingSeparator(
                "40.4168 -3.7038".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_non_numeric() {
        assert!(matches!(
            "abc,-3.7".parse::<GeoPoint>(),
            Err(LocationParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            "40.1,".parse::<GeoPoint>(),
            Err(LocationParseError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_rejects_nan_and_out_of_range() {
        assert!(matches!(
            "NaN,1.0".parse::<GeoPoint>(),
            Err(LocationParseError::OutOfRange(_))
        ));
        assert!(matches!(
            "91.0,1.0".parse::<GeoPoint>(),
            Err(LocationParseError::OutOfRange(_))
        ));
        assert!(matches!(
            "10.0,-181.0".parse::<GeoPoint>(),
            Err(LocationParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let point = GeoPoint::new(-33.45, -70.66);
        assert_eq!(point.to_string().parse::<GeoPoint>().unwrap(), point);
    }
}
