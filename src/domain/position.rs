use serde::{Deserialize, Serialize};

use super::Error;

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawPosition {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    longitude: f64,
}

impl TryFrom<RawPosition> for Position {
    type Error = Error;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Position {
    /// Creates a position from latitude and longitude in decimal degrees.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] if either coordinate is not finite,
    /// the latitude lies outside `[-90, 90]`, or the longitude lies outside
    /// `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, Error> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if valid {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(Error::InvalidPosition {
                latitude,
                longitude,
            })
        }
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in kilometres (haversine formula).
    ///
    /// The result is non-negative and symmetric.
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // rounding can push `a` fractionally above 1 for antipodal points
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

/// A non-negative search radius in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Radius(f64);

impl Radius {
    /// Creates a radius.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRadius`] if `km` is negative or not finite.
    pub fn new(km: f64) -> Result<Self, Error> {
        if km.is_finite() && km >= 0.0 {
            Ok(Self(km))
        } else {
            Err(Error::InvalidRadius(km))
        }
    }

    /// The radius in kilometres.
    #[must_use]
    pub const fn km(self) -> f64 {
        self.0
    }

    /// Whether a distance lies within the radius (inclusive).
    #[must_use]
    pub fn contains(self, distance_km: f64) -> bool {
        distance_km <= self.0
    }
}

impl Default for Radius {
    fn default() -> Self {
        Self(5.0)
    }
}

impl TryFrom<f64> for Radius {
    type Error = Error;

    fn try_from(km: f64) -> Result<Self, Self::Error> {
        Self::new(km)
    }
}

impl From<Radius> for f64 {
    fn from(radius: Radius) -> Self {
        radius.0
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn pos(latitude: f64, longitude: f64) -> Position {
        Position::new(latitude, longitude).unwrap()
    }

    #[test_case(91.0, 0.0; "latitude too large")]
    #[test_case(-90.5, 0.0; "latitude too small")]
    #[test_case(0.0, 180.1; "longitude too large")]
    #[test_case(0.0, -181.0; "longitude too small")]
    #[test_case(f64::NAN, 0.0; "nan latitude")]
    #[test_case(0.0, f64::INFINITY; "infinite longitude")]
    fn rejects_off_globe(latitude: f64, longitude: f64) {
        assert!(matches!(
            Position::new(latitude, longitude),
            Err(Error::InvalidPosition { .. })
        ));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = pos(51.5, -0.12);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = pos(0.0, 0.0).distance_km(&pos(0.0, 1.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let london = pos(51.5074, -0.1278);
        let paris = pos(48.8566, 2.3522);
        let there = london.distance_km(&paris);
        let back = paris.distance_km(&london);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 343.5).abs() < 1.0, "got {there}");
    }

    #[test]
    fn antipodal_points_are_half_circumference_apart() {
        let d = pos(0.0, 0.0).distance_km(&pos(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn radius_is_inclusive() {
        let radius = Radius::new(5.0).unwrap();
        assert!(radius.contains(5.0));
        assert!(!radius.contains(5.000_001));
        assert_eq!(Radius::default(), radius);
    }

    #[test_case(-0.1; "negative")]
    #[test_case(f64::NAN; "nan")]
    #[test_case(f64::INFINITY; "infinite")]
    fn rejects_invalid_radius(km: f64) {
        assert!(matches!(Radius::new(km), Err(Error::InvalidRadius(_))));
    }

    #[test]
    fn deserialises_short_keys() {
        let p: Position = serde_yaml::from_str("lat: 40.0\nlng: -73.5").unwrap();
        assert_eq!(p, pos(40.0, -73.5));
        assert_eq!((p.latitude(), p.longitude()), (40.0, -73.5));

        let p: Position = serde_yaml::from_str("lat: 1.5\nlon: 2.5").unwrap();
        assert_eq!(p.longitude(), 2.5);

        assert!(serde_yaml::from_str::<Position>("lat: 100.0\nlng: 0.0").is_err());
    }
}
