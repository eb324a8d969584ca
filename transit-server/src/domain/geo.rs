//! Geographic coordinate type.

use std::fmt;

use serde::Serialize;

/// Maximum per-axis difference, in degrees, for two points to count as the same place.
///
/// Roughly 11 metres of latitude.
pub const APPROX_TOLERANCE_DEG: f64 = 1e-4;

/// Error returned when building a coordinate outside the valid ranges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidGeoPoint {
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
///
/// # Examples
///
/// ```
/// use transit_server::domain::GeoPoint;
///
/// let gangnam = GeoPoint::new(37.4979, 127.0276).unwrap();
/// assert_eq!(gangnam.latitude(), 37.4979);
///
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// assert!(GeoPoint::new(0.0, -180.5).is_err());
/// assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Seoul City Hall, the default map center.
    pub const SEOUL_CITY_HALL: GeoPoint = GeoPoint {
        latitude: 37.5665,
        longitude: 126.9780,
    };

    /// Create a point, checking both coordinates are finite and in range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidGeoPoint> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidGeoPoint {
                reason: "coordinates must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidGeoPoint {
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidGeoPoint {
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether two points are within [`APPROX_TOLERANCE_DEG`] on both axes.
    pub fn approx_eq(&self, other: &GeoPoint) -> bool {
        (self.latitude - other.latitude).abs() <= APPROX_TOLERANCE_DEG
            && (self.longitude - other.longitude).abs() <= APPROX_TOLERANCE_DEG
    }
}

impl fmt::Debug for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4},{:.4}", self.latitude, self.longitude)
    }
}
