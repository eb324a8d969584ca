//! Route alternative type.
//!
//! A `RouteAlternative` is one candidate itinerary for a query: a list of
//! human-readable steps, a handful of summary labels, and the path to draw
//! on the map.

use super::error::InvalidAlternative;
use super::geo::GeoPoint;

/// Unvalidated fields for building a [`RouteAlternative`].
#[derive(Debug, Clone)]
pub struct AlternativeParts {
    pub id: String,
    pub duration_label: String,
    pub transfer_count: u32,
    pub walk_distance_label: String,
    pub fare_label: String,
    pub arrival_time_label: String,
    pub steps: Vec<String>,
    pub origin_point: GeoPoint,
    pub destination_point: GeoPoint,
    pub path: Vec<GeoPoint>,
}

/// One candidate itinerary.
///
/// Invariants, checked at construction:
/// - `id` is non-empty
/// - `steps` is non-empty
/// - `path` has at least two points, starting at the origin point and
///   ending at the destination point (within [`GeoPoint::approx_eq`])
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAlternative {
    id: String,
    duration_label: String,
    transfer_count: u32,
    walk_distance_label: String,
    fare_label: String,
    arrival_time_label: String,
    steps: Vec<String>,
    origin_point: GeoPoint,
    destination_point: GeoPoint,
    path: Vec<GeoPoint>,
}

impl RouteAlternative {
    /// Build an alternative, checking its invariants.
    pub fn from_parts(parts: AlternativeParts) -> Result<Self, InvalidAlternative> {
        if parts.id.is_empty() {
            return Err(InvalidAlternative::EmptyId);
        }

        if parts.steps.is_empty() {
            return Err(InvalidAlternative::NoSteps(parts.id));
        }

        let (Some(first), Some(last)) = (parts.path.first(), parts.path.last()) else {
            return Err(InvalidAlternative::PathTooShort {
                id: parts.id,
                len: 0,
            });
        };

        if parts.path.len() < 2 {
            return Err(InvalidAlternative::PathTooShort {
                id: parts.id,
                len: parts.path.len(),
            });
        }

        if !first.approx_eq(&parts.origin_point) {
            return Err(InvalidAlternative::PathStartMismatch(parts.id));
        }

        if !last.approx_eq(&parts.destination_point) {
            return Err(InvalidAlternative::PathEndMismatch(parts.id));
        }

        Ok(Self {
            id: parts.id,
            duration_label: parts.duration_label,
            transfer_count: parts.transfer_count,
            walk_distance_label: parts.walk_distance_label,
            fare_label: parts.fare_label,
            arrival_time_label: parts.arrival_time_label,
            steps: parts.steps,
            origin_point: parts.origin_point,
            destination_point: parts.destination_point,
            path: parts.path,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn duration_label(&self) -> &str {
        &self.duration_label
    }

    pub fn transfer_count(&self) -> u32 {
        self.transfer_count
    }

    pub fn walk_distance_label(&self) -> &str {
        &self.walk_distance_label
    }

    pub fn fare_label(&self) -> &str {
        &self.fare_label
    }

    pub fn arrival_time_label(&self) -> &str {
        &self.arrival_time_label
    }

    /// Ordered, human-readable directions. Never empty.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn origin_point(&self) -> GeoPoint {
        self.origin_point
    }

    pub fn destination_point(&self) -> GeoPoint {
        self.destination_point
    }

    /// The polyline to draw, at least two points long.
    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn parts() -> AlternativeParts {
        AlternativeParts {
            id: "r1".to_string(),
            duration_label: "32 min".to_string(),
            transfer_count: 1,
            walk_distance_label: "350 m".to_string(),
            fare_label: "₩1,450".to_string(),
            arrival_time_label: "10:32".to_string(),
            steps: vec!["Depart from A".to_string(), "Walk to B".to_string()],
            origin_point: pt(37.5797, 126.9770),
            destination_point: pt(37.4979, 127.0276),
            path: vec![pt(37.5797, 126.9770), pt(37.5663, 126.9779), pt(37.4979, 127.0276)],
        }
    }

    #[test]
    fn valid_alternative() {
        let alt = RouteAlternative::from_parts(parts()).unwrap();
        assert_eq!(alt.id(), "r1");
        assert_eq!(alt.transfer_count(), 1);
        assert_eq!(alt.steps().len(), 2);
        assert_eq!(alt.path().len(), 3);
        assert_eq!(alt.fare_label(), "₩1,450");
    }

    #[test]
    fn rejects_empty_id() {
        let mut p = parts();
        p.id.clear();
        assert_eq!(
            RouteAlternative::from_parts(p).unwrap_err(),
            InvalidAlternative::EmptyId
        );
    }

    #[test]
    fn rejects_no_steps() {
        let mut p = parts();
        p.steps.clear();
        assert_eq!(
            RouteAlternative::from_parts(p).unwrap_err(),
            InvalidAlternative::NoSteps("r1".into())
        );
    }

    #[test]
    fn rejects_short_path() {
        let mut p = parts();
        p.path.truncate(1);
        assert_eq!(
            RouteAlternative::from_parts(p).unwrap_err(),
            InvalidAlternative::PathTooShort {
                id: "r1".into(),
                len: 1
            }
        );

        let mut p = parts();
        p.path.clear();
        assert!(matches!(
            RouteAlternative::from_parts(p),
            Err(InvalidAlternative::PathTooShort { len: 0, .. })
        ));
    }

    #[test]
    fn rejects_path_not_starting_at_origin() {
        let mut p = parts();
        p.origin_point = pt(37.60, 126.97);
        assert_eq!(
            RouteAlternative::from_parts(p).unwrap_err(),
            InvalidAlternative::PathStartMismatch("r1".into())
        );
    }

    #[test]
    fn rejects_path_not_ending_at_destination() {
        let mut p = parts();
        p.destination_point = pt(37.40, 127.0276);
        assert_eq!(
            RouteAlternative::from_parts(p).unwrap_err(),
            InvalidAlternative::PathEndMismatch("r1".into())
        );
    }

    #[test]
    fn endpoints_within_tolerance_accepted() {
        let mut p = parts();
        p.origin_point = pt(37.57975, 126.97705);
        assert!(RouteAlternative::from_parts(p).is_ok());
    }
}
