//! Builders shared by unit tests.

use crate::domain::{AlternativeParts, GeoPoint, RouteAlternative, RouteResultSet};

pub(crate) fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).unwrap()
}

/// A two-stop alternative from Seoul Station to Gangnam Station.
pub(crate) fn alternative(id: &str) -> RouteAlternative {
    let origin = point(37.5509, 126.9882);
    let destination = point(37.4979, 127.0276);
    RouteAlternative::from_parts(AlternativeParts {
        id: id.to_string(),
        duration_label: "25 min".to_string(),
        transfer_count: 1,
        walk_distance_label: "300 m".to_string(),
        fare_label: "₩1,450".to_string(),
        arrival_time_label: "10:25".to_string(),
        steps: vec![
            "Depart from Seoul Station".to_string(),
            "Transfer to Line 2 at City Hall Station".to_string(),
            "Walk to Gangnam Station".to_string(),
        ],
        origin_point: origin,
        destination_point: destination,
        path: vec![origin, point(37.5663, 126.9779), destination],
    })
    .unwrap()
}

pub(crate) fn result_set(ids: &[&str]) -> RouteResultSet {
    RouteResultSet::new(ids.iter().map(|id| alternative(id)).collect()).unwrap()
}
