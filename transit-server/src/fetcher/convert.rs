//! Conversion from route service DTOs to domain types.
//!
//! Fills in the optional wire fields (ids, labels, transfer counts) and
//! validates each itinerary. Invalid itineraries are skipped rather than
//! failing the whole response.

use std::collections::HashSet;

use chrono::NaiveTime;
use tracing::warn;

use crate::domain::labels::{arrival_time_label, duration_label, fare_label, walk_distance_label};
use crate::domain::{
    AlternativeParts, GeoPoint, InvalidAlternative, InvalidGeoPoint, RouteAlternative,
    RouteResultSet,
};

use super::error::FetchError;
use super::types::{RouteResponse, WireCoordinate, WireRoute};

/// Label used when the service omits a walk distance or fare.
const UNKNOWN_LABEL: &str = "-";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The response contained no routes at all
    #[error("response contains no routes")]
    NoRoutes,

    /// Every route in the response was invalid
    #[error("all {0} routes in the response were invalid")]
    AllInvalid(usize),

    /// A coordinate was out of range
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] InvalidGeoPoint),

    /// An arrival time was not in HH:MM form
    #[error("invalid arrival time: {0}")]
    InvalidArrival(String),

    /// The itinerary broke a domain invariant
    #[error(transparent)]
    InvalidAlternative(#[from] InvalidAlternative),
}

impl From<ConversionError> for FetchError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::NoRoutes => FetchError::NoRoute,
            other => FetchError::Unreachable(format!("invalid route data: {other}")),
        }
    }
}

/// Convert a service response to a result set.
///
/// `departure` is the local time the search was made, used for arrival
/// labels the service did not supply.
pub fn convert_response(
    response: &RouteResponse,
    departure: NaiveTime,
) -> Result<RouteResultSet, ConversionError> {
    let routes = response.routes();
    if routes.is_empty() {
        return Err(ConversionError::NoRoutes);
    }

    let mut seen = HashSet::new();
    let mut alternatives = Vec::with_capacity(routes.len());

    for (idx, route) in routes.iter().enumerate() {
        let alternative = match convert_route(route, idx, departure) {
            Ok(alternative) => alternative,
            Err(e) => {
                warn!(index = idx, error = %e, "Skipping invalid route");
                continue;
            }
        };

        if !seen.insert(alternative.id().to_string()) {
            warn!(id = %alternative.id(), "Skipping route with duplicate id");
            continue;
        }

        alternatives.push(alternative);
    }

    if alternatives.is_empty() {
        return Err(ConversionError::AllInvalid(routes.len()));
    }

    // Non-empty and de-duplicated above, so this cannot fail
    RouteResultSet::new(alternatives).map_err(|_| ConversionError::AllInvalid(routes.len()))
}

/// Convert a single wire route to a domain alternative.
pub fn convert_route(
    route: &WireRoute,
    index: usize,
    departure: NaiveTime,
) -> Result<RouteAlternative, ConversionError> {
    let id = route
        .id
        .as_ref()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("route-{}", index + 1));

    let path = route
        .coordinates
        .iter()
        .map(convert_coordinate)
        .collect::<Result<Vec<_>, _>>()?;

    let (Some(&origin_point), Some(&destination_point)) = (path.first(), path.last()) else {
        return Err(InvalidAlternative::PathTooShort { id, len: 0 }.into());
    };

    let arrival_time_label = match &route.arrival {
        Some(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(|t| t.format("%H:%M").to_string())
            .map_err(|_| ConversionError::InvalidArrival(s.clone()))?,
        None => arrival_time_label(departure, route.time),
    };

    let parts = AlternativeParts {
        id,
        duration_label: duration_label(route.time),
        transfer_count: route
            .transfers
            .unwrap_or_else(|| infer_transfers(&route.route)),
        walk_distance_label: route
            .walk_meters
            .map(walk_distance_label)
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
        fare_label: route
            .fare
            .map(fare_label)
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
        arrival_time_label,
        steps: route.route.clone(),
        origin_point,
        destination_point,
        path,
    };

    Ok(RouteAlternative::from_parts(parts)?)
}

fn convert_coordinate(c: &WireCoordinate) -> Result<GeoPoint, InvalidGeoPoint> {
    GeoPoint::new(c.latitude, c.longitude)
}

/// Count the steps that describe a change of vehicle.
///
/// Matches "transfer" in English and "환승" in Korean step text.
fn infer_transfers(steps: &[String]) -> u32 {
    let count = steps
        .iter()
        .filter(|s| s.to_lowercase().contains("transfer") || s.contains("환승"))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departure() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 50, 0).unwrap()
    }

    fn coords(points: &[(f64, f64)]) -> Vec<WireCoordinate> {
        points
            .iter()
            .map(|&(latitude, longitude)| WireCoordinate {
                latitude,
                longitude,
            })
            .collect()
    }

    fn wire(id: Option<&str>, time: u32) -> WireRoute {
        WireRoute {
            id: id.map(str::to_string),
            time,
            route: vec![
                "Depart from Seoul Station".to_string(),
                "Take Subway Line 4".to_string(),
                "Transfer to Line 2 at Sadang".to_string(),
                "Walk to Gangnam Station".to_string(),
            ],
            coordinates: coords(&[(37.5509, 126.9882), (37.4765, 126.9816), (37.4979, 127.0276)]),
            transfers: None,
            walk_meters: None,
            fare: None,
            arrival: None,
        }
    }

    #[test]
    fn fills_in_missing_fields() {
        let alt = convert_route(&wire(None, 35), 0, departure()).unwrap();

        assert_eq!(alt.id(), "route-1");
        assert_eq!(alt.duration_label(), "35 min");
        assert_eq!(alt.arrival_time_label(), "10:25");
        assert_eq!(alt.transfer_count(), 1);
        assert_eq!(alt.walk_distance_label(), "-");
        assert_eq!(alt.fare_label(), "-");
        assert_eq!(alt.origin_point(), alt.path()[0]);
        assert_eq!(alt.destination_point(), alt.path()[2]);
    }

    #[test]
    fn uses_supplied_fields() {
        let mut route = wire(Some("express"), 22);
        route.transfers = Some(0);
        route.walk_meters = Some(1340);
        route.fare = Some(1450);
        route.arrival = Some("10:12".to_string());

        let alt = convert_route(&route, 3, departure()).unwrap();
        assert_eq!(alt.id(), "express");
        assert_eq!(alt.transfer_count(), 0);
        assert_eq!(alt.walk_distance_label(), "1.3 km");
        assert_eq!(alt.fare_label(), "₩1,450");
        assert_eq!(alt.arrival_time_label(), "10:12");
    }

    #[test]
    fn blank_id_replaced() {
        let alt = convert_route(&wire(Some("  "), 20), 1, departure()).unwrap();
        assert_eq!(alt.id(), "route-2");
    }

    #[test]
    fn infers_korean_transfers() {
        let steps = vec![
            "서울역에서 출발".to_string(),
            "시청역에서 2호선으로 환승".to_string(),
            "강남역 도착".to_string(),
        ];
        assert_eq!(infer_transfers(&steps), 1);
    }

    #[test]
    fn bad_arrival_rejected() {
        let mut route = wire(None, 20);
        route.arrival = Some("soon".to_string());
        assert_eq!(
            convert_route(&route, 0, departure()).unwrap_err(),
            ConversionError::InvalidArrival("soon".to_string())
        );
    }

    #[test]
    fn out_of_range_coordinate_rejected() {
        let mut route = wire(None, 20);
        route.coordinates = coords(&[(137.0, 126.9), (37.4979, 127.0276)]);
        assert!(matches!(
            convert_route(&route, 0, departure()),
            Err(ConversionError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn single_point_path_rejected() {
        let mut route = wire(None, 20);
        route.coordinates = coords(&[(37.5509, 126.9882)]);
        assert!(matches!(
            convert_route(&route, 0, departure()),
            Err(ConversionError::InvalidAlternative(
                InvalidAlternative::PathTooShort { len: 1, .. }
            ))
        ));
    }

    #[test]
    fn empty_response_is_no_route() {
        let resp = RouteResponse::Alternatives {
            alternatives: vec![],
        };
        let err = convert_response(&resp, departure()).unwrap_err();
        assert_eq!(err, ConversionError::NoRoutes);
        assert_eq!(FetchError::from(err), FetchError::NoRoute);
    }

    #[test]
    fn invalid_routes_skipped() {
        let mut bad = wire(Some("bad"), 20);
        bad.route.clear();
        let resp = RouteResponse::Alternatives {
            alternatives: vec![bad, wire(Some("good"), 30)],
        };

        let set = convert_response(&resp, departure()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.selected_id(), "good");
    }

    #[test]
    fn all_invalid_is_unreachable() {
        let mut bad = wire(None, 20);
        bad.route.clear();
        let resp = RouteResponse::Single(bad);

        let err = convert_response(&resp, departure()).unwrap_err();
        assert_eq!(err, ConversionError::AllInvalid(1));
        assert!(matches!(FetchError::from(err), FetchError::Unreachable(_)));
    }

    #[test]
    fn duplicate_ids_skipped() {
        let resp = RouteResponse::Alternatives {
            alternatives: vec![wire(Some("a"), 20), wire(Some("a"), 25), wire(Some("b"), 30)],
        };

        let set = convert_response(&resp, departure()).unwrap();
        let ids: Vec<_> = set.alternatives().iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
