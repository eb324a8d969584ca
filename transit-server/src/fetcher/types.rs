//! Route service response DTOs.
//!
//! These types map directly to the JSON returned by the routing service
//! and stored in fixture files. Optional fields are filled in during
//! conversion.

use serde::Deserialize;

/// A routing service response.
///
/// Newer services return a list of alternatives. The legacy shape is a
/// single bare route object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RouteResponse {
    /// `{"alternatives": [...]}`
    Alternatives { alternatives: Vec<WireRoute> },

    /// `{"time": .., "route": [..], "coordinates": [..]}`
    Single(WireRoute),
}

impl RouteResponse {
    /// All routes in the response, in service order.
    pub fn routes(&self) -> &[WireRoute] {
        match self {
            RouteResponse::Alternatives { alternatives } => alternatives,
            RouteResponse::Single(route) => std::slice::from_ref(route),
        }
    }
}

/// One itinerary as sent by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct WireRoute {
    /// Service-assigned id. Generated when missing.
    #[serde(default)]
    pub id: Option<String>,

    /// Travel time in minutes.
    pub time: u32,

    /// Human-readable steps.
    pub route: Vec<String>,

    /// Path from origin to destination.
    pub coordinates: Vec<WireCoordinate>,

    /// Number of changes. Inferred from the steps when missing.
    #[serde(default)]
    pub transfers: Option<u32>,

    /// Total walking distance in metres.
    #[serde(default)]
    pub walk_meters: Option<u32>,

    /// Fare in Korean won.
    #[serde(default)]
    pub fare: Option<u32>,

    /// Arrival time in "HH:MM". Computed from departure when missing.
    #[serde(default)]
    pub arrival: Option<String>,
}

/// A coordinate pair as sent by the service.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}
