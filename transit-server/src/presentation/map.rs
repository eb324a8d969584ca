//! Map overlay for the results screen.
//!
//! Two providers are supported. Google-style maps take a region (center
//! plus latitude/longitude spans); Naver-style maps take a center and an
//! integer zoom level.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{GeoPoint, RouteAlternative};

/// Span of the default Google region, in degrees.
pub const DEFAULT_LATITUDE_DELTA: f64 = 0.0922;
pub const DEFAULT_LONGITUDE_DELTA: f64 = 0.0421;

/// Default Naver zoom level.
pub const DEFAULT_ZOOM: u8 = 14;

/// Fitted spans never go below this, so a short hop is not zoomed to street level.
const MIN_DELTA: f64 = 0.005;

/// Extra room around a fitted path.
const FIT_PADDING: f64 = 1.2;

const MIN_ZOOM: u8 = 5;
const MAX_ZOOM: u8 = 18;

const ORIGIN_COLOR: &str = "#22C55E";
const DESTINATION_COLOR: &str = "#EF4444";
const PATH_COLOR: &str = "#0A7EA4";
const PATH_WIDTH: u8 = 4;

/// Error returned when parsing an unknown map provider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown map provider: {0} (expected google or naver)")]
pub struct UnknownMapProvider(String);

/// Which map SDK the client renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapProvider {
    #[default]
    Google,
    Naver,
}

impl MapProvider {
    /// The viewport shown before any results, centered on Seoul City Hall.
    pub fn default_viewport(&self) -> MapViewport {
        let center = GeoPoint::SEOUL_CITY_HALL;
        match self {
            MapProvider::Google => MapViewport::Region {
                latitude: center.latitude(),
                longitude: center.longitude(),
                latitude_delta: DEFAULT_LATITUDE_DELTA,
                longitude_delta: DEFAULT_LONGITUDE_DELTA,
            },
            MapProvider::Naver => MapViewport::Center {
                latitude: center.latitude(),
                longitude: center.longitude(),
                zoom: DEFAULT_ZOOM,
            },
        }
    }

    /// A viewport that shows the whole path.
    pub fn fit(&self, path: &[GeoPoint]) -> MapViewport {
        let Some(first) = path.first() else {
            return self.default_viewport();
        };

        let (mut min_lat, mut max_lat) = (first.latitude(), first.latitude());
        let (mut min_lon, mut max_lon) = (first.longitude(), first.longitude());
        for p in &path[1..] {
            min_lat = min_lat.min(p.latitude());
            max_lat = max_lat.max(p.latitude());
            min_lon = min_lon.min(p.longitude());
            max_lon = max_lon.max(p.longitude());
        }

        let latitude = (min_lat + max_lat) / 2.0;
        let longitude = (min_lon + max_lon) / 2.0;
        let latitude_delta = ((max_lat - min_lat) * FIT_PADDING).max(MIN_DELTA);
        let longitude_delta = ((max_lon - min_lon) * FIT_PADDING).max(MIN_DELTA);

        match self {
            MapProvider::Google => MapViewport::Region {
                latitude,
                longitude,
                latitude_delta,
                longitude_delta,
            },
            MapProvider::Naver => MapViewport::Center {
                latitude,
                longitude,
                zoom: zoom_for_span(latitude_delta.max(longitude_delta)),
            },
        }
    }
}

/// Web-mercator zoom level at which `span` degrees roughly fills the screen.
fn zoom_for_span(span: f64) -> u8 {
    let zoom = (360.0 / span).log2().floor();
    zoom.clamp(f64::from(MIN_ZOOM), f64::from(MAX_ZOOM)) as u8
}

impl FromStr for MapProvider {
    type Err = UnknownMapProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(MapProvider::Google),
            "naver" => Ok(MapProvider::Naver),
            _ => Err(UnknownMapProvider(s.to_string())),
        }
    }
}

impl fmt::Display for MapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapProvider::Google => f.write_str("google"),
            MapProvider::Naver => f.write_str("naver"),
        }
    }
}

/// Where the map camera points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapViewport {
    Region {
        latitude: f64,
        longitude: f64,
        latitude_delta: f64,
        longitude_delta: f64,
    },
    Center {
        latitude: f64,
        longitude: f64,
        zoom: u8,
    },
}

impl MapViewport {
    pub fn center(&self) -> (f64, f64) {
        match self {
            MapViewport::Region {
                latitude,
                longitude,
                ..
            }
            | MapViewport::Center {
                latitude,
                longitude,
                ..
            } => (*latitude, *longitude),
        }
    }
}

/// A pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: GeoPoint,
    pub title: &'static str,
    pub color: &'static str,
}

/// Everything drawn on the results map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOverlay {
    pub provider: MapProvider,
    pub viewport: MapViewport,
    pub markers: Vec<Marker>,
    pub path: Vec<GeoPoint>,
    pub stroke_color: &'static str,
    pub stroke_width: u8,
}

impl MapOverlay {
    /// A bare map with no route drawn.
    pub fn empty(provider: MapProvider) -> Self {
        Self {
            provider,
            viewport: provider.default_viewport(),
            markers: Vec::new(),
            path: Vec::new(),
            stroke_color: PATH_COLOR,
            stroke_width: PATH_WIDTH,
        }
    }

    /// The map for one alternative: both endpoints pinned and the path drawn.
    pub fn for_alternative(provider: MapProvider, alternative: &RouteAlternative) -> Self {
        Self {
            provider,
            viewport: provider.fit(alternative.path()),
            markers: vec![
                Marker {
                    position: alternative.origin_point(),
                    title: "Origin",
                    color: ORIGIN_COLOR,
                },
                Marker {
                    position: alternative.destination_point(),
                    title: "Destination",
                    color: DESTINATION_COLOR,
                },
            ],
            path: alternative.path().to_vec(),
            stroke_color: PATH_COLOR,
            stroke_width: PATH_WIDTH,
        }
    }
}
