//! Rendering lifecycle state for the results screen.

mod map;
mod view;

pub use map::{
    DEFAULT_LATITUDE_DELTA, DEFAULT_LONGITUDE_DELTA, DEFAULT_ZOOM, MapOverlay, MapProvider,
    MapViewport, Marker, UnknownMapProvider,
};
pub use view::{LOADING_MESSAGE, MessageKind, RouteCard, SearchView, StatusMessage};
