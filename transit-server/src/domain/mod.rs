//! Domain types for transit route search.
//!
//! This module contains the value types a search produces and consumes.
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod alternative;
mod error;
mod geo;
pub mod labels;
mod query;
mod result_set;

pub use alternative::{AlternativeParts, RouteAlternative};
pub use error::{Field, InvalidAlternative, InvalidResultSet, ValidationError};
pub use geo::{APPROX_TOLERANCE_DEG, GeoPoint, InvalidGeoPoint};
pub use query::RouteQuery;
pub use result_set::RouteResultSet;
