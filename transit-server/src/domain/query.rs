//! Route query type.

use std::fmt;

use super::error::{Field, ValidationError};

/// A validated origin/destination pair for one search.
///
/// Both ends are trimmed and guaranteed non-empty. They are otherwise opaque:
/// no geocoding or case folding happens here.
///
/// # Examples
///
/// ```
/// use transit_server::domain::{Field, RouteQuery};
///
/// let query = RouteQuery::validate("  Seoul Station ", "Gangnam Station").unwrap();
/// assert_eq!(query.origin(), "Seoul Station");
///
/// let err = RouteQuery::validate("   ", "Gangnam Station").unwrap_err();
/// assert_eq!(err.field(), Field::Origin);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RouteQuery {
    origin: String,
    destination: String,
}

impl RouteQuery {
    /// Validate raw user input into a query.
    ///
    /// The origin is checked before the destination, so when both are empty
    /// the error names the origin.
    pub fn validate(origin: &str, destination: &str) -> Result<Self, ValidationError> {
        let origin = origin.trim();
        if origin.is_empty() {
            return Err(ValidationError::EmptyField(Field::Origin));
        }

        let destination = destination.trim();
        if destination.is_empty() {
            return Err(ValidationError::EmptyField(Field::Destination));
        }

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }
}

impl fmt::Debug for RouteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteQuery({:?} -> {:?})", self.origin, self.destination)
    }
}

impl fmt::Display for RouteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.origin, self.destination)
    }
}
