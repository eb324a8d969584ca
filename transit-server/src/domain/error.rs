//! Domain error types.
//!
//! These errors represent validation failures when building route values.
//! They are distinct from fetch and transport errors.

use std::fmt;

/// A field of a route query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Origin,
    Destination,
}

impl Field {
    /// Returns the lowercase field name used in user-facing messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Origin => "origin",
            Field::Destination => "destination",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error from validating user input for a route query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The named field was empty after trimming whitespace
    #[error("please enter the {0}")]
    EmptyField(Field),
}

impl ValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> Field {
        match self {
            ValidationError::EmptyField(field) => *field,
        }
    }
}

/// Error from building a [`RouteAlternative`](super::RouteAlternative).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidAlternative {
    #[error("alternative id must not be empty")]
    EmptyId,

    #[error("alternative {0} has no steps")]
    NoSteps(String),

    #[error("alternative {id} path has {len} points, need at least 2")]
    PathTooShort { id: String, len: usize },

    #[error("alternative {0} path does not start at its origin point")]
    PathStartMismatch(String),

    #[error("alternative {0} path does not end at its destination point")]
    PathEndMismatch(String),
}

/// Error from building a [`RouteResultSet`](super::RouteResultSet).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidResultSet {
    #[error("result set must contain at least one alternative")]
    Empty,

    #[error("duplicate alternative id: {0}")]
    DuplicateId(String),
}
