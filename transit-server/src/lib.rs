//! Transit route finder server.
//!
//! A web application that answers: "how do I get from here to there
//! by public transport?" Each search session moves through idle, loading,
//! failed and ready states, and the results page shows the alternatives
//! found with the selected one drawn on a map.

pub mod cache;
pub mod config;
pub mod domain;
pub mod fetcher;
pub mod lifecycle;
pub mod presentation;
pub mod web;

#[cfg(test)]
pub(crate) mod testing;
