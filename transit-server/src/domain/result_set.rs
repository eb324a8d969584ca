//! Result set type.

use std::collections::HashSet;

use super::alternative::RouteAlternative;
use super::error::InvalidResultSet;

/// The alternatives returned by one successful fetch, plus the current selection.
///
/// The alternatives never change after construction. The selection always
/// refers to one of them and starts at the first.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResultSet {
    alternatives: Vec<RouteAlternative>,
    selected: usize,
}

impl RouteResultSet {
    /// Build a result set with the first alternative selected.
    ///
    /// Fails when `alternatives` is empty or two alternatives share an id.
    pub fn new(alternatives: Vec<RouteAlternative>) -> Result<Self, InvalidResultSet> {
        if alternatives.is_empty() {
            return Err(InvalidResultSet::Empty);
        }

        let mut seen = HashSet::new();
        for alt in &alternatives {
            if !seen.insert(alt.id()) {
                return Err(InvalidResultSet::DuplicateId(alt.id().to_string()));
            }
        }

        Ok(Self {
            alternatives,
            selected: 0,
        })
    }

    pub fn alternatives(&self) -> &[RouteAlternative] {
        &self.alternatives
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Always false: a result set holds at least one alternative.
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    pub fn selected_id(&self) -> &str {
        self.alternatives[self.selected].id()
    }

    pub fn selected(&self) -> &RouteAlternative {
        &self.alternatives[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Look up an alternative by id.
    pub fn get(&self, id: &str) -> Option<&RouteAlternative> {
        self.alternatives.iter().find(|a| a.id() == id)
    }

    /// Move the selection back to the first alternative.
    pub(crate) fn reset_selection(&mut self) {
        self.selected = 0;
    }

    /// Select the alternative with the given id.
    ///
    /// Returns false and keeps the current selection when `id` is not a member.
    pub fn select(&mut self, id: &str) -> bool {
        match self.alternatives.iter().position(|a| a.id() == id) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }
}
