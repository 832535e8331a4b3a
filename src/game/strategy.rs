//! Latest strategic directive per role.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use super::Role;
use crate::error::GameError;

/// An opaque strategy payload, e.g. "infield in, walk the eighth hitter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct Directive(String);

impl Directive {
    /// Wraps a directive, rejecting blank text.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] if the text is empty or whitespace.
    pub fn new(text: impl Into<String>) -> Result<Self, GameError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(GameError::validation("Strategy directive is empty"));
        }
        Ok(Self(text))
    }

    /// Returns the directive text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The current directive for each role that has posted one.
///
/// Posting replaces; earlier directives are not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Strategies {
    by_role: BTreeMap<Role, Directive>,
}

impl Strategies {
    /// Stores a directive, returning the one it replaced.
    #[instrument(skip(self, directive))]
    pub fn post(&mut self, role: Role, directive: Directive) -> Option<Directive> {
        let previous = self.by_role.insert(role, directive);
        debug!(replaced = previous.is_some(), "Strategy posted");
        previous
    }

    /// Returns the current directive for a role.
    pub fn get(&self, role: Role) -> Option<&Directive> {
        self.by_role.get(&role)
    }

    /// Iterates roles with their directives in role order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &Directive)> {
        self.by_role.iter().map(|(role, directive)| (*role, directive))
    }

    /// Number of roles with a directive.
    pub fn len(&self) -> usize {
        self.by_role.len()
    }

    /// Checks whether no role has posted.
    pub fn is_empty(&self) -> bool {
        self.by_role.is_empty()
    }
}
