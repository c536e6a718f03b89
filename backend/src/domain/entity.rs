//! Identity-carrying entity base.

use super::Identity;

/// An attribute bag paired with an immutable [`Identity`].
///
/// Attributes are only reachable mutably from inside the domain so every
/// change goes through a validating method on the concrete entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<A> {
    identity: Identity,
    attributes: A,
}

impl<A> Entity<A> {
    /// Wrap `attributes`, generating an identity when none is supplied.
    pub fn new(attributes: A, identity: Option<Identity>) -> Self {
        Self {
            identity: identity.unwrap_or_else(Identity::random),
            attributes,
        }
    }

    /// Identity fixed at construction.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub(in crate::domain) fn attributes(&self) -> &A {
        &self.attributes
    }

    pub(in crate::domain) fn attributes_mut(&mut self) -> &mut A {
        &mut self.attributes
    }
}
