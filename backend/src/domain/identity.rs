//! Entity identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by [`Identity::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    Empty,
    Invalid,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identity must not be empty"),
            Self::Invalid => write!(f, "identity must be a valid UUID"),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Opaque, immutable identifier owned by an entity for its whole lifetime.
///
/// Serialised as the hyphenated UUID string.
///
/// # Examples
/// ```
/// use accounts::domain::Identity;
///
/// let id = Identity::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(Uuid);

impl Identity {
    /// Parse an identity from text.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentityError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(IdentityError::Empty);
        }
        if raw.trim() != raw {
            return Err(IdentityError::Invalid);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdentityError::Invalid)
    }

    /// Generate a fresh random identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::random()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Identity> for String {
    fn from(value: Identity) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn random_identities_are_version_four_and_distinct() {
        let first = Identity::random();
        let second = Identity::default();
        assert_eq!(first.as_uuid().get_version_num(), 4);
        assert_ne!(first, second);
    }

    #[rstest]
    fn new_keeps_the_provided_value() {
        let uuid = Uuid::new_v4();
        let id = Identity::new(uuid.to_string()).expect("valid uuid");
        assert_eq!(id.as_uuid(), &uuid);
        assert_eq!(Identity::from_uuid(uuid), id);
    }

    #[rstest]
    #[case("", IdentityError::Empty)]
    #[case("not-a-uuid", IdentityError::Invalid)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdentityError::Invalid)]
    fn new_rejects_bad_input(#[case] raw: &str, #[case] expected: IdentityError) {
        assert_eq!(Identity::new(raw), Err(expected));
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = Identity::random();
        let value = serde_json::to_value(id).expect("serialise identity");
        assert_eq!(value, serde_json::Value::String(id.to_string()));
    }
}
