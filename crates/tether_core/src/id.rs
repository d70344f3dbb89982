//! Type-safe ID generation and parsing
//!
//! Every Tether entity is identified by a 128-bit UUID wrapped in a typed
//! `Id<T>` with a short textual prefix (`user_...`, `conn_...`). The wrapper
//! keeps user ids, connection ids and the rest from being mixed up in
//! signatures while serializing as a plain prefixed string on the wire.
//!
//! Most ids are random (`generate()` is a v4 UUID). Connection and DM-thread
//! ids are the exception: their canonical values are *derived* from the two
//! participants — see [`crate::pairing`].

use compact_str::CompactString;
use miette::Diagnostic;
use schemars::JsonSchema;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// A typed ID: a UUID plus a compile-time marker and textual prefix
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    uuid: Uuid,
    _marker: PhantomData<T>,
}

/// Trait for types that can be used as ID markers
pub trait IdType: Send + Sync + 'static {
    /// The prefix for this ID type (e.g., "user" for users)
    const PREFIX: &'static str;
}

/// Errors that can occur when working with IDs
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum IdError {
    #[error("Invalid ID prefix: expected '{expected}', got '{actual}'")]
    #[diagnostic(
        code(tether_core::id_prefix),
        help("IDs are typed; a '{expected}' ID cannot be built from a '{actual}' string")
    )]
    InvalidPrefix { expected: String, actual: String },

    #[error("Invalid UUID: {0}")]
    #[diagnostic(
        code(tether_core::id_uuid),
        help("The part after the underscore must be a well-formed UUID")
    )]
    InvalidUuid(#[from] uuid::Error),

    #[error("Invalid ID format: {0}")]
    #[diagnostic(
        code(tether_core::id_format),
        help("IDs look like 'prefix_uuid', e.g. 'user_67e55044-10b1-426f-9247-bb680e5fe0c8'")
    )]
    InvalidFormat(String),
}

impl<T: IdType> Id<T> {
    /// Create a new ID with a freshly generated random UUID
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap a specific UUID (tests, migrations, derivation)
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: PhantomData,
        }
    }

    /// Parse an ID from its `prefix_uuid` textual form
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let Some((prefix, uuid_str)) = s.split_once('_') else {
            return Err(IdError::InvalidFormat(format!(
                "'{s}' is missing the 'prefix_' part"
            )));
        };

        if prefix != T::PREFIX {
            return Err(IdError::InvalidPrefix {
                expected: T::PREFIX.to_string(),
                actual: prefix.to_string(),
            });
        }

        let uuid = Uuid::parse_str(uuid_str)?;
        Ok(Self::from_uuid(uuid))
    }

    /// Get the UUID part
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Get the prefix for this ID type
    pub fn prefix(&self) -> &'static str {
        T::PREFIX
    }

    /// Convert to a compact string representation
    pub fn to_compact_string(&self) -> CompactString {
        compact_str::format_compact!("{}_{}", T::PREFIX, self.uuid)
    }

    /// The nil ID (all-zero UUID)
    pub fn nil() -> Self {
        Self::from_uuid(Uuid::nil())
    }

    /// Check if this is the nil ID
    pub fn is_nil(&self) -> bool {
        self.uuid.is_nil()
    }
}

impl<T: IdType> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", T::PREFIX, self.uuid)
    }
}

impl<T: IdType> Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", T::PREFIX, self.uuid)
    }
}

impl<T: IdType> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<T: IdType> From<Id<T>> for String {
    fn from(id: Id<T>) -> Self {
        id.to_string()
    }
}

impl<T: IdType> AsRef<Uuid> for Id<T> {
    fn as_ref(&self) -> &Uuid {
        &self.uuid
    }
}

impl<T: IdType> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.to_compact_string().as_str())
    }
}

struct IdVisitor<T>(PhantomData<T>);

impl<'de, T: IdType> Visitor<'de> for IdVisitor<T> {
    type Value = Id<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "a string in the form '{}_<uuid>'", T::PREFIX)
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Id::parse(s).map_err(de::Error::custom)
    }
}

impl<'de, T: IdType> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(IdVisitor(PhantomData))
    }
}

impl<T: IdType> JsonSchema for Id<T> {
    fn schema_name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Owned(format!("{}Id", T::PREFIX))
    }

    fn json_schema(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        // Serialized as a prefixed string, so the schema is a plain string
        String::json_schema(generator)
    }
}

/// Macro to define new ID types with minimal boilerplate
#[macro_export]
macro_rules! define_id_type {
    ($type_name:ident, $prefix:expr) => {
        /// Marker type for the ID
        #[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
        pub struct $type_name;

        impl $crate::id::IdType for $type_name {
            const PREFIX: &'static str = $prefix;
        }
    };
}

define_id_type!(UserIdType, "user");
define_id_type!(ConnectionIdType, "conn");
define_id_type!(ConversationIdType, "convo");
define_id_type!(MessageIdType, "msg");
define_id_type!(StoryIdType, "story");
define_id_type!(ReactionIdType, "react");
define_id_type!(OtpIdType, "otp");

/// Type alias for User IDs — the participant identifier everywhere pairing
/// is involved
pub type UserId = Id<UserIdType>;

/// Type alias for Connection IDs
///
/// Canonical values are derived from the two participants via
/// [`ConnectionId::between`](crate::pairing); `generate()` exists for
/// fixtures but a generated value will never match a derived key.
pub type ConnectionId = Id<ConnectionIdType>;

/// Type alias for Conversation IDs (derived for DM threads, random for
/// anything else)
pub type ConversationId = Id<ConversationIdType>;

/// Type alias for Message IDs
pub type MessageId = Id<MessageIdType>;

/// Type alias for Story IDs
pub type StoryId = Id<StoryIdType>;

/// Type alias for Reaction IDs
pub type ReactionId = Id<ReactionIdType>;

/// Type alias for OTP challenge IDs
pub type OtpId = Id<OtpIdType>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let id1 = UserId::generate();
        let id2 = UserId::generate();

        // IDs should be unique
        assert_ne!(id1, id2);

        // IDs should have correct prefix
        assert_eq!(id1.prefix(), "user");
        assert!(id2.to_string().starts_with("user_"));
    }

    #[test]
    fn test_id_parsing() {
        let id = UserId::generate();
        let id_str = id.to_string();

        // Should be able to parse back
        let parsed = UserId::parse(&id_str).unwrap();
        assert_eq!(id, parsed);

        // Should fail with wrong prefix
        assert!(ConnectionId::parse(&id_str).is_err());

        // Should fail with invalid format
        assert!(UserId::parse("invalid").is_err());
        assert!(UserId::parse("user_").is_err());
        assert!(UserId::parse("user_not-a-uuid").is_err());

        // Should succeed with valid format
        let uuid = Uuid::new_v4();
        assert!(UserId::parse(&format!("user_{}", uuid)).is_ok());
    }

    #[test]
    fn test_id_serialization() {
        let id = ConnectionId::generate();

        let json = serde_json::to_string(&id).unwrap();
        let deserialized: ConnectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);

        // Should serialize as "prefix_uuid"
        assert!(json.contains("conn_"));

        // And refuse to deserialize into another type
        assert!(serde_json::from_str::<UserId>(&json).is_err());
    }

    #[test]
    fn test_nil_id() {
        let nil_id = UserId::nil();
        assert!(nil_id.is_nil());
        assert_eq!(
            nil_id.to_string(),
            "user_00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_from_uuid_round_trip() {
        let uuid = Uuid::new_v4();
        let id = StoryId::from_uuid(uuid);
        assert_eq!(id.uuid(), uuid);
    }

    #[test]
    fn test_compact_string_matches_display() {
        let id = MessageId::generate();
        assert_eq!(id.to_compact_string().as_str(), id.to_string().as_str());
    }

    #[test]
    fn test_debug_output_is_clean() {
        let id = UserId::generate();
        let debug = format!("{:?}", id);

        assert!(debug.starts_with("user_"));
        assert!(!debug.contains("PhantomData"));
        assert_eq!(debug, id.to_string());
    }
}
