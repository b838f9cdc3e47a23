//! Element identifiers
//!
//! Identifiers are either sequential non-negative integers (the default) or
//! UUID v4 values. Both render as plain strings so they can be used as JSON
//! object keys: `"3"` or `"6f1c..."`.

use crate::error::{Error, Result};
use crate::kind::ElementKind;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of an element, unique within its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Uid {
    /// Sequential integer identifier
    Int(u64),
    /// UUID identifier
    Uuid(Uuid),
}

impl Uid {
    /// Create a fresh random UUID identifier
    pub fn new_uuid() -> Self {
        Uid::Uuid(Uuid::new_v4())
    }

    /// Integer value, if this is an integer identifier
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Uid::Int(v) => Some(*v),
            Uid::Uuid(_) => None,
        }
    }

    /// Check if this is a UUID identifier
    pub fn is_uuid(&self) -> bool {
        matches!(self, Uid::Uuid(_))
    }
}

impl From<u64> for Uid {
    fn from(v: u64) -> Self {
        Uid::Int(v)
    }
}

impl From<Uuid> for Uid {
    fn from(v: Uuid) -> Self {
        Uid::Uuid(v)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uid::Int(v) => write!(f, "{}", v),
            Uid::Uuid(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Uid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // canonical decimal only, so "01" and "1" never name the same element
        if let Ok(v) = s.parse::<u64>() {
            if v.to_string() == s {
                return Ok(Uid::Int(v));
            }
            return Err(Error::InvalidUid(s.to_string()));
        }
        Uuid::parse_str(s)
            .map(Uid::Uuid)
            .map_err(|_| Error::InvalidUid(s.to_string()))
    }
}

impl Serialize for Uid {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Reference to an element of any kind
///
/// Used for relation subjects and objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    /// Kind of the referenced element
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Identifier within that kind
    pub uid: Uid,
}

impl ElementRef {
    /// Create a new reference
    pub fn new(kind: ElementKind, uid: impl Into<Uid>) -> Self {
        Self {
            kind,
            uid: uid.into(),
        }
    }

    /// Reference to an object
    pub fn object(uid: impl Into<Uid>) -> Self {
        Self::new(ElementKind::Object, uid)
    }

    /// Reference to an action
    pub fn action(uid: impl Into<Uid>) -> Self {
        Self::new(ElementKind::Action, uid)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_and_uuid() {
        assert_eq!("42".parse::<Uid>().unwrap(), Uid::Int(42));
        let uuid = Uuid::new_v4();
        assert_eq!(uuid.to_string().parse::<Uid>().unwrap(), Uid::Uuid(uuid));
        assert!(matches!("-1".parse::<Uid>(), Err(Error::InvalidUid(_))));
        assert!(matches!("car".parse::<Uid>(), Err(Error::InvalidUid(_))));
    }

    #[test]
    fn test_non_canonical_integers_rejected() {
        for text in ["01", "+1", "007", "00"] {
            assert!(matches!(text.parse::<Uid>(), Err(Error::InvalidUid(_))), "{text}");
        }
        assert_eq!("0".parse::<Uid>().unwrap(), Uid::Int(0));
        assert!(serde_json::from_str::<Uid>("\"01\"").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        assert_eq!(serde_json::to_string(&Uid::Int(5)).unwrap(), "\"5\"");
        let back: Uid = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(back, Uid::Int(5));
    }

    #[test]
    fn test_element_ref_json_shape() {
        let r = ElementRef::object(2u64);
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["type"], "object");
        assert_eq!(json["uid"], "2");
        assert_eq!(r.to_string(), "object:2");
    }

    #[test]
    fn test_new_uuid_is_unique() {
        let a = Uid::new_uuid();
        let b = Uid::new_uuid();
        assert!(a.is_uuid());
        assert_ne!(a, b);
        assert_eq!(a.as_int(), None);
    }
}
