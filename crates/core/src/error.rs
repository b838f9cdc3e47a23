//! Error types for scenedoc
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Absence of data at a frame is never an error: queries return `Option`.
//! Errors are reserved for rejected mutations, and every mutation validates
//! before it touches state, so an `Err` always means nothing changed.

use crate::interval::FrameNum;
use crate::kind::ElementKind;
use crate::uid::Uid;
use thiserror::Error;

/// Result type alias for scenedoc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for scenedoc
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Interval with `start > end`
    #[error("Invalid frame interval: start {start} is after end {end}")]
    InvalidFrameInterval {
        /// First frame of the rejected interval
        start: FrameNum,
        /// Last frame of the rejected interval
        end: FrameNum,
    },

    /// No element with this uid exists for the kind
    #[error("{kind} {uid} not found")]
    ElementNotFound {
        /// Kind that was searched
        kind: ElementKind,
        /// Missing identifier
        uid: Uid,
    },

    /// A relation references an element that does not exist
    #[error("Dangling reference to {kind} {uid}")]
    DanglingReference {
        /// Kind of the referenced element
        kind: ElementKind,
        /// Identifier of the referenced element
        uid: Uid,
    },

    /// Operation is not supported in this context
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Data value cannot be stored, e.g. a NaN or infinite number
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// No ontology with this uid is registered
    #[error("Ontology {0} not found")]
    OntologyNotFound(Uid),

    /// Identifier text is neither an integer nor a UUID
    #[error("Invalid uid: {0}")]
    InvalidUid(String),

    /// Loaded document was written for a different schema
    #[error("Schema version mismatch: expected {expected}, found {found}")]
    SchemaVersionMismatch {
        /// Version this library writes
        expected: String,
        /// Version found in the loaded document
        found: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for [`Error::ElementNotFound`]
    pub fn not_found(kind: ElementKind, uid: Uid) -> Self {
        Error::ElementNotFound { kind, uid }
    }

    /// Shorthand for [`Error::InvalidOperation`]
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Error::InvalidOperation(msg.into())
    }

    /// True for lookup failures on unknown identifiers
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ElementNotFound { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_interval() {
        let err = Error::InvalidFrameInterval { start: 10, end: 5 };
        let msg = err.to_string();
        assert!(msg.contains("Invalid frame interval"));
        assert!(msg.contains("10"));
        assert!(msg.contains("5"));
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::not_found(ElementKind::Action, Uid::Int(7));
        assert_eq!(err.to_string(), "action 7 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_display_dangling_reference() {
        let err = Error::DanglingReference {
            kind: ElementKind::Object,
            uid: Uid::Int(3),
        };
        let msg = err.to_string();
        assert!(msg.contains("Dangling reference"));
        assert!(msg.contains("object 3"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_display_schema_mismatch() {
        let err = Error::SchemaVersionMismatch {
            expected: "4.3.1".to_string(),
            found: "4.2.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("4.3.1"));
        assert!(msg.contains("4.2.0"));
    }

    #[test]
    fn test_error_display_data_and_ontology() {
        assert_eq!(Error::InvalidData("x".to_string()).to_string(), "Invalid data: x");
        assert_eq!(Error::OntologyNotFound(Uid::Int(2)).to_string(), "Ontology 2 not found");
    }

    #[test]
    fn test_error_from_serde_json() {
        let result: std::result::Result<u64, serde_json::Error> = serde_json::from_str("not json");
        let err: Error = result.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let result: std::result::Result<toml::Value, toml::de::Error> = toml::from_str("= broken");
        let err: Error = result.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
