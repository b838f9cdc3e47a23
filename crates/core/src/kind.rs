//! Element kind enumeration
//!
//! A scene document holds five kinds of elements:
//!
//! | Kind | Purpose | Carries element data |
//! |------|---------|----------------------|
//! | Object | Physical things (cars, pedestrians, lane markings) | yes |
//! | Action | Activities performed over time | yes |
//! | Event | Instantaneous or short occurrences | yes |
//! | Context | Scene-wide conditions (weather, location) | yes |
//! | Relation | Subject/object links between elements | no |
//!
//! Identifiers are unique within a kind only, so every lookup is keyed by
//! `(ElementKind, Uid)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five kinds of elements in a scene document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Physical entity
    Object,
    /// Activity spanning frames
    Action,
    /// Occurrence
    Event,
    /// Scene condition
    Context,
    /// Link between elements
    Relation,
}

impl ElementKind {
    /// All element kinds (for iteration)
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Object,
        ElementKind::Action,
        ElementKind::Event,
        ElementKind::Context,
        ElementKind::Relation,
    ];

    /// Get all element kinds as a slice
    pub fn all() -> &'static [ElementKind] {
        &Self::ALL
    }

    /// Short identifier (for serialization and logs)
    pub const fn name(&self) -> &'static str {
        match self {
            ElementKind::Object => "object",
            ElementKind::Action => "action",
            ElementKind::Event => "event",
            ElementKind::Context => "context",
            ElementKind::Relation => "relation",
        }
    }

    /// Parse from short identifier
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "object" => Some(ElementKind::Object),
            "action" => Some(ElementKind::Action),
            "event" => Some(ElementKind::Event),
            "context" => Some(ElementKind::Context),
            "relation" => Some(ElementKind::Relation),
            _ => None,
        }
    }

    /// Check if elements of this kind can carry element data
    ///
    /// Relations only carry subject/object references.
    pub const fn supports_data(&self) -> bool {
        !matches!(self, ElementKind::Relation)
    }

    /// Check if a frame-less element of this kind spans the whole document
    ///
    /// Frame-less relations stay frame-less; every other kind is assumed to
    /// exist wherever the document has frames.
    pub const fn spans_document_when_static(&self) -> bool {
        !matches!(self, ElementKind::Relation)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_round_trip_by_name() {
        for kind in ElementKind::all() {
            assert_eq!(ElementKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(ElementKind::from_name("objects"), None);
    }

    #[test]
    fn test_only_relations_reject_data() {
        let with_data: Vec<_> = ElementKind::ALL
            .iter()
            .filter(|k| k.supports_data())
            .collect();
        assert_eq!(with_data.len(), 4);
        assert!(!ElementKind::Relation.supports_data());
        assert!(!ElementKind::Relation.spans_document_when_static());
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ElementKind::Context).unwrap();
        assert_eq!(json, "\"context\"");
        let kind: ElementKind = serde_json::from_str("\"relation\"").unwrap();
        assert_eq!(kind, ElementKind::Relation);
    }
}
