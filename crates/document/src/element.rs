//! Element records
//!
//! An [`Element`] is the per-entity view of the document: identity, temporal
//! footprint, static data and the data pointers summarizing where each data
//! name lives. Per-frame values live in the frame index.

use scenedoc_core::{DataPointer, DataSet, ElementData, ElementRef, FrameIntervalSet, Uid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record of one element
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Element {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) semantic_type: String,
    #[serde(default)]
    pub(crate) frame_intervals: FrameIntervalSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) ontology_uid: Option<Uid>,
    #[serde(default, skip_serializing_if = "DataSet::is_empty")]
    pub(crate) data: DataSet,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) data_pointers: BTreeMap<String, DataPointer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) rdf_subjects: Vec<ElementRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) rdf_objects: Vec<ElementRef>,
}

impl Element {
    pub(crate) fn new(name: String, semantic_type: String, frame_intervals: FrameIntervalSet) -> Self {
        Self {
            name,
            semantic_type,
            frame_intervals,
            ..Default::default()
        }
    }

    /// Ontology the semantic type is drawn from, if tagged
    pub fn ontology_uid(&self) -> Option<&Uid> {
        self.ontology_uid.as_ref()
    }

    /// Display name (not required to be unique)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic type, e.g. `#Pedestrian`
    pub fn semantic_type(&self) -> &str {
        &self.semantic_type
    }

    /// Temporal footprint; empty for static elements
    pub fn frame_intervals(&self) -> &FrameIntervalSet {
        &self.frame_intervals
    }

    /// Check if the element has no frame restriction
    pub fn is_static(&self) -> bool {
        self.frame_intervals.is_empty()
    }

    /// Static data held on the record
    pub fn data(&self) -> &DataSet {
        &self.data
    }

    /// Static data item by name
    pub fn static_data(&self, name: &str) -> Option<&ElementData> {
        self.data.get(name)
    }

    /// Data pointers, by data name
    pub fn data_pointers(&self) -> &BTreeMap<String, DataPointer> {
        &self.data_pointers
    }

    /// Relation subjects (empty for other kinds)
    pub fn rdf_subjects(&self) -> &[ElementRef] {
        &self.rdf_subjects
    }

    /// Relation objects (empty for other kinds)
    pub fn rdf_objects(&self) -> &[ElementRef] {
        &self.rdf_objects
    }

    /// Check if any relation role references `target`
    pub fn references(&self, target: &ElementRef) -> bool {
        self.rdf_subjects.contains(target) || self.rdf_objects.contains(target)
    }
}

/// Document-level descriptive metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Schema version the document conforms to
    pub schema_version: String,
    /// Document name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Who produced the annotations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotator: Option<String>,
    /// Free-form comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Version of the annotation file itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_version: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            schema_version: crate::SCHEMA_VERSION.to_string(),
            name: None,
            annotator: None,
            comment: None,
            file_version: None,
        }
    }
}
