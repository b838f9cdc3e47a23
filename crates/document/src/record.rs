//! Serialization
//!
//! [`DocumentRecord`] is the serde view of a document. All maps are ordered,
//! so the same document always serializes to the same bytes.
//!
//! Loading is validate-then-apply like every other mutation:
//! - The schema version is compared with [`SCHEMA_VERSION`](crate::SCHEMA_VERSION)
//! - Relation references must resolve
//! - Ontology uids on elements must name a registered ontology
//! - Data pointers and frame entries must lie within their element's frames
//!
//! Interval sets are normalized on deserialization, per-kind uid counters are
//! recomputed and document frame coverage is derived again from the frames.

use crate::config::DocumentConfig;
use crate::document::Document;
use crate::element::{Element, Metadata};
use crate::frame_index::{Frame, FrameIndex};
use crate::registry::ElementRegistry;
use scenedoc_core::{ElementKind, Error, FrameIntervalSet, FrameNum, Result, Uid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Serializable form of a [`Document`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Descriptive metadata
    pub metadata: Metadata,
    /// Ontology URLs by uid
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ontologies: BTreeMap<Uid, String>,
    /// Frame coverage of the document; informational, recomputed on load
    #[serde(default)]
    pub frame_intervals: FrameIntervalSet,
    /// Element records by kind and uid
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub elements: BTreeMap<ElementKind, BTreeMap<Uid, Element>>,
    /// Per-frame snapshots
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub frames: BTreeMap<FrameNum, Frame>,
}

impl Document {
    /// Snapshot the document as a record
    pub fn to_record(&self) -> DocumentRecord {
        let elements = ElementKind::all()
            .iter()
            .map(|&kind| self.registries.get(kind))
            .filter(|registry| !registry.is_empty())
            .map(|registry| (registry.kind(), registry.elements().clone()))
            .collect();
        DocumentRecord {
            metadata: self.metadata.clone(),
            ontologies: self.ontologies.clone(),
            frame_intervals: self.frame_intervals(),
            elements,
            frames: self.frames.frames().clone(),
        }
    }

    /// Rebuild a document from a record
    ///
    /// # Errors
    /// - `SchemaVersionMismatch` if the versions differ and
    ///   `config.strict_schema_version` is set
    /// - `DanglingReference` if a relation names a missing element
    /// - `OntologyNotFound` if an element names an unregistered ontology
    /// - `ElementNotFound` if a frame holds an entry for a missing element
    /// - `InvalidOperation` if data or frame entries lie outside their
    ///   element's frames
    pub fn from_record(record: DocumentRecord, config: DocumentConfig) -> Result<Self> {
        check_schema_version(&record.metadata.schema_version, &config)?;
        validate_elements(&record.elements, &record.ontologies)?;
        validate_frames(&record.elements, &record.frames)?;

        let mut doc = Document::with_config(config);
        doc.metadata = record.metadata;
        doc.ontologies = record.ontologies;
        doc.frames = FrameIndex::from_frames(record.frames);
        for (kind, elements) in record.elements {
            for (uid, element) in &elements {
                doc.frames.touch_all(kind, *uid, &element.frame_intervals);
            }
            doc.registries.set(ElementRegistry::from_elements(kind, elements));
        }

        let coverage = doc.frame_intervals();
        if record.frame_intervals != coverage {
            debug!(
                target: "scenedoc::io",
                recorded = %record.frame_intervals,
                derived = %coverage,
                "Recorded frame intervals differ from frames, using derived"
            );
        }
        info!(
            target: "scenedoc::io",
            frames = doc.frames.len(),
            objects = doc.num_elements(ElementKind::Object),
            relations = doc.num_elements(ElementKind::Relation),
            "Document loaded"
        );
        Ok(doc)
    }

    /// Serialize to JSON
    ///
    /// # Errors
    /// Returns `Serialization` if encoding fails.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let record = self.to_record();
        let text = if pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        Ok(text)
    }

    /// Parse a JSON document with the default configuration
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, otherwise as [`Document::from_record`].
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_json_with_config(text, DocumentConfig::default())
    }

    /// Parse a JSON document
    ///
    /// # Errors
    /// `Serialization` for malformed JSON, otherwise as [`Document::from_record`].
    pub fn from_json_with_config(text: &str, config: DocumentConfig) -> Result<Self> {
        let record: DocumentRecord = serde_json::from_str(text)?;
        Self::from_record(record, config)
    }
}

fn check_schema_version(found: &str, config: &DocumentConfig) -> Result<()> {
    if found == crate::SCHEMA_VERSION {
        return Ok(());
    }
    if config.strict_schema_version {
        return Err(Error::SchemaVersionMismatch {
            expected: crate::SCHEMA_VERSION.to_string(),
            found: found.to_string(),
        });
    }
    warn!(
        target: "scenedoc::io",
        expected = crate::SCHEMA_VERSION,
        found,
        "Schema version mismatch, loading anyway"
    );
    Ok(())
}

fn validate_elements(
    elements: &BTreeMap<ElementKind, BTreeMap<Uid, Element>>,
    ontologies: &BTreeMap<Uid, String>,
) -> Result<()> {
    let exists = |kind: ElementKind, uid: &Uid| elements.get(&kind).map_or(false, |m| m.contains_key(uid));

    for (&kind, by_uid) in elements {
        for (uid, element) in by_uid {
            if let Some(ontology) = element.ontology_uid.filter(|o| !ontologies.contains_key(o)) {
                return Err(Error::OntologyNotFound(ontology));
            }
            for reference in element.rdf_subjects.iter().chain(&element.rdf_objects) {
                if !exists(reference.kind, &reference.uid) {
                    return Err(Error::DanglingReference {
                        kind: reference.kind,
                        uid: reference.uid,
                    });
                }
            }
            for (name, pointer) in &element.data_pointers {
                if !element.frame_intervals.contains(&pointer.frame_intervals) {
                    return Err(Error::invalid_operation(format!(
                        "data '{name}' of {kind} {uid} covers frames outside the element"
                    )));
                }
            }
        }
    }
    Ok(())
}

fn validate_frames(
    elements: &BTreeMap<ElementKind, BTreeMap<Uid, Element>>,
    frames: &BTreeMap<FrameNum, Frame>,
) -> Result<()> {
    for (&frame, snapshot) in frames {
        for &kind in ElementKind::all() {
            let Some(by_uid) = snapshot.elements(kind) else {
                continue;
            };
            for uid in by_uid.keys() {
                let element = elements
                    .get(&kind)
                    .and_then(|m| m.get(uid))
                    .ok_or_else(|| Error::not_found(kind, *uid))?;
                if !element.frame_intervals.contains_frame(frame) {
                    return Err(Error::invalid_operation(format!(
                        "frame {frame} holds {kind} {uid} outside its frame intervals"
                    )));
                }
            }
        }
    }
    Ok(())
}
