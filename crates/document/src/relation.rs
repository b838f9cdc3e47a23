//! Relations
//!
//! A relation is an element whose subjects and objects reference other
//! elements. References are checked when they are added; since elements are
//! never removed, a reference stays valid for the life of the document.
//! Footprint changes follow the same rules as any other element.

use crate::document::Document;
use scenedoc_core::{ElementKind, ElementRef, Error, FrameValue, Result, SetMode, Uid};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Role of a reference within a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfRole {
    /// Subject side
    Subject,
    /// Object side
    Object,
}

impl Document {
    /// Add a relation, or modify it if `uid` already exists
    ///
    /// Under [`SetMode::Union`] new references are appended (duplicates are
    /// skipped) and the frame coverage grows; under [`SetMode::Replace`] both
    /// reference lists and the coverage are replaced.
    ///
    /// # Errors
    /// - `InvalidFrameInterval` for malformed frame input
    /// - `DanglingReference` if any reference names a missing element
    #[allow(clippy::too_many_arguments)]
    pub fn add_relation(
        &mut self,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        subjects: &[ElementRef],
        objects: &[ElementRef],
        frames: impl Into<FrameValue>,
        uid: Option<Uid>,
        mode: SetMode,
    ) -> Result<Uid> {
        self.add_relation_with_ontology(name, semantic_type, subjects, objects, frames, uid, mode, None)
    }

    /// Same as [`Document::add_relation`], also tagging the relation with an ontology
    ///
    /// # Errors
    /// As [`Document::add_relation`], plus `OntologyNotFound` if `ontology`
    /// is not registered.
    #[allow(clippy::too_many_arguments)]
    pub fn add_relation_with_ontology(
        &mut self,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        subjects: &[ElementRef],
        objects: &[ElementRef],
        frames: impl Into<FrameValue>,
        uid: Option<Uid>,
        mode: SetMode,
        ontology: Option<Uid>,
    ) -> Result<Uid> {
        let incoming = frames.into().resolve()?;
        for reference in subjects.iter().chain(objects) {
            self.check_reference(reference)?;
        }
        if let Some(ontology) = &ontology {
            self.check_ontology(ontology)?;
        }

        let uid = self
            .registries
            .get(ElementKind::Relation)
            .peek_uid(uid, self.config.use_uuid);
        self.apply_element(
            ElementKind::Relation,
            uid,
            name.into(),
            semantic_type.into(),
            incoming,
            mode,
            ontology,
        );

        if let Some(relation) = self.registries.get_mut(ElementKind::Relation).get_mut(&uid) {
            match mode {
                SetMode::Replace => {
                    relation.rdf_subjects = subjects.to_vec();
                    relation.rdf_objects = objects.to_vec();
                }
                SetMode::Union => {
                    extend_unique(&mut relation.rdf_subjects, subjects);
                    extend_unique(&mut relation.rdf_objects, objects);
                }
            }
            debug!(
                target: "scenedoc::element",
                %uid,
                subjects = relation.rdf_subjects.len(),
                objects = relation.rdf_objects.len(),
                "Relation references set"
            );
        }
        Ok(uid)
    }

    /// Add a relation with exactly one subject and one object
    ///
    /// # Errors
    /// Same as [`Document::add_relation`].
    pub fn add_relation_subject_object(
        &mut self,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        subject: ElementRef,
        object: ElementRef,
        frames: impl Into<FrameValue>,
    ) -> Result<Uid> {
        self.add_relation(name, semantic_type, &[subject], &[object], frames, None, SetMode::Union)
    }

    /// Append one reference to an existing relation
    ///
    /// Adding a reference that is already present is a no-op.
    ///
    /// # Errors
    /// - `ElementNotFound` if the relation does not exist
    /// - `DanglingReference` if `target` names a missing element
    pub fn add_rdf(&mut self, relation: Uid, role: RdfRole, target: ElementRef) -> Result<()> {
        if !self.has(ElementKind::Relation, &relation) {
            return Err(Error::not_found(ElementKind::Relation, relation));
        }
        self.check_reference(&target)?;

        if let Some(element) = self.registries.get_mut(ElementKind::Relation).get_mut(&relation) {
            let list = match role {
                RdfRole::Subject => &mut element.rdf_subjects,
                RdfRole::Object => &mut element.rdf_objects,
            };
            extend_unique(list, &[target]);
        }
        Ok(())
    }

    /// Whether the relation is frame-restricted; `None` if it does not exist
    pub fn relation_has_frame_intervals(&self, uid: &Uid) -> Option<bool> {
        self.get_relation(uid).map(|r| !r.is_static())
    }

    /// Relations that reference `target` in either role
    pub fn relations_referencing(&self, target: &ElementRef) -> Vec<Uid> {
        self.registry(ElementKind::Relation)
            .iter()
            .filter(|(_, r)| r.references(target))
            .map(|(uid, _)| *uid)
            .collect()
    }

    fn check_reference(&self, reference: &ElementRef) -> Result<()> {
        if self.has(reference.kind, &reference.uid) {
            Ok(())
        } else {
            Err(Error::DanglingReference {
                kind: reference.kind,
                uid: reference.uid,
            })
        }
    }
}

fn extend_unique(list: &mut Vec<ElementRef>, refs: &[ElementRef]) {
    for reference in refs {
        if !list.contains(reference) {
            list.push(*reference);
        }
    }
}
