//! Scene document
//!
//! The [`Document`] owns the five element registries and the frame index and
//! keeps them synchronized:
//!
//! - The registries hold the per-element view (footprint, static data, data
//!   pointers)
//! - The frame index holds the per-frame view, derived from the registries
//!
//! ## Mutation Model
//!
//! Every public mutation validates first (interval input, element lookup,
//! references) and only then applies. The apply phase cannot fail, so a
//! rejected call leaves the document untouched. Frame deltas are computed with
//! the interval algebra and only the gained or lost frames are visited.
//!
//! ## Modifying Footprints
//!
//! Changing an element's interval set clamps everything attached to it in the
//! same call: entries at lost frames are deleted together with their data,
//! dynamic data pointers are intersected with the new footprint, and static
//! data is replicated into gained frames.

use crate::config::DocumentConfig;
use crate::element::{Element, Metadata};
use crate::frame_index::{Frame, FrameIndex};
use crate::registry::ElementRegistry;
use scenedoc_core::{
    ElementData, ElementKind, FrameIntervalSet, FrameNum, FrameValue, Result, SetMode, Uid,
};
use std::collections::BTreeMap;
use tracing::debug;

/// One registry per element kind
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Registries {
    objects: ElementRegistry,
    actions: ElementRegistry,
    events: ElementRegistry,
    contexts: ElementRegistry,
    relations: ElementRegistry,
}

impl Default for Registries {
    fn default() -> Self {
        Self {
            objects: ElementRegistry::new(ElementKind::Object),
            actions: ElementRegistry::new(ElementKind::Action),
            events: ElementRegistry::new(ElementKind::Event),
            contexts: ElementRegistry::new(ElementKind::Context),
            relations: ElementRegistry::new(ElementKind::Relation),
        }
    }
}

impl Registries {
    pub(crate) fn get(&self, kind: ElementKind) -> &ElementRegistry {
        match kind {
            ElementKind::Object => &self.objects,
            ElementKind::Action => &self.actions,
            ElementKind::Event => &self.events,
            ElementKind::Context => &self.contexts,
            ElementKind::Relation => &self.relations,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: ElementKind) -> &mut ElementRegistry {
        match kind {
            ElementKind::Object => &mut self.objects,
            ElementKind::Action => &mut self.actions,
            ElementKind::Event => &mut self.events,
            ElementKind::Context => &mut self.contexts,
            ElementKind::Relation => &mut self.relations,
        }
    }

    pub(crate) fn set(&mut self, registry: ElementRegistry) {
        let kind = registry.kind();
        *self.get_mut(kind) = registry;
    }
}

/// In-memory scene document
///
/// ## Example
///
/// ```rust
/// use scenedoc_document::Document;
/// use scenedoc_core::{ElementData, FrameValue};
///
/// let mut doc = Document::new();
/// let uid = doc.add_object("car1", "#Car", FrameValue::Interval(0, 10)).unwrap();
/// doc.add_object_data(uid, ElementData::text("color", "red"), FrameValue::Static).unwrap();
///
/// let color = doc.get_object_data(&uid, "color", Some(5)).unwrap();
/// assert_eq!(color.value.as_text(), Some("red"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub(crate) config: DocumentConfig,
    pub(crate) metadata: Metadata,
    pub(crate) ontologies: BTreeMap<Uid, String>,
    pub(crate) registries: Registries,
    pub(crate) frames: FrameIndex,
}

impl Document {
    /// Create an empty document with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Descriptive metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Set the document name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata.name = Some(name.into());
    }

    /// Set the annotator
    pub fn set_annotator(&mut self, annotator: impl Into<String>) {
        self.metadata.annotator = Some(annotator.into());
    }

    /// Set the comment
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.metadata.comment = Some(comment.into());
    }

    /// Set the file version
    pub fn set_file_version(&mut self, version: impl Into<String>) {
        self.metadata.file_version = Some(version.into());
    }

    // ========================================================================
    // Element mutation
    // ========================================================================

    /// Add an element, or modify it if `uid` already exists
    ///
    /// - `uid == None` mints the next identifier for the kind
    /// - An unknown `uid` creates the element under that identifier
    /// - A known `uid` updates name and semantic type and combines the frame
    ///   coverage according to `mode`. Under [`SetMode::Replace`], frames no
    ///   longer covered are dropped together with all data at those frames.
    ///
    /// # Errors
    /// Returns `InvalidFrameInterval` for malformed frame input.
    pub fn add_element(
        &mut self,
        kind: ElementKind,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        frames: impl Into<FrameValue>,
        uid: Option<Uid>,
        mode: SetMode,
    ) -> Result<Uid> {
        self.add_element_with_ontology(kind, name, semantic_type, frames, uid, mode, None)
    }

    /// Same as [`Document::add_element`], also tagging the element with an ontology
    ///
    /// `ontology == None` keeps whatever ontology the element already has.
    ///
    /// # Errors
    /// - `InvalidFrameInterval` for malformed frame input
    /// - `OntologyNotFound` if `ontology` is not registered
    #[allow(clippy::too_many_arguments)]
    pub fn add_element_with_ontology(
        &mut self,
        kind: ElementKind,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        frames: impl Into<FrameValue>,
        uid: Option<Uid>,
        mode: SetMode,
        ontology: Option<Uid>,
    ) -> Result<Uid> {
        let incoming = frames.into().resolve()?;
        if let Some(ontology) = &ontology {
            self.check_ontology(ontology)?;
        }
        let uid = self.registries.get(kind).peek_uid(uid, self.config.use_uuid);
        self.apply_element(kind, uid, name.into(), semantic_type.into(), incoming, mode, ontology);
        Ok(uid)
    }

    /// Add an object with a minted uid
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        frames: impl Into<FrameValue>,
    ) -> Result<Uid> {
        self.add_element(ElementKind::Object, name, semantic_type, frames, None, SetMode::Union)
    }

    /// Add an action with a minted uid
    pub fn add_action(
        &mut self,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        frames: impl Into<FrameValue>,
    ) -> Result<Uid> {
        self.add_element(ElementKind::Action, name, semantic_type, frames, None, SetMode::Union)
    }

    /// Add an event with a minted uid
    pub fn add_event(
        &mut self,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        frames: impl Into<FrameValue>,
    ) -> Result<Uid> {
        self.add_element(ElementKind::Event, name, semantic_type, frames, None, SetMode::Union)
    }

    /// Add a context with a minted uid
    pub fn add_context(
        &mut self,
        name: impl Into<String>,
        semantic_type: impl Into<String>,
        frames: impl Into<FrameValue>,
    ) -> Result<Uid> {
        self.add_element(ElementKind::Context, name, semantic_type, frames, None, SetMode::Union)
    }

    /// Create or modify an element record; infallible once inputs are valid
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn apply_element(
        &mut self,
        kind: ElementKind,
        uid: Uid,
        name: String,
        semantic_type: String,
        incoming: FrameIntervalSet,
        mode: SetMode,
        ontology: Option<Uid>,
    ) {
        let registry = self.registries.get_mut(kind);
        let target = match registry.get_mut(&uid) {
            Some(element) => {
                element.name = name;
                element.semantic_type = semantic_type;
                if ontology.is_some() {
                    element.ontology_uid = ontology;
                }
                mode.apply(&element.frame_intervals, &incoming)
            }
            None => {
                debug!(target: "scenedoc::element", %kind, %uid, frames = %incoming, "Element created");
                let mut element = Element::new(name, semantic_type, incoming.clone());
                element.ontology_uid = ontology;
                registry.insert(uid, element);
                self.frames.touch_all(kind, uid, &incoming);
                return;
            }
        };
        self.set_element_frames(kind, uid, target);
    }

    /// Move an element to a new footprint, clamping everything attached to it
    pub(crate) fn set_element_frames(&mut self, kind: ElementKind, uid: Uid, target: FrameIntervalSet) {
        let Some(element) = self.registries.get_mut(kind).get_mut(&uid) else {
            return;
        };
        if element.frame_intervals == target {
            return;
        }
        let old = std::mem::replace(&mut element.frame_intervals, target.clone());
        let gained = target.difference(&old);
        let lost = old.difference(&target);

        element.data_pointers.retain(|name, pointer| {
            if pointer.is_static() {
                return true;
            }
            pointer.frame_intervals = pointer.frame_intervals.intersection(&target);
            if pointer.frame_intervals.is_empty() {
                debug!(target: "scenedoc::data", %kind, %uid, data = %name, "Dynamic data clamped out of element footprint");
                return false;
            }
            true
        });
        let replicas: Vec<ElementData> = element.data.iter().cloned().collect();

        self.frames.remove_all(kind, &uid, &lost);
        self.frames.touch_all(kind, uid, &gained);
        for data in &replicas {
            self.frames.write_data(kind, uid, &gained, data);
        }
        debug!(
            target: "scenedoc::element",
            %kind, %uid, old = %old, new = %target,
            "Element frame intervals updated"
        );
    }

    // ========================================================================
    // Element queries
    // ========================================================================

    /// Registry of one kind
    pub fn registry(&self, kind: ElementKind) -> &ElementRegistry {
        self.registries.get(kind)
    }

    /// Check if the element exists
    pub fn has(&self, kind: ElementKind, uid: &Uid) -> bool {
        self.registries.get(kind).contains(uid)
    }

    /// Element record
    pub fn element(&self, kind: ElementKind, uid: &Uid) -> Option<&Element> {
        self.registries.get(kind).get(uid)
    }

    /// Object record
    pub fn get_object(&self, uid: &Uid) -> Option<&Element> {
        self.element(ElementKind::Object, uid)
    }

    /// Action record
    pub fn get_action(&self, uid: &Uid) -> Option<&Element> {
        self.element(ElementKind::Action, uid)
    }

    /// Event record
    pub fn get_event(&self, uid: &Uid) -> Option<&Element> {
        self.element(ElementKind::Event, uid)
    }

    /// Context record
    pub fn get_context(&self, uid: &Uid) -> Option<&Element> {
        self.element(ElementKind::Context, uid)
    }

    /// Relation record
    pub fn get_relation(&self, uid: &Uid) -> Option<&Element> {
        self.element(ElementKind::Relation, uid)
    }

    /// All uids of a kind, in order
    pub fn element_uids(&self, kind: ElementKind) -> Vec<Uid> {
        self.registries.get(kind).uids()
    }

    /// Number of elements of a kind
    pub fn num_elements(&self, kind: ElementKind) -> usize {
        self.registries.get(kind).len()
    }

    /// First element (in uid order) with this name
    pub fn element_uid_by_name(&self, kind: ElementKind, name: &str) -> Option<Uid> {
        self.registries
            .get(kind)
            .iter()
            .find(|(_, e)| e.name == name)
            .map(|(uid, _)| *uid)
    }

    /// Elements with this semantic type
    pub fn elements_of_type(&self, kind: ElementKind, semantic_type: &str) -> Vec<Uid> {
        self.registries
            .get(kind)
            .iter()
            .filter(|(_, e)| e.semantic_type == semantic_type)
            .map(|(uid, _)| *uid)
            .collect()
    }

    /// Elements having a data pointer with this name
    pub fn elements_with_data_name(&self, kind: ElementKind, data_name: &str) -> Vec<Uid> {
        self.registries
            .get(kind)
            .iter()
            .filter(|(_, e)| e.data_pointers.contains_key(data_name))
            .map(|(uid, _)| *uid)
            .collect()
    }

    /// Element footprint; empty for static or unknown elements
    pub fn element_frame_intervals(&self, kind: ElementKind, uid: &Uid) -> FrameIntervalSet {
        self.element(kind, uid)
            .map(|e| e.frame_intervals.clone())
            .unwrap_or_default()
    }

    // ========================================================================
    // Frame queries
    // ========================================================================

    /// Frame record, or `None` if nothing is present at `frame`
    pub fn frame(&self, frame: FrameNum) -> Option<&Frame> {
        self.frames.get(frame)
    }

    /// Check if anything is present at `frame`
    pub fn has_frame(&self, frame: FrameNum) -> bool {
        self.frames.has_frame(frame)
    }

    /// Frame coverage of the whole document
    pub fn frame_intervals(&self) -> FrameIntervalSet {
        self.frames.frame_intervals()
    }

    /// The per-frame index
    pub fn frame_index(&self) -> &FrameIndex {
        &self.frames
    }

    /// Check if the element is present at `frame`
    ///
    /// Frame-restricted elements are present at their own frames. A static
    /// element of a kind that spans the document is present at every frame
    /// the document has.
    pub fn is_present_at(&self, kind: ElementKind, uid: &Uid, frame: FrameNum) -> bool {
        let Some(element) = self.element(kind, uid) else {
            return false;
        };
        if element.is_static() {
            kind.spans_document_when_static() && self.frames.has_frame(frame)
        } else {
            element.frame_intervals.contains_frame(frame)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_uids_per_kind() {
        let mut doc = Document::new();
        let o0 = doc.add_object("a", "#Car", FrameValue::Static).unwrap();
        let o1 = doc.add_object("b", "#Car", FrameValue::Static).unwrap();
        let a0 = doc.add_action("c", "#Walk", FrameValue::Static).unwrap();
        assert_eq!((o0, o1, a0), (Uid::Int(0), Uid::Int(1), Uid::Int(0)));
    }

    #[test]
    fn test_new_element_materializes_frames() {
        let mut doc = Document::new();
        let uid = doc.add_object("car", "#Car", FrameValue::Interval(2, 4)).unwrap();
        for f in 2..=4 {
            assert!(doc.frame(f).unwrap().contains(ElementKind::Object, &uid));
        }
        assert!(doc.frame(5).is_none());
        assert_eq!(doc.frame_intervals().to_pairs(), vec![(2, 4)]);
    }

    #[test]
    fn test_invalid_frames_leave_document_untouched() {
        let mut doc = Document::new();
        let err = doc.add_object("car", "#Car", FrameValue::Interval(9, 3)).unwrap_err();
        assert!(matches!(err, scenedoc_core::Error::InvalidFrameInterval { .. }));
        assert_eq!(doc, Document::new());
        assert_eq!(doc.add_object("car", "#Car", FrameValue::Static).unwrap(), Uid::Int(0));
    }

    #[test]
    fn test_modification_updates_name_and_type() {
        let mut doc = Document::new();
        let uid = doc.add_object("car", "#Car", FrameValue::Static).unwrap();
        doc.add_element(ElementKind::Object, "truck", "#Truck", FrameValue::Static, Some(uid), SetMode::Union)
            .unwrap();
        let element = doc.get_object(&uid).unwrap();
        assert_eq!(element.name(), "truck");
        assert_eq!(element.semantic_type(), "#Truck");
        assert_eq!(doc.num_elements(ElementKind::Object), 1);
    }

    #[test]
    fn test_unknown_supplied_uid_creates_element() {
        let mut doc = Document::new();
        let uid = doc
            .add_element(ElementKind::Event, "start", "#Start", FrameValue::Frame(3), Some(Uid::Int(5)), SetMode::Replace)
            .unwrap();
        assert_eq!(uid, Uid::Int(5));
        assert_eq!(doc.add_event("next", "#Start", FrameValue::Static).unwrap(), Uid::Int(6));
    }

    #[test]
    fn test_lookup_helpers() {
        let mut doc = Document::new();
        let a = doc.add_object("a", "#Car", FrameValue::Static).unwrap();
        let b = doc.add_object("b", "#Ped", FrameValue::Static).unwrap();
        let c = doc.add_object("c", "#Car", FrameValue::Static).unwrap();
        assert_eq!(doc.element_uid_by_name(ElementKind::Object, "b"), Some(b));
        assert_eq!(doc.element_uid_by_name(ElementKind::Object, "z"), None);
        assert_eq!(doc.elements_of_type(ElementKind::Object, "#Car"), vec![a, c]);
        assert_eq!(doc.element_uids(ElementKind::Object), vec![a, b, c]);
        assert!(doc.element_uids(ElementKind::Context).is_empty());
    }

    #[test]
    fn test_metadata_setters() {
        let mut doc = Document::new();
        doc.set_annotator("alice");
        doc.set_comment("first pass");
        assert_eq!(doc.metadata().annotator.as_deref(), Some("alice"));
        assert_eq!(doc.metadata().comment.as_deref(), Some("first pass"));
        assert_eq!(doc.metadata().schema_version, crate::SCHEMA_VERSION);
    }

    #[test]
    fn test_uuid_config_mints_uuids() {
        let mut doc = Document::with_config(DocumentConfig {
            use_uuid: true,
            ..Default::default()
        });
        let uid = doc.add_context("weather", "#Rain", FrameValue::Static).unwrap();
        assert!(uid.is_uuid());
        assert!(doc.get_context(&uid).is_some());
    }
}
