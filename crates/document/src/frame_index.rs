//! Per-frame index
//!
//! Maps frame number → element kind → uid → per-frame snapshot. The index
//! mirrors the element registries and never originates state:
//! - An entry exists exactly at the frames of an element's interval set
//! - A snapshot holds dynamic data and replicas of static data at that frame;
//!   an empty snapshot means "present here, consult the element record"
//! - Frames with no entries are pruned, so the set of frame keys is the
//!   document's frame coverage
//!
//! No validation happens here; callers keep calls consistent with the
//! interval sets they maintain.

use scenedoc_core::{DataSet, ElementData, ElementKind, FrameIntervalSet, FrameNum, Uid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Snapshot of one element at one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameElement {
    #[serde(default, skip_serializing_if = "DataSet::is_empty")]
    data: DataSet,
}

impl FrameElement {
    /// Data held at this frame
    pub fn data(&self) -> &DataSet {
        &self.data
    }

    /// Data item by name
    pub fn get(&self, name: &str) -> Option<&ElementData> {
        self.data.get(name)
    }

    pub(crate) fn upsert(&mut self, data: ElementData) {
        self.data.upsert(data);
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<ElementData> {
        self.data.remove(name)
    }
}

/// All element snapshots at one frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    elements: BTreeMap<ElementKind, BTreeMap<Uid, FrameElement>>,
}

impl Frame {
    /// Snapshots of one kind at this frame
    pub fn elements(&self, kind: ElementKind) -> Option<&BTreeMap<Uid, FrameElement>> {
        self.elements.get(&kind)
    }

    /// Snapshot of one element at this frame
    pub fn element(&self, kind: ElementKind, uid: &Uid) -> Option<&FrameElement> {
        self.elements.get(&kind)?.get(uid)
    }

    /// Check if an element has an entry at this frame
    pub fn contains(&self, kind: ElementKind, uid: &Uid) -> bool {
        self.element(kind, uid).is_some()
    }

    /// Check if the frame holds no entries
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of element entries across all kinds
    pub fn len(&self) -> usize {
        self.elements.values().map(BTreeMap::len).sum()
    }
}

/// Frame number → frame record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameIndex {
    frames: BTreeMap<FrameNum, Frame>,
}

impl FrameIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_frames(frames: BTreeMap<FrameNum, Frame>) -> Self {
        let mut index = Self { frames };
        index.frames.retain(|_, frame| {
            frame.elements.retain(|_, by_uid| !by_uid.is_empty());
            !frame.is_empty()
        });
        index
    }

    pub(crate) fn frames(&self) -> &BTreeMap<FrameNum, Frame> {
        &self.frames
    }

    /// Ensure an entry exists, creating the frame if new
    pub fn touch(&mut self, kind: ElementKind, uid: Uid, frame: FrameNum) -> &mut FrameElement {
        self.frames
            .entry(frame)
            .or_default()
            .elements
            .entry(kind)
            .or_default()
            .entry(uid)
            .or_default()
    }

    /// Delete an entry, pruning the frame if it becomes empty
    pub fn remove(&mut self, kind: ElementKind, uid: &Uid, frame: FrameNum) -> Option<FrameElement> {
        let record = self.frames.get_mut(&frame)?;
        let by_uid = record.elements.get_mut(&kind)?;
        let removed = by_uid.remove(uid);
        if by_uid.is_empty() {
            record.elements.remove(&kind);
        }
        if record.is_empty() {
            self.frames.remove(&frame);
            trace!(target: "scenedoc::frames", frame, "Pruned empty frame");
        }
        removed
    }

    /// Frame record, if any element is present at `frame`
    pub fn get(&self, frame: FrameNum) -> Option<&Frame> {
        self.frames.get(&frame)
    }

    /// Snapshot of one element at one frame
    pub fn element(&self, kind: ElementKind, uid: &Uid, frame: FrameNum) -> Option<&FrameElement> {
        self.frames.get(&frame)?.element(kind, uid)
    }

    pub(crate) fn element_mut(
        &mut self,
        kind: ElementKind,
        uid: &Uid,
        frame: FrameNum,
    ) -> Option<&mut FrameElement> {
        self.frames
            .get_mut(&frame)?
            .elements
            .get_mut(&kind)?
            .get_mut(uid)
    }

    /// Ensure entries at every frame of `set`
    pub(crate) fn touch_all(&mut self, kind: ElementKind, uid: Uid, set: &FrameIntervalSet) {
        for frame in set.frames() {
            self.touch(kind, uid, frame);
        }
    }

    /// Delete entries at every frame of `set`
    pub(crate) fn remove_all(&mut self, kind: ElementKind, uid: &Uid, set: &FrameIntervalSet) {
        for frame in set.frames() {
            self.remove(kind, uid, frame);
        }
    }

    /// Write `data` into the entries at every frame of `set`, creating them
    pub(crate) fn write_data(
        &mut self,
        kind: ElementKind,
        uid: Uid,
        set: &FrameIntervalSet,
        data: &ElementData,
    ) {
        for frame in set.frames() {
            self.touch(kind, uid, frame).upsert(data.clone());
        }
    }

    /// Drop the named data from existing entries at every frame of `set`
    ///
    /// Entries stay in place: the element is still present at those frames.
    pub(crate) fn remove_data(&mut self, kind: ElementKind, uid: &Uid, set: &FrameIntervalSet, name: &str) {
        for frame in set.frames() {
            if let Some(entry) = self.element_mut(kind, uid, frame) {
                entry.remove(name);
            }
        }
    }

    /// Check if any element is present at `frame`
    pub fn has_frame(&self, frame: FrameNum) -> bool {
        self.frames.contains_key(&frame)
    }

    /// Frame coverage of the whole document
    pub fn frame_intervals(&self) -> FrameIntervalSet {
        FrameIntervalSet::from_frames(self.frames.keys().copied())
    }

    /// Number of frames holding entries
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if no frame holds entries
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
