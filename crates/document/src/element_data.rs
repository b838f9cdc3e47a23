//! Element data
//!
//! Named values attached to elements. A data name is either:
//! - **static**: one value on the element record, pointer with no frames, and
//!   replicated into every frame entry of a frame-restricted element
//! - **dynamic**: per-frame values in the frame index, pointer listing the
//!   frames that hold one
//!
//! Setting data with frames on a static name (or without frames on a dynamic
//! one) migrates it, so a name is never both at once. Dynamic data grows the
//! element's footprint to cover its frames.

use crate::document::Document;
use scenedoc_core::{
    DataPointer, ElementData, ElementKind, Error, FrameIntervalSet, FrameNum, FrameValue, Result,
    SetMode, Uid,
};
use tracing::debug;

impl Document {
    /// Attach data to an element
    ///
    /// Static frames store the value on the element record. Otherwise the
    /// value is written at each supplied frame and the data's frame coverage
    /// is combined with the existing one according to `mode`; under
    /// [`SetMode::Replace`] values at frames outside the new coverage are
    /// dropped. The element's footprint grows to include the new frames.
    ///
    /// # Errors
    /// - `InvalidFrameInterval` for malformed frame input
    /// - `InvalidOperation` for relations, which carry no data
    /// - `ElementNotFound` if the element does not exist
    /// - `InvalidData` if a number in the value or its attributes is NaN or
    ///   infinite
    pub fn set_element_data(
        &mut self,
        kind: ElementKind,
        uid: Uid,
        data: ElementData,
        frames: impl Into<FrameValue>,
        mode: SetMode,
    ) -> Result<()> {
        let incoming = frames.into().resolve()?;
        if !kind.supports_data() {
            return Err(Error::invalid_operation(format!(
                "{kind} elements do not carry element data"
            )));
        }
        if !self.has(kind, &uid) {
            return Err(Error::not_found(kind, uid));
        }
        if let Some(name) = data.non_finite_name() {
            return Err(Error::InvalidData(format!("'{name}' holds a non-finite number")));
        }

        if incoming.is_empty() {
            self.apply_static_data(kind, uid, data);
        } else {
            self.apply_dynamic_data(kind, uid, data, incoming, mode);
        }
        Ok(())
    }

    fn apply_static_data(&mut self, kind: ElementKind, uid: Uid, data: ElementData) {
        let Some(element) = self.registries.get_mut(kind).get_mut(&uid) else {
            return;
        };
        let previous = element
            .data_pointers
            .insert(data.name.clone(), DataPointer::describe(&data, FrameIntervalSet::new()));
        element.data.upsert(data.clone());
        let footprint = element.frame_intervals.clone();

        if let Some(old) = previous.filter(|p| !p.is_static()) {
            self.frames.remove_data(kind, &uid, &old.frame_intervals, &data.name);
            debug!(target: "scenedoc::data", %kind, %uid, data = %data.name, "Dynamic data made static");
        }
        self.frames.write_data(kind, uid, &footprint, &data);
        debug!(target: "scenedoc::data", %kind, %uid, data = %data.name, "Static data set");
    }

    fn apply_dynamic_data(
        &mut self,
        kind: ElementKind,
        uid: Uid,
        data: ElementData,
        incoming: FrameIntervalSet,
        mode: SetMode,
    ) {
        let Some(element) = self.registries.get_mut(kind).get_mut(&uid) else {
            return;
        };
        let name = data.name.clone();
        let existing = element
            .data_pointers
            .get(&name)
            .filter(|p| !p.is_static())
            .map(|p| p.frame_intervals.clone())
            .unwrap_or_default();
        let target = mode.apply(&existing, &incoming);
        let was_static = element.data.remove(&name).is_some();
        let footprint = element.frame_intervals.clone();
        element
            .data_pointers
            .insert(name.clone(), DataPointer::describe(&data, target.clone()));

        if was_static {
            self.frames.remove_data(kind, &uid, &footprint, &name);
            debug!(target: "scenedoc::data", %kind, %uid, data = %name, "Static data made dynamic");
        }
        self.frames
            .remove_data(kind, &uid, &existing.difference(&target), &name);
        self.set_element_frames(kind, uid, footprint.union(&target));
        self.frames.write_data(kind, uid, &incoming, &data);
        debug!(target: "scenedoc::data", %kind, %uid, data = %name, frames = %target, "Dynamic data set");
    }

    /// Attach data to an object
    pub fn add_object_data(&mut self, uid: Uid, data: ElementData, frames: impl Into<FrameValue>) -> Result<()> {
        self.set_element_data(ElementKind::Object, uid, data, frames, SetMode::Union)
    }

    /// Attach data to an action
    pub fn add_action_data(&mut self, uid: Uid, data: ElementData, frames: impl Into<FrameValue>) -> Result<()> {
        self.set_element_data(ElementKind::Action, uid, data, frames, SetMode::Union)
    }

    /// Attach data to an event
    pub fn add_event_data(&mut self, uid: Uid, data: ElementData, frames: impl Into<FrameValue>) -> Result<()> {
        self.set_element_data(ElementKind::Event, uid, data, frames, SetMode::Union)
    }

    /// Attach data to a context
    pub fn add_context_data(&mut self, uid: Uid, data: ElementData, frames: impl Into<FrameValue>) -> Result<()> {
        self.set_element_data(ElementKind::Context, uid, data, frames, SetMode::Union)
    }

    /// Look up a data value
    ///
    /// With `frame == None` only static data is returned. At a frame, the
    /// frame's own value wins; static data is visible wherever the element is
    /// present (see [`Document::is_present_at`]). Absence is `None`, never an
    /// error.
    pub fn element_data(
        &self,
        kind: ElementKind,
        uid: &Uid,
        name: &str,
        frame: Option<FrameNum>,
    ) -> Option<&ElementData> {
        let element = self.element(kind, uid)?;
        let Some(frame) = frame else {
            return element.static_data(name);
        };
        match self.frames.element(kind, uid, frame) {
            Some(entry) => entry.get(name).or_else(|| element.static_data(name)),
            None if self.is_present_at(kind, uid, frame) => element.static_data(name),
            None => None,
        }
    }

    /// Object data lookup
    pub fn get_object_data(&self, uid: &Uid, name: &str, frame: Option<FrameNum>) -> Option<&ElementData> {
        self.element_data(ElementKind::Object, uid, name, frame)
    }

    /// Action data lookup
    pub fn get_action_data(&self, uid: &Uid, name: &str, frame: Option<FrameNum>) -> Option<&ElementData> {
        self.element_data(ElementKind::Action, uid, name, frame)
    }

    /// Event data lookup
    pub fn get_event_data(&self, uid: &Uid, name: &str, frame: Option<FrameNum>) -> Option<&ElementData> {
        self.element_data(ElementKind::Event, uid, name, frame)
    }

    /// Context data lookup
    pub fn get_context_data(&self, uid: &Uid, name: &str, frame: Option<FrameNum>) -> Option<&ElementData> {
        self.element_data(ElementKind::Context, uid, name, frame)
    }

    /// Pointer for a data name
    pub fn element_data_pointer(&self, kind: ElementKind, uid: &Uid, name: &str) -> Option<&DataPointer> {
        self.element(kind, uid)?.data_pointers.get(name)
    }

    /// Frames holding a dynamic value for `name`; empty for static or unknown data
    pub fn element_data_frame_intervals(&self, kind: ElementKind, uid: &Uid, name: &str) -> FrameIntervalSet {
        self.element_data_pointer(kind, uid, name)
            .map(|p| p.frame_intervals.clone())
            .unwrap_or_default()
    }
}
