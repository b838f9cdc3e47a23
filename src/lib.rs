//! scenedoc - Temporally-annotated scene documents
//!
//! A scene document describes the elements of a recorded scene (objects,
//! actions, events, contexts and the relations between them) and which frames
//! each of them, and each piece of their data, is valid for.
//!
//! # Quick Start
//!
//! ```rust
//! use scenedoc::{Document, ElementData, FrameValue, SetMode, ElementKind};
//!
//! let mut doc = Document::new();
//! let ped = doc.add_object("ped1", "#Pedestrian", FrameValue::Interval(0, 20)).unwrap();
//! doc.add_object_data(ped, ElementData::bbox("box", [10.0, 20.0, 4.0, 8.0]), FrameValue::Interval(5, 10))
//!     .unwrap();
//!
//! // Shrinking the footprint drops data at the removed frames
//! doc.add_element(ElementKind::Object, "ped1", "#Pedestrian", FrameValue::Interval(0, 7), Some(ped), SetMode::Replace)
//!     .unwrap();
//! assert!(doc.get_object_data(&ped, "box", Some(9)).is_none());
//! assert!(doc.get_object_data(&ped, "box", Some(6)).is_some());
//! ```
//!
//! # Architecture
//!
//! - [`scenedoc_core`]: interval algebra, identifiers, typed data, errors
//! - [`scenedoc_document`]: registries, frame index, mutations, serialization

pub use scenedoc_core::*;
pub use scenedoc_document::*;
