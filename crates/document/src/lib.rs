//! Scene document engine for scenedoc
//!
//! This crate owns the mutable document and keeps its two views consistent:
//! - Element registries: one record per element with its frame intervals,
//!   static data and data pointers
//! - Frame index: per-frame snapshots of every element present at a frame
//!
//! Every mutation validates its inputs first and then applies the change and
//! all of its cascades in one call, so both views agree after any call
//! returns. Serialization, configuration and a thread-safe handle live here as
//! well.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod element;
pub mod element_data;
pub mod frame_index;
pub mod ontology;
pub mod record;
pub mod registry;
pub mod relation;
pub mod shared;

pub use config::DocumentConfig;
pub use document::Document;
pub use element::{Element, Metadata};
pub use frame_index::{Frame, FrameElement, FrameIndex};
pub use record::DocumentRecord;
pub use registry::ElementRegistry;
pub use relation::RdfRole;
pub use shared::SharedDocument;

/// Schema version written into new documents
pub const SCHEMA_VERSION: &str = "4.3.1";
