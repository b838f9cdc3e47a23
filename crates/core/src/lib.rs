//! Core types for scenedoc
//!
//! This crate defines the foundational types used throughout the system:
//! - FrameInterval / FrameIntervalSet: closed frame ranges and their algebra
//! - FrameValue / SetMode: how callers describe and combine frame coverage
//! - ElementKind: object, action, event, context, relation
//! - Uid / ElementRef: identifiers and cross-kind references
//! - DataValue / ElementData / DataSet / DataPointer: typed element data
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod data;
pub mod error;
pub mod interval;
pub mod kind;
pub mod uid;

pub use data::{DataPointer, DataSet, DataType, DataValue, ElementData, Poly2dMode};
pub use error::{Error, Result};
pub use interval::{FrameInterval, FrameIntervalSet, FrameNum, FrameValue, Frames, SetMode};
pub use kind::ElementKind;
pub use uid::{ElementRef, Uid};
