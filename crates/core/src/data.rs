//! Typed element data
//!
//! This module defines:
//! - DataValue: closed enum of the value shapes an element can carry
//! - DataType: the matching type tag, recorded in data pointers
//! - ElementData: a named value plus nested attributes
//! - DataSet: ordered, name-unique container of element data
//! - DataPointer: per-element summary of where a data name lives in time
//!
//! ## Naming Rule
//!
//! Within one container a data name is unique. Adding an item whose name is
//! already present overwrites the existing item in its slot, whatever its
//! type. The same rule applies to nested attributes.

use crate::interval::FrameIntervalSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Drawing mode of a 2D polyline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Poly2dMode {
    /// Points are absolute coordinates
    #[default]
    Absolute,
    /// Points are a start point followed by relative moves
    Relative,
    /// Simple run-length chain code
    ChainCode,
}

/// Value carried by element data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "val", rename_all = "lowercase")]
pub enum DataValue {
    /// Flag
    Boolean(bool),
    /// Free text
    Text(String),
    /// Single number
    Num(f64),
    /// Generic numeric vector
    Vec(Vec<f64>),
    /// Axis-aligned box `(x, y, w, h)`
    Bbox([f64; 4]),
    /// Rotated box `(x, y, w, h, alpha)`
    Rbbox([f64; 5]),
    /// 2D point
    Point2d([f64; 2]),
    /// 3D point
    Point3d([f64; 3]),
    /// 2D polyline
    Poly2d {
        /// Flattened coordinates
        points: Vec<f64>,
        /// How `points` are encoded
        mode: Poly2dMode,
        /// Whether the last point connects to the first
        closed: bool,
    },
    /// 3D polyline
    Poly3d {
        /// Flattened coordinates
        points: Vec<f64>,
        /// Whether the last point connects to the first
        closed: bool,
    },
    /// Cuboid pose and size, quaternion or euler form
    Cuboid(Vec<f64>),
    /// Row-major matrix
    Mat {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
        /// Row-major values
        data: Vec<f64>,
    },
    /// Encoded blob (e.g. base64 RLE mask)
    Binary {
        /// Encoding name
        encoding: String,
        /// Encoded payload
        data: String,
    },
}

/// Type tag of a [`DataValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// See [`DataValue::Boolean`]
    Boolean,
    /// See [`DataValue::Text`]
    Text,
    /// See [`DataValue::Num`]
    Num,
    /// See [`DataValue::Vec`]
    Vec,
    /// See [`DataValue::Bbox`]
    Bbox,
    /// See [`DataValue::Rbbox`]
    Rbbox,
    /// See [`DataValue::Point2d`]
    Point2d,
    /// See [`DataValue::Point3d`]
    Point3d,
    /// See [`DataValue::Poly2d`]
    Poly2d,
    /// See [`DataValue::Poly3d`]
    Poly3d,
    /// See [`DataValue::Cuboid`]
    Cuboid,
    /// See [`DataValue::Mat`]
    Mat,
    /// See [`DataValue::Binary`]
    Binary,
}

impl DataType {
    /// Short identifier
    pub const fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Text => "text",
            DataType::Num => "num",
            DataType::Vec => "vec",
            DataType::Bbox => "bbox",
            DataType::Rbbox => "rbbox",
            DataType::Point2d => "point2d",
            DataType::Point3d => "point3d",
            DataType::Poly2d => "poly2d",
            DataType::Poly3d => "poly3d",
            DataType::Cuboid => "cuboid",
            DataType::Mat => "mat",
            DataType::Binary => "binary",
        }
    }

    /// Check if this is a geometric shape rather than a plain attribute
    pub const fn is_geometry(&self) -> bool {
        !matches!(
            self,
            DataType::Boolean | DataType::Text | DataType::Num | DataType::Vec
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl DataValue {
    /// Type tag of this value
    pub fn data_type(&self) -> DataType {
        match self {
            DataValue::Boolean(_) => DataType::Boolean,
            DataValue::Text(_) => DataType::Text,
            DataValue::Num(_) => DataType::Num,
            DataValue::Vec(_) => DataType::Vec,
            DataValue::Bbox(_) => DataType::Bbox,
            DataValue::Rbbox(_) => DataType::Rbbox,
            DataValue::Point2d(_) => DataType::Point2d,
            DataValue::Point3d(_) => DataType::Point3d,
            DataValue::Poly2d { .. } => DataType::Poly2d,
            DataValue::Poly3d { .. } => DataType::Poly3d,
            DataValue::Cuboid(_) => DataType::Cuboid,
            DataValue::Mat { .. } => DataType::Mat,
            DataValue::Binary { .. } => DataType::Binary,
        }
    }

    /// Get as bool if this is a Boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as str if this is a Text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as f64 if this is a Num value
    pub fn as_num(&self) -> Option<f64> {
        match self {
            DataValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Check that every number is finite
    ///
    /// JSON has no encoding for NaN or infinity.
    pub fn is_finite(&self) -> bool {
        fn all(v: &[f64]) -> bool {
            v.iter().all(|x| x.is_finite())
        }
        match self {
            DataValue::Boolean(_) | DataValue::Text(_) | DataValue::Binary { .. } => true,
            DataValue::Num(n) => n.is_finite(),
            DataValue::Vec(v) | DataValue::Cuboid(v) => all(v),
            DataValue::Bbox(v) => all(v),
            DataValue::Rbbox(v) => all(v),
            DataValue::Point2d(v) => all(v),
            DataValue::Point3d(v) => all(v),
            DataValue::Poly2d { points, .. } | DataValue::Poly3d { points, .. } => all(points),
            DataValue::Mat { data, .. } => all(data),
        }
    }
}

/// Named value attached to an element, with nested attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementData {
    /// Name, unique within its container
    pub name: String,
    /// Typed payload
    pub value: DataValue,
    /// Nested attributes, carried wholesale with this value
    #[serde(default, skip_serializing_if = "DataSet::is_empty")]
    pub attributes: DataSet,
}

impl ElementData {
    /// Create element data without attributes
    pub fn new(name: impl Into<String>, value: DataValue) -> Self {
        Self {
            name: name.into(),
            value,
            attributes: DataSet::new(),
        }
    }

    /// Boolean data
    pub fn boolean(name: impl Into<String>, val: bool) -> Self {
        Self::new(name, DataValue::Boolean(val))
    }

    /// Text data
    pub fn text(name: impl Into<String>, val: impl Into<String>) -> Self {
        Self::new(name, DataValue::Text(val.into()))
    }

    /// Numeric data
    pub fn num(name: impl Into<String>, val: f64) -> Self {
        Self::new(name, DataValue::Num(val))
    }

    /// Vector data
    pub fn vec(name: impl Into<String>, val: impl Into<Vec<f64>>) -> Self {
        Self::new(name, DataValue::Vec(val.into()))
    }

    /// Bounding box data
    pub fn bbox(name: impl Into<String>, val: [f64; 4]) -> Self {
        Self::new(name, DataValue::Bbox(val))
    }

    /// Absolute, open 2D polyline
    pub fn poly2d(name: impl Into<String>, points: impl Into<Vec<f64>>, closed: bool) -> Self {
        Self::new(
            name,
            DataValue::Poly2d {
                points: points.into(),
                mode: Poly2dMode::Absolute,
                closed,
            },
        )
    }

    /// Type tag of the value
    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    /// Add or overwrite a nested attribute
    pub fn add_attribute(&mut self, attribute: ElementData) {
        self.attributes.upsert(attribute);
    }

    /// Builder form of [`ElementData::add_attribute`]
    pub fn with_attribute(mut self, attribute: ElementData) -> Self {
        self.add_attribute(attribute);
        self
    }

    /// Name of the first value, itself or nested, holding a non-finite number
    pub fn non_finite_name(&self) -> Option<&str> {
        if !self.value.is_finite() {
            return Some(&self.name);
        }
        self.attributes.iter().find_map(ElementData::non_finite_name)
    }

    /// Name to type map of the direct attributes
    pub fn attribute_types(&self) -> BTreeMap<String, DataType> {
        self.attributes
            .iter()
            .map(|a| (a.name.clone(), a.data_type()))
            .collect()
    }
}

/// Ordered collection of element data with unique names
///
/// Insertion order is preserved; overwriting keeps the original slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ElementData>", into = "Vec<ElementData>")]
pub struct DataSet(Vec<ElementData>);

impl From<Vec<ElementData>> for DataSet {
    fn from(items: Vec<ElementData>) -> Self {
        items.into_iter().collect()
    }
}

impl From<DataSet> for Vec<ElementData> {
    fn from(set: DataSet) -> Self {
        set.0
    }
}

impl FromIterator<ElementData> for DataSet {
    fn from_iter<I: IntoIterator<Item = ElementData>>(iter: I) -> Self {
        let mut set = DataSet::new();
        for item in iter {
            set.upsert(item);
        }
        set
    }
}

impl DataSet {
    /// Empty set
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert, or overwrite in place the item with the same name
    ///
    /// Returns the replaced item, if any.
    pub fn upsert(&mut self, data: ElementData) -> Option<ElementData> {
        match self.0.iter().position(|d| d.name == data.name) {
            Some(pos) => Some(std::mem::replace(&mut self.0[pos], data)),
            None => {
                self.0.push(data);
                None
            }
        }
    }

    /// Get item by name
    pub fn get(&self, name: &str) -> Option<&ElementData> {
        self.0.iter().find(|d| d.name == name)
    }

    /// Remove item by name, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<ElementData> {
        let pos = self.0.iter().position(|d| d.name == name)?;
        Some(self.0.remove(pos))
    }

    /// Check if an item with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, ElementData> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DataSet {
    type Item = &'a ElementData;
    type IntoIter = std::slice::Iter<'a, ElementData>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Summary of one data name on an element
///
/// An empty `frame_intervals` means the data is static: its value lives on
/// the element record (and is replicated into the element's frames when the
/// element is frame-restricted). A non-empty set means the data is dynamic and
/// its values live only in the frame index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPointer {
    /// Type of the data
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Frames holding a dynamic value; empty for static data
    pub frame_intervals: FrameIntervalSet,
    /// Types of the nested attributes, by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, DataType>,
}

impl DataPointer {
    /// Pointer describing `data` over `frame_intervals`
    pub fn describe(data: &ElementData, frame_intervals: FrameIntervalSet) -> Self {
        Self {
            data_type: data.data_type(),
            frame_intervals,
            attributes: data.attribute_types(),
        }
    }

    /// Check if the data is static
    pub fn is_static(&self) -> bool {
        self.frame_intervals.is_empty()
    }
}
