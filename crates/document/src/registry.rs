//! Per-kind element registry
//!
//! Owns the element records of one kind and the identifier counter used to
//! mint new uids. The counter tracks the highest integer uid ever assigned,
//! so minted uids never collide with caller-supplied ones.

use crate::element::Element;
use scenedoc_core::{ElementKind, Uid};
use std::collections::BTreeMap;

/// Elements of a single kind, keyed by uid
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRegistry {
    kind: ElementKind,
    elements: BTreeMap<Uid, Element>,
    last_int_uid: Option<u64>,
}

impl ElementRegistry {
    /// Create an empty registry
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            elements: BTreeMap::new(),
            last_int_uid: None,
        }
    }

    /// Rebuild a registry from loaded records, recomputing the counter
    pub fn from_elements(kind: ElementKind, elements: BTreeMap<Uid, Element>) -> Self {
        let last_int_uid = elements.keys().filter_map(Uid::as_int).max();
        Self {
            kind,
            elements,
            last_int_uid,
        }
    }

    /// Kind of the elements held here
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Uid for the next element, without reserving it
    ///
    /// A requested uid is returned as-is; otherwise one is minted.
    pub fn peek_uid(&self, requested: Option<Uid>, use_uuid: bool) -> Uid {
        match requested {
            Some(uid) => uid,
            None if use_uuid => Uid::new_uuid(),
            None => Uid::Int(self.last_int_uid.map_or(0, |last| last + 1)),
        }
    }

    /// Record `uid` as used, advancing the counter past integer uids
    pub fn commit_uid(&mut self, uid: Uid) {
        if let Some(v) = uid.as_int() {
            if self.last_int_uid.map_or(true, |last| v > last) {
                self.last_int_uid = Some(v);
            }
        }
    }

    /// Check if the uid is present
    pub fn contains(&self, uid: &Uid) -> bool {
        self.elements.contains_key(uid)
    }

    /// Get element by uid
    pub fn get(&self, uid: &Uid) -> Option<&Element> {
        self.elements.get(uid)
    }

    pub(crate) fn get_mut(&mut self, uid: &Uid) -> Option<&mut Element> {
        self.elements.get_mut(uid)
    }

    pub(crate) fn insert(&mut self, uid: Uid, element: Element) {
        self.commit_uid(uid);
        self.elements.insert(uid, element);
    }

    /// Iterate over `(uid, element)` in uid order
    pub fn iter(&self) -> impl Iterator<Item = (&Uid, &Element)> {
        self.elements.iter()
    }

    /// All uids in order
    pub fn uids(&self) -> Vec<Uid> {
        self.elements.keys().copied().collect()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub(crate) fn elements(&self) -> &BTreeMap<Uid, Element> {
        &self.elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenedoc_core::FrameIntervalSet;

    fn element(name: &str) -> Element {
        Element::new(name.to_string(), "#Car".to_string(), FrameIntervalSet::new())
    }

    #[test]
    fn test_minted_uids_are_sequential() {
        let mut reg = ElementRegistry::new(ElementKind::Object);
        for expected in 0..3u64 {
            let uid = reg.peek_uid(None, false);
            assert_eq!(uid, Uid::Int(expected));
            reg.insert(uid, element("car"));
        }
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_supplied_uid_advances_counter() {
        let mut reg = ElementRegistry::new(ElementKind::Object);
        reg.insert(Uid::Int(10), element("a"));
        assert_eq!(reg.peek_uid(None, false), Uid::Int(11));

        reg.insert(Uid::Int(4), element("b"));
        assert_eq!(reg.peek_uid(None, false), Uid::Int(11));
    }

    #[test]
    fn test_peek_does_not_reserve() {
        let reg = ElementRegistry::new(ElementKind::Event);
        assert_eq!(reg.peek_uid(None, false), reg.peek_uid(None, false));
        assert_eq!(reg.peek_uid(Some(Uid::Int(9)), false), Uid::Int(9));
    }

    #[test]
    fn test_uuid_minting_leaves_counter_alone() {
        let mut reg = ElementRegistry::new(ElementKind::Action);
        let uid = reg.peek_uid(None, true);
        assert!(uid.is_uuid());
        reg.insert(uid, element("walk"));
        assert_eq!(reg.peek_uid(None, false), Uid::Int(0));
    }

    #[test]
    fn test_from_elements_recomputes_counter() {
        let mut map = BTreeMap::new();
        map.insert(Uid::Int(2), element("a"));
        map.insert(Uid::Int(7), element("b"));
        map.insert(Uid::new_uuid(), element("c"));
        let reg = ElementRegistry::from_elements(ElementKind::Context, map);
        assert_eq!(reg.peek_uid(None, false), Uid::Int(8));
        assert_eq!(reg.kind(), ElementKind::Context);
    }
}
