//! Shared document handle
//!
//! A [`Document`] is single-writer. [`SharedDocument`] puts it behind a
//! `parking_lot::RwLock` so queries can run concurrently while each mutation
//! (including all of its cascades) runs under one exclusive lock.

use crate::document::Document;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable, thread-safe handle to a document
#[derive(Debug, Clone, Default)]
pub struct SharedDocument {
    inner: Arc<RwLock<Document>>,
}

impl SharedDocument {
    /// Wrap a document
    pub fn new(doc: Document) -> Self {
        Self {
            inner: Arc::new(RwLock::new(doc)),
        }
    }

    /// Run a query under a shared lock
    pub fn read<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Run a mutation under an exclusive lock
    pub fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        f(&mut *self.inner.write())
    }

    /// Clone the current state
    pub fn snapshot(&self) -> Document {
        self.inner.read().clone()
    }
}

impl From<Document> for SharedDocument {
    fn from(doc: Document) -> Self {
        Self::new(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenedoc_core::{ElementData, ElementKind, FrameValue};
    use std::thread;

    #[test]
    fn test_concurrent_writers() {
        let shared = SharedDocument::default();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25u64 {
                        shared.write(|doc| {
                            let uid = doc.add_object(format!("t{t}-{i}"), "#Car", FrameValue::Frame(i)).unwrap();
                            doc.add_object_data(uid, ElementData::num("speed", i as f64), FrameValue::Frame(i))
                                .unwrap();
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.read(|doc| {
            assert_eq!(doc.num_elements(ElementKind::Object), 100);
            assert_eq!(doc.frame_intervals().to_pairs(), vec![(0, 24)]);
            assert_eq!(doc.frame(7).unwrap().len(), 4);
        });
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedDocument::new(Document::new());
        let before = shared.snapshot();
        shared.write(|doc| doc.add_event("start", "#Start", FrameValue::Frame(0))).unwrap();
        assert_eq!(before.num_elements(ElementKind::Event), 0);
        assert_eq!(shared.read(|doc| doc.num_elements(ElementKind::Event)), 1);
    }
}
