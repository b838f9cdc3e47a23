//! Ontologies
//!
//! A document keeps a small registry of ontology URLs. Elements may name the
//! ontology their semantic type comes from through `ontology_uid`, which must
//! resolve to a registered entry.

use crate::document::Document;
use scenedoc_core::{Error, Result, Uid};
use std::collections::BTreeMap;
use tracing::{debug, warn};

impl Document {
    /// Register an ontology URL and return its uid
    ///
    /// Uids are integers, one past the highest registered. Registering a URL
    /// that is already present returns its existing uid.
    pub fn add_ontology(&mut self, url: impl Into<String>) -> Uid {
        let url = url.into();
        if let Some((uid, _)) = self.ontologies.iter().find(|(_, known)| **known == url) {
            warn!(target: "scenedoc::element", %uid, %url, "Ontology already registered");
            return *uid;
        }
        let next = self
            .ontologies
            .keys()
            .filter_map(Uid::as_int)
            .max()
            .map_or(0, |last| last + 1);
        let uid = Uid::Int(next);
        debug!(target: "scenedoc::element", %uid, %url, "Ontology added");
        self.ontologies.insert(uid, url);
        uid
    }

    /// URL of a registered ontology
    pub fn ontology(&self, uid: &Uid) -> Option<&str> {
        self.ontologies.get(uid).map(String::as_str)
    }

    /// All registered ontologies, by uid
    pub fn ontologies(&self) -> &BTreeMap<Uid, String> {
        &self.ontologies
    }

    pub(crate) fn check_ontology(&self, uid: &Uid) -> Result<()> {
        if self.ontologies.contains_key(uid) {
            Ok(())
        } else {
            Err(Error::OntologyNotFound(*uid))
        }
    }
}
