//! Facet catalog: every distinct value observed across a family.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::facet::{FacetKey, FACET_DESCRIPTORS};
use crate::family::Family;

/// Per-facet values in first-occurrence order, deduplicated.
///
/// Built once per family. Facets with no observed values are still present
/// with an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FacetCatalog {
    values: BTreeMap<FacetKey, Vec<String>>,
}

impl FacetCatalog {
    /// Scan `[main, ...variants]` once per facet, flattening multi-valued
    /// facets before deduplication.
    pub fn build(family: &Family) -> Self {
        let values = FACET_DESCRIPTORS
            .iter()
            .map(|descriptor| {
                let mut seen: HashSet<&str> = HashSet::new();
                let mut observed: Vec<String> = Vec::new();
                for member in family.members() {
                    for value in (descriptor.extract)(&member.facets).values() {
                        if seen.insert(value) {
                            observed.push(value.to_string());
                        }
                    }
                }
                (descriptor.key, observed)
            })
            .collect();

        Self { values }
    }

    /// Catalog values for one facet; empty when nothing was observed.
    pub fn values(&self, key: FacetKey) -> &[String] {
        self.values.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Facets with at least one observed value, in display order.
    pub fn populated_facets(&self) -> impl Iterator<Item = FacetKey> + '_ {
        self.values
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(key, _)| *key)
    }
}
