//! Which catalog values remain selectable under a partial selection.
//!
//! For facet `F`, the compatible set is every member matching the selection
//! on all facets except `F`. Enabled values are the union of `F` across that
//! set; the rest of the catalog is disabled. An empty compatible set disables
//! every value; the user recovers by clicking the selected value to reset.

use serde::Serialize;

use crate::catalog::FacetCatalog;
use crate::facet::{Cardinality, FacetKey};
use crate::family::{Family, FamilyMember};
use crate::selection::Selection;

/// Enabled and disabled values for one facet, both in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetAvailability {
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
}

impl FacetAvailability {
    pub fn is_enabled(&self, value: &str) -> bool {
        self.enabled.iter().any(|v| v == value)
    }
}

/// Members matching `selection` on every facet except `facet`.
///
/// An empty selection matches the whole family.
pub fn compatible_members<'a>(
    family: &'a Family,
    selection: &Selection,
    facet: FacetKey,
) -> Vec<&'a FamilyMember> {
    family
        .members()
        .iter()
        .filter(|member| selection.is_satisfied_by(&member.facets, Some(facet)))
        .collect()
}

/// Split the catalog values of `facet` into enabled and disabled.
pub fn facet_availability(
    family: &Family,
    catalog: &FacetCatalog,
    selection: &Selection,
    facet: FacetKey,
) -> FacetAvailability {
    let compatible = compatible_members(family, selection, facet);

    let (enabled, disabled): (Vec<String>, Vec<String>) = catalog
        .values(facet)
        .iter()
        .cloned()
        .partition(|value| {
            compatible
                .iter()
                .any(|member| member.facets.get(facet).values().contains(&value.as_str()))
        });

    FacetAvailability { enabled, disabled }
}

// ---------------------------------------------------------------------------
// Panel view model
// ---------------------------------------------------------------------------

/// One button in a facet section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOption {
    pub value: String,
    pub enabled: bool,
    pub selected: bool,
}

/// One facet section: its label and ordered options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSection {
    pub facet: FacetKey,
    pub label: &'static str,
    pub cardinality: Cardinality,
    pub options: Vec<FacetOption>,
}

/// Sections for every facet the family actually uses, in display order.
pub fn facet_panel(
    family: &Family,
    catalog: &FacetCatalog,
    selection: &Selection,
) -> Vec<FacetSection> {
    catalog
        .populated_facets()
        .map(|facet| {
            let availability = facet_availability(family, catalog, selection, facet);
            let options = catalog
                .values(facet)
                .iter()
                .map(|value| FacetOption {
                    value: value.clone(),
                    enabled: availability.is_enabled(value),
                    selected: selection.is_selected(facet, value),
                })
                .collect();
            FacetSection {
                facet,
                label: facet.label(),
                cardinality: facet.cardinality(),
                options,
            }
        })
        .collect()
}
