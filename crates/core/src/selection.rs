//! The partial facet selection driving resolution.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::facet::{matches, Cardinality, FacetKey, FacetSnapshot};

/// One chosen scalar per facet.
///
/// Multi-valued facets keep a single representative value, not a set. A
/// selection is either empty or the projection of one member's snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    values: BTreeMap<FacetKey, String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project a snapshot onto one scalar per facet.
    ///
    /// For multi-valued facets the representative is `clicked` when the click
    /// targeted that facet and the member holds it, then `prior`'s value when
    /// the member still holds it, then the member's first value.
    pub fn project(
        snapshot: &FacetSnapshot,
        clicked: Option<(FacetKey, &str)>,
        prior: &Selection,
    ) -> Self {
        let mut values = BTreeMap::new();
        for key in FacetKey::ALL {
            let extracted = snapshot.get(key);
            let chosen = match key.cardinality() {
                Cardinality::Single => extracted.first(),
                Cardinality::Multi => {
                    let present = extracted.values();
                    let preferred = clicked
                        .filter(|(k, _)| *k == key)
                        .map(|(_, v)| v)
                        .or_else(|| prior.get(key));
                    preferred
                        .and_then(|p| present.iter().copied().find(|v| *v == p))
                        .or_else(|| present.first().copied())
                }
            };
            if let Some(value) = chosen {
                values.insert(key, value.to_string());
            }
        }
        Self { values }
    }

    pub fn get(&self, key: FacetKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_selected(&self, key: FacetKey, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// A copy with `key` set to `value`.
    pub fn with(&self, key: FacetKey, value: &str) -> Self {
        let mut values = self.values.clone();
        values.insert(key, value.to_string());
        Self { values }
    }

    pub fn iter(&self) -> impl Iterator<Item = (FacetKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Whether `snapshot` satisfies every entry, optionally ignoring one facet.
    pub fn is_satisfied_by(&self, snapshot: &FacetSnapshot, except: Option<FacetKey>) -> bool {
        self.iter()
            .filter(|(key, _)| Some(*key) != except)
            .all(|(key, value)| matches(snapshot.get(key), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FacetSnapshot {
        FacetSnapshot {
            preservation_state: Some("Novo".into()),
            region: Some("Europe".into()),
            audio_languages: vec!["English".into(), "Português".into()],
            ..Default::default()
        }
    }

    #[test]
    fn project_takes_first_multi_value_by_default() {
        let selection = Selection::project(&snapshot(), None, &Selection::new());
        assert_eq!(selection.get(FacetKey::PreservationState), Some("Novo"));
        assert_eq!(selection.get(FacetKey::AudioLanguages), Some("English"));
        assert_eq!(selection.get(FacetKey::CartridgeType), None);
    }

    #[test]
    fn project_prefers_clicked_value() {
        let clicked = Some((FacetKey::AudioLanguages, "Português"));
        let selection = Selection::project(&snapshot(), clicked, &Selection::new());
        assert_eq!(selection.get(FacetKey::AudioLanguages), Some("Português"));
    }

    #[test]
    fn project_keeps_prior_value_still_held() {
        let prior = Selection::new().with(FacetKey::AudioLanguages, "Português");
        let selection = Selection::project(&snapshot(), None, &prior);
        assert_eq!(selection.get(FacetKey::AudioLanguages), Some("Português"));

        let stale = Selection::new().with(FacetKey::AudioLanguages, "Japanese");
        let selection = Selection::project(&snapshot(), None, &stale);
        assert_eq!(selection.get(FacetKey::AudioLanguages), Some("English"));
    }

    #[test]
    fn projection_always_satisfied_by_its_snapshot() {
        let s = snapshot();
        let selection = Selection::project(&s, None, &Selection::new());
        assert!(selection.is_satisfied_by(&s, None));
    }

    #[test]
    fn serializes_as_plain_map() {
        let selection = Selection::new()
            .with(FacetKey::Region, "Europe")
            .with(FacetKey::AudioLanguages, "English");
        assert_eq!(
            serde_json::to_value(&selection).unwrap(),
            serde_json::json!({ "region": "Europe", "audioLanguages": "English" })
        );
    }

    #[test]
    fn except_skips_one_facet() {
        let selection = Selection::new()
            .with(FacetKey::Region, "USA")
            .with(FacetKey::PreservationState, "Novo");
        assert!(!selection.is_satisfied_by(&snapshot(), None));
        assert!(selection.is_satisfied_by(&snapshot(), Some(FacetKey::Region)));
    }
}
