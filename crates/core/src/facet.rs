//! Facet keys, snapshots, and the descriptor table that drives all
//! facet-aware logic.
//!
//! Every other module dispatches through [`FACET_DESCRIPTORS`] instead of
//! branching on individual facets. A descriptor names the facet, tags its
//! cardinality, and extracts its value(s) from a [`FacetSnapshot`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Facet keys
// ---------------------------------------------------------------------------

/// A known product attribute. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FacetKey {
    PreservationState,
    CartridgeType,
    Region,
    AudioLanguages,
    SubtitleLanguages,
    InterfaceLanguages,
}

impl FacetKey {
    /// All facet keys in display order.
    pub const ALL: [FacetKey; 6] = [
        FacetKey::PreservationState,
        FacetKey::CartridgeType,
        FacetKey::Region,
        FacetKey::AudioLanguages,
        FacetKey::SubtitleLanguages,
        FacetKey::InterfaceLanguages,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKey::PreservationState => "preservationState",
            FacetKey::CartridgeType => "cartridgeType",
            FacetKey::Region => "region",
            FacetKey::AudioLanguages => "audioLanguages",
            FacetKey::SubtitleLanguages => "subtitleLanguages",
            FacetKey::InterfaceLanguages => "interfaceLanguages",
        }
    }

    /// Parse the wire name of a facet (the camelCase form used in JSON).
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        FacetKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown facet '{s}'. Valid facets: {}",
                    FacetKey::ALL
                        .iter()
                        .map(FacetKey::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    /// The table entry for this facet.
    pub fn descriptor(self) -> &'static FacetDescriptor {
        &FACET_DESCRIPTORS[self as usize]
    }

    pub fn cardinality(self) -> Cardinality {
        self.descriptor().cardinality
    }

    /// Human-readable label shown next to the facet's buttons.
    pub fn label(self) -> &'static str {
        self.descriptor().label
    }
}

impl std::fmt::Display for FacetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a member holds one value or a list of values for a facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    Single,
    Multi,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The complete set of facet values belonging to one family member.
///
/// Deserialization is lenient: a field of the wrong JSON type is read as
/// absent rather than failing the whole family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacetSnapshot {
    #[serde(deserialize_with = "lenient_scalar")]
    pub preservation_state: Option<String>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub cartridge_type: Option<String>,
    #[serde(deserialize_with = "lenient_scalar")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub audio_languages: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub subtitle_languages: Vec<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub interface_languages: Vec<String>,
}

impl FacetSnapshot {
    /// Extract the value(s) of `key` through the descriptor table.
    pub fn get(&self, key: FacetKey) -> FacetValue<'_> {
        (key.descriptor().extract)(self)
    }
}

/// Read a whole snapshot, treating anything but a JSON object as empty.
pub(crate) fn lenient_snapshot<'de, D>(deserializer: D) -> Result<FacetSnapshot, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        _ => FacetSnapshot::default(),
    })
}

fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

// ---------------------------------------------------------------------------
// Extracted values
// ---------------------------------------------------------------------------

/// The value(s) one member holds for one facet, tagged by cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetValue<'a> {
    Single(Option<&'a str>),
    Multi(&'a [String]),
}

impl<'a> FacetValue<'a> {
    /// Present values in source order. Blank strings count as absent.
    pub fn values(&self) -> Vec<&'a str> {
        match *self {
            FacetValue::Single(value) => value.filter(|v| !v.is_empty()).into_iter().collect(),
            FacetValue::Multi(values) => values
                .iter()
                .map(String::as_str)
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }

    /// First present value, if any.
    pub fn first(&self) -> Option<&'a str> {
        self.values().into_iter().next()
    }

    pub fn is_absent(&self) -> bool {
        self.values().is_empty()
    }
}

/// Match a member's facet value against one selected scalar.
///
/// Single-valued facets use equality, multi-valued facets use membership.
/// Absent or blank values never match.
pub fn matches(value: FacetValue<'_>, selected: &str) -> bool {
    if selected.is_empty() {
        return false;
    }
    match value {
        FacetValue::Single(v) => v == Some(selected),
        FacetValue::Multi(values) => values.iter().any(|v| v == selected),
    }
}

// ---------------------------------------------------------------------------
// Descriptor table
// ---------------------------------------------------------------------------

/// One row of the facet table.
#[derive(Debug)]
pub struct FacetDescriptor {
    pub key: FacetKey,
    pub cardinality: Cardinality,
    pub label: &'static str,
    pub extract: fn(&FacetSnapshot) -> FacetValue<'_>,
}

/// Facet table, indexed by `FacetKey as usize`.
pub static FACET_DESCRIPTORS: [FacetDescriptor; 6] = [
    FacetDescriptor {
        key: FacetKey::PreservationState,
        cardinality: Cardinality::Single,
        label: "Preservation state",
        extract: extract_preservation_state,
    },
    FacetDescriptor {
        key: FacetKey::CartridgeType,
        cardinality: Cardinality::Single,
        label: "Cartridge type",
        extract: extract_cartridge_type,
    },
    FacetDescriptor {
        key: FacetKey::Region,
        cardinality: Cardinality::Single,
        label: "Region",
        extract: extract_region,
    },
    FacetDescriptor {
        key: FacetKey::AudioLanguages,
        cardinality: Cardinality::Multi,
        label: "Audio",
        extract: extract_audio_languages,
    },
    FacetDescriptor {
        key: FacetKey::SubtitleLanguages,
        cardinality: Cardinality::Multi,
        label: "Subtitles",
        extract: extract_subtitle_languages,
    },
    FacetDescriptor {
        key: FacetKey::InterfaceLanguages,
        cardinality: Cardinality::Multi,
        label: "Interface",
        extract: extract_interface_languages,
    },
];

fn extract_preservation_state(s: &FacetSnapshot) -> FacetValue<'_> {
    FacetValue::Single(s.preservation_state.as_deref())
}

fn extract_cartridge_type(s: &FacetSnapshot) -> FacetValue<'_> {
    FacetValue::Single(s.cartridge_type.as_deref())
}

fn extract_region(s: &FacetSnapshot) -> FacetValue<'_> {
    FacetValue::Single(s.region.as_deref())
}

fn extract_audio_languages(s: &FacetSnapshot) -> FacetValue<'_> {
    FacetValue::Multi(&s.audio_languages)
}

fn extract_subtitle_languages(s: &FacetSnapshot) -> FacetValue<'_> {
    FacetValue::Multi(&s.subtitle_languages)
}

fn extract_interface_languages(s: &FacetSnapshot) -> FacetValue<'_> {
    FacetValue::Multi(&s.interface_languages)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FacetSnapshot {
        FacetSnapshot {
            preservation_state: Some("Bom".into()),
            cartridge_type: Some("Repro".into()),
            region: Some("".into()),
            audio_languages: vec!["English".into(), "".into(), "Português".into()],
            ..Default::default()
        }
    }

    // -- descriptor table --

    #[test]
    fn table_is_indexed_by_key() {
        for key in FacetKey::ALL {
            assert_eq!(key.descriptor().key, key);
        }
    }

    #[test]
    fn cardinality_per_facet() {
        assert_eq!(FacetKey::Region.cardinality(), Cardinality::Single);
        assert_eq!(FacetKey::AudioLanguages.cardinality(), Cardinality::Multi);
    }

    // -- parse --

    #[test]
    fn parse_round_trips_wire_names() {
        for key in FacetKey::ALL {
            assert_eq!(FacetKey::parse(key.as_str()).unwrap(), key);
        }
    }

    #[test]
    fn parse_rejects_unknown_facet() {
        let msg = FacetKey::parse("colour").unwrap_err().to_string();
        assert!(msg.contains("Unknown facet 'colour'"));
    }

    // -- extraction --

    #[test]
    fn blank_values_are_absent() {
        let s = snapshot();
        assert!(s.get(FacetKey::Region).is_absent());
        assert_eq!(
            s.get(FacetKey::AudioLanguages).values(),
            vec!["English", "Português"]
        );
        assert!(s.get(FacetKey::SubtitleLanguages).is_absent());
    }

    #[test]
    fn lenient_deserialization_drops_malformed_fields() {
        let s: FacetSnapshot = serde_json::from_value(serde_json::json!({
            "preservationState": 3,
            "region": "Europe",
            "audioLanguages": "English",
            "subtitleLanguages": ["Español", 7, null],
        }))
        .unwrap();
        assert_eq!(s.preservation_state, None);
        assert_eq!(s.region.as_deref(), Some("Europe"));
        assert!(s.audio_languages.is_empty());
        assert_eq!(s.subtitle_languages, vec!["Español".to_string()]);
    }

    // -- matches --

    #[test]
    fn single_facets_match_by_equality() {
        let s = snapshot();
        assert!(matches(s.get(FacetKey::PreservationState), "Bom"));
        assert!(!matches(s.get(FacetKey::PreservationState), "Novo"));
        assert!(!matches(s.get(FacetKey::Region), ""));
    }

    #[test]
    fn multi_facets_match_by_membership() {
        let s = snapshot();
        assert!(matches(s.get(FacetKey::AudioLanguages), "Português"));
        assert!(!matches(s.get(FacetKey::AudioLanguages), "Japanese"));
        assert!(!matches(s.get(FacetKey::SubtitleLanguages), "English"));
    }
}
