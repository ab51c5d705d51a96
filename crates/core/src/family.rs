//! Family members and the ordered family they belong to.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::facet::{lenient_snapshot, FacetSnapshot};
use crate::types::MemberId;

/// One concrete product instance: the main advertisement or a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: MemberId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_snapshot")]
    pub facets: FacetSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl FamilyMember {
    pub fn new(id: MemberId, facets: FacetSnapshot) -> Self {
        Self {
            id,
            title: None,
            facets,
            available_stock: None,
            price: None,
        }
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.available_stock = Some(stock);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// A main item followed by its variants, in listing order.
///
/// The main item is always at index 0. Member ids are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    members: Vec<FamilyMember>,
}

#[derive(Deserialize)]
struct RawFamily {
    main: FamilyMember,
    #[serde(default)]
    variants: Vec<FamilyMember>,
}

impl Family {
    /// Build a family, rejecting duplicate member ids.
    pub fn new(main: FamilyMember, variants: Vec<FamilyMember>) -> Result<Self, CoreError> {
        let mut members = Vec::with_capacity(variants.len() + 1);
        members.push(main);
        members.extend(variants);

        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            if !seen.insert(member.id) {
                return Err(CoreError::Validation(format!(
                    "Duplicate family member id {}",
                    member.id
                )));
            }
        }

        Ok(Self { members })
    }

    pub fn main(&self) -> &FamilyMember {
        &self.members[0]
    }

    pub fn variants(&self) -> &[FamilyMember] {
        &self.members[1..]
    }

    /// All members in listing order, main first.
    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn get(&self, id: MemberId) -> Option<&FamilyMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn is_main(&self, id: MemberId) -> bool {
        self.main().id == id
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; a family has at least its main item.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<'de> Deserialize<'de> for Family {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawFamily::deserialize(deserializer)?;
        Family::new(raw.main, raw.variants).map_err(serde::de::Error::custom)
    }
}
