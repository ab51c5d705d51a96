//! Quantity selection bounded by the active variant's stock.

use serde::Serialize;

use crate::family::FamilyMember;

/// Lowest orderable quantity.
pub const MIN_QUANTITY: u32 = 1;

/// Quantity picker state for the active variant.
///
/// Zero or unknown stock disables the picker instead of offering an empty
/// range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum QuantityControl {
    Disabled,
    Enabled { max: u32, quantity: u32 },
}

impl QuantityControl {
    pub fn for_member(member: &FamilyMember) -> Self {
        match member.available_stock {
            Some(max) if max >= MIN_QUANTITY => QuantityControl::Enabled {
                max,
                quantity: MIN_QUANTITY,
            },
            _ => QuantityControl::Disabled,
        }
    }

    /// Request a quantity; it is clamped to `MIN_QUANTITY..=max`.
    pub fn set_quantity(&mut self, requested: u32) {
        if let QuantityControl::Enabled { max, quantity } = self {
            *quantity = requested.clamp(MIN_QUANTITY, *max);
        }
    }

    /// Re-bound the picker after the active variant changed, keeping the
    /// chosen quantity when the new stock still allows it.
    pub fn rebind(&mut self, member: &FamilyMember) {
        let previous = self.quantity();
        *self = Self::for_member(member);
        if let Some(previous) = previous {
            self.set_quantity(previous);
        }
    }

    pub fn quantity(&self) -> Option<u32> {
        match self {
            QuantityControl::Enabled { quantity, .. } => Some(*quantity),
            QuantityControl::Disabled => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, QuantityControl::Enabled { .. })
    }
}
