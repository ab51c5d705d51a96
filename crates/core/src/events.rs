//! Synchronous fan-out of active-variant changes.
//!
//! [`VariantEvents`] is the single-threaded counterpart of a broadcast bus:
//! subscribers are plain callbacks invoked in subscription order, inline with
//! the click or navigation that caused the change.

use serde::Serialize;

use crate::types::MemberId;

/// The active variant moved to a different member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveVariantChanged {
    /// Previously active member; `None` on the first notification after mount.
    pub previous: Option<MemberId>,
    pub current: MemberId,
    /// Whether `current` is the family's main item.
    pub is_main: bool,
}

type Listener = Box<dyn FnMut(&ActiveVariantChanged)>;

/// Callback registry for [`ActiveVariantChanged`].
#[derive(Default)]
pub struct VariantEvents {
    listeners: Vec<Listener>,
}

impl VariantEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It receives every event published afterwards.
    pub fn subscribe(&mut self, listener: impl FnMut(&ActiveVariantChanged) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Invoke every listener in subscription order.
    pub fn publish(&mut self, event: &ActiveVariantChanged) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for VariantEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantEvents")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
