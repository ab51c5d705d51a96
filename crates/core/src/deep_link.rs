//! Keeps the resolved variant in sync with the `variation` query parameter.
//!
//! Location access goes through [`LocationPort`] so the whole flow runs
//! headless. Outbound writes always *replace* the current history entry and
//! are skipped when the URL already holds the desired value. Inbound
//! navigation re-enters the resolver's mount transition.

use std::collections::BTreeMap;

use url::{form_urlencoded, Url};

use crate::error::CoreError;
use crate::events::{ActiveVariantChanged, VariantEvents};
use crate::facet::FacetKey;
use crate::family::Family;
use crate::resolver::{ClickOutcome, SelectionResolver};
use crate::types::{MemberId, VARIATION_PARAM};

// ---------------------------------------------------------------------------
// Location port
// ---------------------------------------------------------------------------

/// Read and replace single query parameters of the current location.
pub trait LocationPort {
    fn query_value(&self, name: &str) -> Option<String>;

    /// Set `name` to `value`, or remove it when `value` is `None`, without
    /// adding a history entry.
    fn replace_query_value(&mut self, name: &str, value: Option<&str>);
}

/// In-memory location with a browser-like history stack.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    entries: Vec<BTreeMap<String, String>>,
    cursor: usize,
    replace_count: usize,
}

impl Default for MemoryLocation {
    fn default() -> Self {
        Self {
            entries: vec![BTreeMap::new()],
            cursor: 0,
            replace_count: 0,
        }
    }
}

impl MemoryLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a location that already carries `name=value`.
    pub fn with_query(name: &str, value: &str) -> Self {
        let mut location = Self::default();
        location.entries[0].insert(name.to_string(), value.to_string());
        location
    }

    /// Follow a link: push a new entry and drop any forward history.
    pub fn push(&mut self, name: &str, value: Option<&str>) {
        let mut entry = BTreeMap::new();
        if let Some(value) = value {
            entry.insert(name.to_string(), value.to_string());
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor += 1;
    }

    /// Step back one entry. Returns `false` at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns `false` at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }

    /// Number of replace writes performed so far.
    pub fn replace_count(&self) -> usize {
        self.replace_count
    }
}

impl LocationPort for MemoryLocation {
    fn query_value(&self, name: &str) -> Option<String> {
        self.entries[self.cursor].get(name).cloned()
    }

    fn replace_query_value(&mut self, name: &str, value: Option<&str>) {
        let entry = &mut self.entries[self.cursor];
        match value {
            Some(value) => {
                entry.insert(name.to_string(), value.to_string());
            }
            None => {
                entry.remove(name);
            }
        }
        self.replace_count += 1;
    }
}

/// A location backed by a full URL. Other query pairs are preserved in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlLocation {
    url: Url,
}

impl UrlLocation {
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let url = Url::parse(input)
            .map_err(|e| CoreError::Validation(format!("Invalid page URL '{input}': {e}")))?;
        Ok(Self { url })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl LocationPort for UrlLocation {
    fn query_value(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    fn replace_query_value(&mut self, name: &str, value: Option<&str>) {
        // Untouched segments keep their raw form, including bare flags and
        // their original percent-encoding.
        let replacement = value.map(|value| format!("{}={}", encode(name), encode(value)));
        let mut segments: Vec<String> = Vec::new();
        let mut written = false;
        for segment in self.url.query().unwrap_or("").split('&') {
            if segment.is_empty() {
                continue;
            }
            if decoded_key(segment) != name {
                segments.push(segment.to_string());
            } else if let (Some(pair), false) = (&replacement, written) {
                segments.push(pair.clone());
                written = true;
            }
        }
        if let (Some(pair), false) = (replacement, written) {
            segments.push(pair);
        }

        if segments.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(&segments.join("&")));
        }
    }
}

fn encode(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// Decoded key of one raw `key[=value]` query segment.
fn decoded_key(segment: &str) -> String {
    let raw_key = segment.split_once('=').map_or(segment, |(key, _)| key);
    form_urlencoded::parse(raw_key.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Sync
// ---------------------------------------------------------------------------

/// Drives a [`SelectionResolver`] from clicks and navigation, mirroring the
/// active variant into the location and notifying listeners on change.
pub struct DeepLinkSync<P> {
    resolver: SelectionResolver,
    port: P,
    events: VariantEvents,
    active: Option<MemberId>,
}

impl<P: LocationPort> DeepLinkSync<P> {
    /// Mount from whatever `variation` the location currently carries.
    ///
    /// Listeners in `events` receive the initial active variant.
    pub fn mount(family: Family, port: P, events: VariantEvents) -> Self {
        let requested = port.query_value(VARIATION_PARAM);
        let resolver = SelectionResolver::mount(family, requested.as_deref());
        let mut sync = Self {
            resolver,
            port,
            events,
            active: None,
        };
        sync.sync();
        sync
    }

    /// Apply a facet click and reflect the outcome in the location.
    pub fn click(&mut self, facet: FacetKey, value: &str) -> ClickOutcome {
        let outcome = self.resolver.click(facet, value);
        self.sync();
        outcome
    }

    /// Handle back/forward or an externally supplied link.
    pub fn navigated(&mut self) {
        let requested = self.port.query_value(VARIATION_PARAM);
        self.resolver.remount(requested.as_deref());
        self.sync();
    }

    pub fn resolver(&self) -> &SelectionResolver {
        &self.resolver
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// The `variation` value matching the active variant; `None` for main.
    pub fn expected_variation(&self) -> Option<String> {
        let active = self.resolver.active_variant().id;
        (!self.resolver.family().is_main(active)).then(|| active.to_string())
    }

    fn sync(&mut self) {
        let desired = self.expected_variation();
        if self.port.query_value(VARIATION_PARAM) != desired {
            self.port
                .replace_query_value(VARIATION_PARAM, desired.as_deref());
            tracing::debug!(variation = ?desired, "Replaced variation parameter");
        }

        let current = self.resolver.active_variant().id;
        if self.active != Some(current) {
            let event = ActiveVariantChanged {
                previous: self.active,
                current,
                is_main: self.resolver.family().is_main(current),
            };
            self.active = Some(current);
            self.events.publish(&event);
        }
    }
}

impl<P: std::fmt::Debug> std::fmt::Debug for DeepLinkSync<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLinkSync")
            .field("state", &self.resolver.state())
            .field("port", &self.port)
            .field("active", &self.active)
            .finish()
    }
}
