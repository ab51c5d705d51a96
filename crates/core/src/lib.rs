//! Faceted variant resolution for cartridge listings.
//!
//! A listing ("family") is one main advertisement plus its announced
//! variants. This crate derives the selectable facet values of a family,
//! resolves facet clicks into a concrete member, and keeps the resolution
//! in sync with the `variation` URL parameter. Everything here is pure and
//! synchronous; the only side effect goes through [`deep_link::LocationPort`].

pub mod availability;
pub mod catalog;
pub mod deep_link;
pub mod error;
pub mod events;
pub mod facet;
pub mod family;
pub mod gallery;
pub mod message;
pub mod resolver;
pub mod selection;
pub mod stock;
pub mod types;
