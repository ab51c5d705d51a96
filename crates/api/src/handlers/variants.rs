//! Handler for server-side variant resolution.
//!
//! Lets a server-rendered listing page open straight into a deep-linked
//! variant: the caller posts the already-loaded family plus the incoming
//! `variation` (or the full page URL) and an optional replay of facet clicks.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use retrocart_core::availability::FacetSection;
use retrocart_core::deep_link::{DeepLinkSync, LocationPort, MemoryLocation, UrlLocation};
use retrocart_core::events::VariantEvents;
use retrocart_core::facet::FacetKey;
use retrocart_core::family::{Family, FamilyMember};
use retrocart_core::message::{compose_contact_message, SelectionSummary};
use retrocart_core::resolver::{ClickOutcome, ResolutionState};
use retrocart_core::selection::Selection;
use retrocart_core::stock::QuantityControl;
use retrocart_core::types::VARIATION_PARAM;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Title used in the contact message when neither member nor main has one.
const FALLBACK_TITLE: &str = "this cartridge";

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// One facet click to replay after mounting.
#[derive(Debug, Deserialize)]
pub struct FacetClick {
    pub facet: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub family: serde_json::Value,
    /// Incoming `variation` parameter. Ignored when `page_url` is present.
    #[serde(default)]
    pub variation: Option<String>,
    /// Full page URL; its `variation` parameter is read and rewritten.
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub clicks: Vec<FacetClick>,
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedListing {
    pub state: ResolutionState,
    pub active_variant: FamilyMember,
    pub variation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    pub outcomes: Vec<ClickOutcome>,
    pub selection: Selection,
    pub panel: Vec<FacetSection>,
    pub quantity: QuantityControl,
    pub summary: SelectionSummary,
    pub message: String,
}

// ---------------------------------------------------------------------------
// POST /variants/resolve
// ---------------------------------------------------------------------------

/// Mount the resolver from the deep link, replay clicks, and return the
/// page's variant state.
pub async fn resolve(
    State(state): State<AppState>,
    Json(body): Json<ResolveRequest>,
) -> AppResult<Json<DataResponse<ResolvedListing>>> {
    let limit = state.config.max_replay_clicks;
    if body.clicks.len() > limit {
        return Err(AppError::BadRequest(format!(
            "Too many clicks: {} (limit {limit})",
            body.clicks.len()
        )));
    }

    let family: Family = serde_json::from_value(body.family)
        .map_err(|e| AppError::BadRequest(format!("Invalid family: {e}")))?;

    let mut clicks = Vec::with_capacity(body.clicks.len());
    for click in &body.clicks {
        clicks.push((FacetKey::parse(&click.facet)?, click.value.as_str()));
    }

    let listing = match body.page_url {
        Some(page_url) => {
            let location = UrlLocation::parse(&page_url)?;
            let (sync, outcomes) = replay(family, location, &clicks);
            let page_url = sync.port().as_str().to_string();
            ResolvedListing {
                page_url: Some(page_url),
                ..describe(&sync, outcomes, body.quantity)
            }
        }
        None => {
            let location = match body.variation.as_deref() {
                Some(variation) => MemoryLocation::with_query(VARIATION_PARAM, variation),
                None => MemoryLocation::new(),
            };
            let (sync, outcomes) = replay(family, location, &clicks);
            describe(&sync, outcomes, body.quantity)
        }
    };

    tracing::debug!(
        clicks = clicks.len(),
        active_variant = listing.active_variant.id,
        "Resolved listing variant"
    );

    Ok(Json(DataResponse { data: listing }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn replay<P: LocationPort>(
    family: Family,
    location: P,
    clicks: &[(FacetKey, &str)],
) -> (DeepLinkSync<P>, Vec<ClickOutcome>) {
    let mut sync = DeepLinkSync::mount(family, location, VariantEvents::new());
    let outcomes = clicks
        .iter()
        .map(|(facet, value)| sync.click(*facet, value))
        .collect();
    (sync, outcomes)
}

fn describe<P: LocationPort>(
    sync: &DeepLinkSync<P>,
    outcomes: Vec<ClickOutcome>,
    quantity: Option<u32>,
) -> ResolvedListing {
    let resolver = sync.resolver();
    let active = resolver.active_variant();

    let mut control = QuantityControl::for_member(active);
    if let Some(quantity) = quantity {
        control.set_quantity(quantity);
    }

    let title = active
        .title
        .as_deref()
        .or(resolver.family().main().title.as_deref())
        .unwrap_or(FALLBACK_TITLE);
    let summary = SelectionSummary::from_resolver(resolver);
    let message = compose_contact_message(title, &summary, active.price, control.quantity());

    ResolvedListing {
        state: resolver.state(),
        active_variant: active.clone(),
        variation: sync.expected_variation(),
        page_url: None,
        outcomes,
        selection: resolver.selection().clone(),
        panel: resolver.panel(),
        quantity: control,
        summary,
        message,
    }
}
