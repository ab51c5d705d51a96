//! Selection state machine: turns facet clicks into a concrete family member.
//!
//! States are [`ResolutionState::Unselected`] and
//! [`ResolutionState::Resolved`]. A click either resolves to a real member,
//! resets to `Unselected`, or (when no member holds the clicked value at all)
//! leaves everything untouched. Whenever the state is `Resolved`, the
//! selection is a projection of that member's snapshot.
//!
//! Ties are broken by listing order: main first, then variants as supplied.

use serde::Serialize;

use crate::availability::{facet_availability, facet_panel, FacetAvailability, FacetSection};
use crate::catalog::FacetCatalog;
use crate::facet::{matches, FacetKey};
use crate::family::{Family, FamilyMember};
use crate::selection::Selection;
use crate::types::MemberId;

/// Where the resolver currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "memberId", rename_all = "camelCase")]
pub enum ResolutionState {
    Unselected,
    Resolved(MemberId),
}

/// Result of a single facet click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "memberId", rename_all = "camelCase")]
pub enum ClickOutcome {
    /// The clicked value was already selected; the selection was cleared.
    Reset,
    /// The selection now mirrors this member.
    Resolved(MemberId),
    /// No member holds the clicked value; nothing changed.
    Ignored,
}

/// Headless resolver over one immutable family.
#[derive(Debug, Clone)]
pub struct SelectionResolver {
    family: Family,
    catalog: FacetCatalog,
    state: ResolutionState,
    selection: Selection,
}

/// Parse the string form of a member id. Surrounding whitespace is ignored.
pub fn parse_member_id(raw: &str) -> Option<MemberId> {
    raw.trim().parse().ok()
}

impl SelectionResolver {
    /// Build the resolver and mount it on `requested` (the deep-linked id).
    pub fn mount(family: Family, requested: Option<&str>) -> Self {
        let catalog = FacetCatalog::build(&family);
        let mut resolver = Self {
            family,
            catalog,
            state: ResolutionState::Unselected,
            selection: Selection::new(),
        };
        resolver.remount(requested);
        resolver
    }

    /// Re-enter the mount transition, e.g. after back/forward navigation.
    ///
    /// A known id resolves to that member. A missing, unparseable or unknown
    /// id falls back to the main item.
    pub fn remount(&mut self, requested: Option<&str>) -> ResolutionState {
        let requested_member = requested.and_then(|raw| {
            let found = parse_member_id(raw).and_then(|id| self.family.get(id));
            if found.is_none() {
                tracing::warn!(
                    variation = raw,
                    main_id = self.family.main().id,
                    "Unknown variation id, falling back to main item"
                );
            }
            found
        });

        let member = requested_member.unwrap_or_else(|| self.family.main());
        self.selection = Selection::project(&member.facets, None, &Selection::new());
        self.state = ResolutionState::Resolved(member.id);

        tracing::debug!(member_id = member.id, "Mounted selection");
        self.state
    }

    /// Apply a click on `value` of `facet`.
    pub fn click(&mut self, facet: FacetKey, value: &str) -> ClickOutcome {
        if self.selection.is_selected(facet, value) {
            self.selection = Selection::new();
            self.state = ResolutionState::Unselected;
            tracing::debug!(%facet, value, "Selected value clicked again, selection reset");
            return ClickOutcome::Reset;
        }

        let candidate = self.selection.with(facet, value);
        let exact = self
            .family
            .members()
            .iter()
            .find(|member| candidate.is_satisfied_by(&member.facets, None));

        // An unconstrained facet may conflict with the rest of the selection;
        // fall back to the first member holding the clicked value.
        let member = exact.or_else(|| {
            self.family
                .members()
                .iter()
                .find(|member| matches(member.facets.get(facet), value))
        });

        let Some(member) = member else {
            tracing::warn!(
                %facet,
                value,
                "Clicked value matches no family member, keeping previous selection"
            );
            return ClickOutcome::Ignored;
        };

        self.selection = Selection::project(&member.facets, Some((facet, value)), &self.selection);
        self.state = ResolutionState::Resolved(member.id);

        tracing::debug!(
            %facet,
            value,
            member_id = member.id,
            exact = exact.is_some(),
            "Click resolved"
        );
        ClickOutcome::Resolved(member.id)
    }

    pub fn state(&self) -> ResolutionState {
        self.state
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn family(&self) -> &Family {
        &self.family
    }

    pub fn catalog(&self) -> &FacetCatalog {
        &self.catalog
    }

    /// The member referenced by the resolution, or `None` when unselected.
    pub fn resolved_member(&self) -> Option<&FamilyMember> {
        match self.state {
            ResolutionState::Resolved(id) => self.family.get(id),
            ResolutionState::Unselected => None,
        }
    }

    /// The resolved member, or the main item when unselected.
    pub fn active_variant(&self) -> &FamilyMember {
        self.resolved_member().unwrap_or_else(|| self.family.main())
    }

    pub fn availability(&self, facet: FacetKey) -> FacetAvailability {
        facet_availability(&self.family, &self.catalog, &self.selection, facet)
    }

    pub fn panel(&self) -> Vec<FacetSection> {
        facet_panel(&self.family, &self.catalog, &self.selection)
    }
}
