//! Outbound contact message built from the human-readable selection.

use serde::Serialize;

use crate::facet::FacetKey;
use crate::resolver::SelectionResolver;

/// Separator between values of a multi-valued facet.
pub const VALUE_SEPARATOR: &str = ", ";

/// One labelled line of the selection summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

/// Human-readable view of the current selection.
///
/// Empty when nothing is selected. Facets without a value are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub lines: Vec<SummaryLine>,
}

impl SelectionSummary {
    pub fn from_resolver(resolver: &SelectionResolver) -> Self {
        let Some(member) = resolver.resolved_member() else {
            return Self::default();
        };

        let lines = FacetKey::ALL
            .into_iter()
            .filter_map(|key| {
                let values = member.facets.get(key).values();
                if values.is_empty() {
                    return None;
                }
                Some(SummaryLine {
                    label: key.label(),
                    value: values.join(VALUE_SEPARATOR),
                })
            })
            .collect();

        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Compose the message a buyer sends to the seller about the active variant.
pub fn compose_contact_message(
    title: &str,
    summary: &SelectionSummary,
    price: Option<f64>,
    quantity: Option<u32>,
) -> String {
    let mut lines = vec![format!("Hello! I'm interested in \"{title}\".")];

    lines.extend(
        summary
            .lines
            .iter()
            .map(|line| format!("{}: {}", line.label, line.value)),
    );
    if let Some(quantity) = quantity {
        lines.push(format!("Quantity: {quantity}"));
    }
    if let Some(price) = price {
        lines.push(format!("Price: {price:.2}"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::FacetSnapshot;
    use crate::family::{Family, FamilyMember};

    fn resolver() -> SelectionResolver {
        let main = FamilyMember::new(
            1,
            FacetSnapshot {
                preservation_state: Some("Novo".into()),
                region: Some("Europe".into()),
                audio_languages: vec!["English".into(), "Português".into()],
                ..Default::default()
            },
        )
        .with_price(149.9);
        SelectionResolver::mount(Family::new(main, vec![]).unwrap(), None)
    }

    #[test]
    fn summary_joins_arrays_and_omits_absent_facets() {
        let summary = SelectionSummary::from_resolver(&resolver());
        let labels: Vec<_> = summary.lines.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Preservation state", "Region", "Audio"]);
        assert_eq!(summary.lines[2].value, "English, Português");
    }

    #[test]
    fn summary_is_empty_when_unselected() {
        let mut resolver = resolver();
        resolver.click(FacetKey::Region, "Europe");
        assert!(SelectionSummary::from_resolver(&resolver).is_empty());
    }

    #[test]
    fn message_includes_summary_quantity_and_price() {
        let resolver = resolver();
        let summary = SelectionSummary::from_resolver(&resolver);
        let message = compose_contact_message(
            "Chrono Trigger",
            &summary,
            resolver.active_variant().price,
            Some(2),
        );
        assert_eq!(
            message,
            "Hello! I'm interested in \"Chrono Trigger\".\n\
             Preservation state: Novo\n\
             Region: Europe\n\
             Audio: English, Português\n\
             Quantity: 2\n\
             Price: 149.90"
        );
    }

    #[test]
    fn message_without_selection_or_price() {
        let message = compose_contact_message("Chrono Trigger", &SelectionSummary::default(), None, None);
        assert_eq!(message, "Hello! I'm interested in \"Chrono Trigger\".");
        assert!(!message.contains(": \n"));
    }
}
