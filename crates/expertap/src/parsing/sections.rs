//! Splits a decision into its logical sections by marker phrases

use crate::types::{DecisionSection, SectionKind};

/// Markers opening the dispositive, in lookup priority
pub const DISPOSITIVE_MARKERS: &[&str] = &[
    "CONSILIUL DECIDE:",
    "CONSILIUL HOTĂRĂȘTE:",
    "PENTRU ACESTE MOTIVE",
];

const AUTHORITY_MARKERS: &[&str] = &[
    "Punct de vedere",
    "Autoritatea contractantă a formulat punct de vedere",
    "a transmis punct de vedere",
];

const INTERVENTION_MARKERS: &[&str] = &[
    "Cerere de intervenție",
    "a formulat cerere de intervenție",
    "Intervenient",
];

const CONTESTANT_MARKERS: &[&str] = &[
    "Contestatorul solicită",
    "În contestație se solicită",
    "Prin contestație",
];

fn markers() -> [(SectionKind, &'static [&'static str]); 4] {
    [
        (SectionKind::Dispositive, DISPOSITIVE_MARKERS),
        (SectionKind::AuthorityPointOfView, AUTHORITY_MARKERS),
        (SectionKind::Intervention, INTERVENTION_MARKERS),
        (SectionKind::ContestantRequests, CONTESTANT_MARKERS),
    ]
}

/// Ordered sections; each runs from its marker to the next marker found
pub fn split_sections(text: &str) -> Vec<DecisionSection> {
    let mut positions: Vec<(usize, SectionKind)> = markers()
        .iter()
        .flat_map(|(kind, list)| list.iter().filter_map(move |m| text.find(m).map(|p| (p, *kind))))
        .collect();

    positions.sort_by_key(|(pos, _)| *pos);
    positions.dedup_by_key(|(pos, _)| *pos);

    let mut sections = Vec::with_capacity(positions.len());
    for (i, (start, kind)) in positions.iter().enumerate() {
        let end = positions.get(i + 1).map(|(p, _)| *p).unwrap_or(text.len());
        let body = text[*start..end].trim();
        if body.is_empty() {
            continue;
        }
        sections.push(DecisionSection {
            kind: *kind,
            order: sections.len() + 1,
            text: body.to_string(),
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_in_text_order() {
        let text = "Antet\nPrin contestație se cere X.\nPunct de vedere: AC respinge.\n\
                    Cerere de intervenție depusă.\nCONSILIUL DECIDE:\nRespinge contestația.";
        let sections = split_sections(text);
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();

        assert_eq!(
            kinds,
            vec![
                SectionKind::ContestantRequests,
                SectionKind::AuthorityPointOfView,
                SectionKind::Intervention,
                SectionKind::Dispositive,
            ]
        );
        assert_eq!(sections[0].order, 1);
        assert!(sections[3].text.starts_with("CONSILIUL DECIDE:"));
        assert!(sections[0].text.ends_with("se cere X."));
    }

    #[test]
    fn test_no_markers() {
        assert!(split_sections("Text fără secțiuni.").is_empty());
    }
}
