//! Citation extraction and verification
//!
//! A citation is only ever built from text copied out of the stored decision, and
//! `verified` is recomputed against that text rather than trusted.

use crate::types::{Citation, Decision};

/// Fallback excerpt length when no sentence mentions a keyword
const FALLBACK_EXCERPT_CHARS: usize = 200;

/// Longest sentence quoted as-is
const MAX_SENTENCE_CHARS: usize = 400;

/// Citations for the decisions the answer actually refers to
pub fn extract_citations(answer: &str, decisions: &[Decision], keywords: &[String]) -> Vec<Citation> {
    decisions
        .iter()
        .filter(|d| is_referenced(answer, d))
        .map(|d| {
            let text = select_excerpt(&d.full_text, keywords).to_string();
            Citation {
                decision_id: d.id.clone(),
                external_id: d.external_id(),
                verified: verify(&text, &d.full_text),
                text,
            }
        })
        .collect()
}

/// Referenced by external id (`BO2025_3855`) or by decision number
fn is_referenced(answer: &str, decision: &Decision) -> bool {
    if contains_whole(answer, &decision.external_id()) {
        return true;
    }

    decision
        .decision_number
        .map(|n| contains_whole(answer, &n.to_string()))
        .unwrap_or(false)
}

/// `needle` appears with no digit directly before or after it
fn contains_whole(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(pos, _)| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + needle.len()..].chars().next();
        !before.is_some_and(|c| c.is_ascii_digit()) && !after.is_some_and(|c| c.is_ascii_digit())
    })
}

/// First sentence mentioning a keyword, else the opening of the text
pub fn select_excerpt<'a>(text: &'a str, keywords: &[String]) -> &'a str {
    if !keywords.is_empty() {
        for sentence in sentences(text) {
            let lower = sentence.to_lowercase();
            if keywords.iter().any(|k| lower.contains(&k.to_lowercase())) {
                return truncate_snippet(sentence, MAX_SENTENCE_CHARS);
            }
        }
    }

    truncate_snippet(text.trim(), FALLBACK_EXCERPT_CHARS)
}

/// Sentences split after `.`, `!` or `?` followed by whitespace, and at line breaks
fn sentences(text: &str) -> impl Iterator<Item = &str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev_terminal = false;

    for (i, c) in text.char_indices() {
        if c == '\n' || (prev_terminal && c.is_whitespace()) {
            pieces.push(&text[start..i]);
            start = i + c.len_utf8();
        }
        prev_terminal = matches!(c, '.' | '!' | '?');
    }
    pieces.push(&text[start..]);

    pieces.into_iter().map(str::trim).filter(|s| !s.is_empty())
}

/// True iff the excerpt occurs verbatim in the decision text
pub fn verify(excerpt: &str, decision_text: &str) -> bool {
    !excerpt.is_empty() && decision_text.contains(excerpt)
}

/// Cut to at most `max_chars` characters, preferring a word boundary
///
/// No ellipsis is added, so the result stays a substring of the input.
pub fn truncate_snippet(snippet: &str, max_chars: usize) -> &str {
    let Some((end, _)) = snippet.char_indices().nth(max_chars) else {
        return snippet;
    };

    // Try to end at a word boundary
    match snippet[..end].rfind(' ') {
        Some(pos) if pos > 0 => &snippet[..pos],
        _ => &snippet[..end],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContestType, FilenameOutcome};
    use chrono::Utc;

    fn decision(number: Option<i64>, text: &str) -> Decision {
        Decision {
            id: "uuid-1".into(),
            filename: "BO2024_120_D1_A.txt".into(),
            bulletin_year: 2024,
            bulletin_number: 120,
            decision_number: number,
            panel: None,
            decision_date: None,
            contest_type: ContestType::Documentatie,
            criticism_codes: vec!["D1".into()],
            cpv_code: None,
            cpv_source: None,
            filename_outcome: FilenameOutcome::A,
            outcome: None,
            rejection_reason: None,
            claimant: None,
            contracting_authority: None,
            full_text: text.into(),
            parse_warnings: vec![],
            created_at: Utc::now(),
        }
    }

    const TEXT: &str = "Antet decizie. Cerința privind experiența similară este excesivă! Restul textului.";

    #[test]
    fn test_cited_by_external_id() {
        let d = decision(None, TEXT);
        let citations = extract_citations("Conform deciziei BO2024_120, ...", &[d], &["similară".into()]);

        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].decision_id, "uuid-1");
        assert_eq!(citations[0].external_id, "BO2024_120");
        assert_eq!(citations[0].text, "Cerința privind experiența similară este excesivă!");
        assert!(citations[0].verified);
    }

    #[test]
    fn test_cited_by_decision_number() {
        let d = decision(Some(4446), TEXT);
        assert_eq!(extract_citations("Decizia nr. 4446 arată", &[d.clone()], &[]).len(), 1);
        assert!(extract_citations("Decizia nr. 44460 arată", &[d.clone()], &[]).is_empty());
        assert!(extract_citations("Nicio referință", &[d], &[]).is_empty());
    }

    #[test]
    fn test_external_id_is_not_a_prefix_match() {
        let short = Decision {
            id: "uuid-1".into(),
            bulletin_number: 1,
            ..decision(None, TEXT)
        };
        let long = Decision {
            id: "uuid-10".into(),
            bulletin_number: 10,
            ..decision(None, TEXT)
        };

        let cited: Vec<String> = extract_citations("Conform deciziei BO2024_10, ...", &[short, long], &[])
            .into_iter()
            .map(|c| c.external_id)
            .collect();
        assert_eq!(cited, vec!["BO2024_10"]);
    }

    #[test]
    fn test_missing_decision_number_never_matches() {
        let d = decision(None, TEXT);
        assert!(extract_citations("Orice răspuns", &[d], &[]).is_empty());
    }

    #[test]
    fn test_fallback_excerpt() {
        let long = "cuvânt ".repeat(100);
        let excerpt = select_excerpt(&long, &["absent".into()]);
        assert!(excerpt.chars().count() <= FALLBACK_EXCERPT_CHARS);
        assert!(long.contains(excerpt));
    }

    #[test]
    fn test_sentence_split() {
        let parts: Vec<&str> = sentences("Unu. Doi? Art. 3.5 rămâne\nTrei").collect();
        assert_eq!(parts, vec!["Unu.", "Doi?", "Art.", "3.5 rămâne", "Trei"]);
    }

    #[test]
    fn test_verify_requires_substring() {
        assert!(verify("experiența similară", TEXT));
        assert!(!verify("experiența similara", TEXT));
        assert!(!verify("", TEXT));
    }

    #[test]
    fn test_truncate_snippet() {
        let snippet = "This is a very long snippet that needs to be truncated.";
        let truncated = truncate_snippet(snippet, 20);

        assert!(truncated.chars().count() <= 20);
        assert!(snippet.starts_with(truncated));
        assert_eq!(truncate_snippet("scurt", 20), "scurt");
    }
}
