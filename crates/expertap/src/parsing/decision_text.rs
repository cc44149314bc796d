//! Structured metadata extraction from CNSC decision text
//!
//! Parsing runs in stages: filename metadata, header/date/CPV/codes from the text,
//! parties, the ruling from the dispositive, and a final reconciliation pass that
//! records disagreements as warnings instead of failing.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::codes::contest_type_for;
use super::filename::{parse_filename, FilenameParse};
use super::sections::DISPOSITIVE_MARKERS;
use crate::types::decision::REJECTION_REASONS;
use crate::types::{CpvSource, FilenameOutcome, Outcome, ParsedDecision};

/// Characters of the dispositive examined for the ruling
const DISPOSITIVE_WINDOW: usize = 2000;

/// Maximum stored length of a party name
const MAX_PARTY_CHARS: usize = 500;

static DECISION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Nr\.?\s*(\d+)/([A-Z]\d+)/(\d+)").expect("Invalid header regex")
});

static DATE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:Data|din)\s*[:\s]*(\d{1,2})\s+(ianuarie|februarie|martie|aprilie|mai|iunie|iulie|august|septembrie|octombrie|noiembrie|decembrie)\s+(\d{4})",
    )
    .expect("Invalid date regex")
});

static DATE_NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:Data|din)\s*[:\s]*(\d{1,2})[.\-/](\d{1,2})[.\-/](\d{4})")
        .expect("Invalid date regex")
});

static CPV: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{8}-\d)\b").expect("Invalid CPV regex"));

static CRITICISM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b([DR][1-7]|DAL|RAL)\b").expect("Invalid criticism regex")
});

static CLAIMANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Contestator|Petent)[:\s]+([^\n]+?)(?:\n|,\s*în)")
        .expect("Invalid claimant regex")
});

static AUTHORITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Autoritate(?:\s+contractantă)?|Intimat)[:\s]+([^\n]+?)(?:\n|,\s*în)")
        .expect("Invalid authority regex")
});

static ADMIS_PARTIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Admite,?\s+în\s+parte,?\s+contestația").expect("Invalid ruling regex")
});

static ADMIS_INTEGRAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Admite(?:,?\s+în\s+totalitate)?\s+contestația").expect("Invalid ruling regex")
});

static RESPINS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Respinge,?\s+(?:ca\s+)?(\w+),?\s+contestația").expect("Invalid ruling regex")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Parse decision text, using `source` (a path or bare filename) for identity
pub fn parse_decision_text(text: &str, source: Option<&str>) -> ParsedDecision {
    let mut warnings = Vec::new();

    let filename = source
        .and_then(|s| Path::new(s).file_name())
        .map(|n| n.to_string_lossy().into_owned());

    let mut decision = match filename.as_deref() {
        Some(name) => match parse_filename(name) {
            FilenameParse::Valid(meta) => {
                let mut d = ParsedDecision::empty(meta.filename, text);
                d.bulletin_year = meta.bulletin_year;
                d.bulletin_number = meta.bulletin_number;
                d.contest_type = meta.contest_type;
                d.criticism_codes = meta.criticism_codes;
                d.cpv_source = meta.cpv_code.as_ref().map(|_| CpvSource::Filename);
                d.cpv_code = meta.cpv_code;
                d.filename_outcome = meta.outcome;
                d
            }
            FilenameParse::Invalid { reason } => {
                warnings.push(format!("Filename parse warning: {}", reason));
                ParsedDecision::empty(name, text)
            }
        },
        None => ParsedDecision::empty("unknown.txt", text),
    };

    extract_text_metadata(&mut decision, text, &mut warnings);
    extract_parties(&mut decision, text);
    extract_outcome(&mut decision, text);
    reconcile(&mut decision, &mut warnings);

    decision.parse_warnings = warnings;

    tracing::debug!(
        external_id = %decision.external_id(),
        contest_type = decision.contest_type.as_str(),
        outcome = decision.outcome.map(|o| o.as_str()).unwrap_or("X"),
        codes = ?decision.criticism_codes,
        "decision parsed"
    );

    decision
}

fn extract_text_metadata(decision: &mut ParsedDecision, text: &str, warnings: &mut Vec<String>) {
    // "Nr. 3754/C8/4446" -> bulletin 3754, panel C8, decision 4446
    if let Some(caps) = DECISION_HEADER.captures(text) {
        if let Some(text_bulletin) = caps.get(1).and_then(|m| m.as_str().parse::<i64>().ok()) {
            if decision.bulletin_number != 0 && text_bulletin != decision.bulletin_number {
                warnings.push(format!(
                    "Numar BO mismatch: filename={}, text={}",
                    decision.bulletin_number, text_bulletin
                ));
            }
        }
        decision.panel = caps.get(2).map(|m| m.as_str().to_uppercase());
        decision.decision_number = caps.get(3).and_then(|m| m.as_str().parse().ok());
    }

    decision.decision_date = extract_date(text);

    if decision.cpv_code.is_none() {
        if let Some(m) = CPV.captures(text).and_then(|c| c.get(1)) {
            decision.cpv_code = Some(m.as_str().to_string());
            decision.cpv_source = Some(CpvSource::TextExplicit);
        }
    }

    if decision.criticism_codes.is_empty() {
        let mut codes: Vec<String> = Vec::new();
        for caps in CRITICISM.captures_iter(text) {
            let code = caps[1].to_uppercase();
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        if !codes.is_empty() {
            decision.contest_type = contest_type_for(&codes);
            decision.criticism_codes = codes;
        }
    }
}

/// Romanian month names first (`10 decembrie 2025`), then `10.12.2025`
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    if let Some(caps) = DATE_TEXT.captures(text) {
        let day = caps[1].parse::<u32>().ok();
        let month = month_number(&caps[2]);
        let year = caps[3].parse::<i32>().ok();
        if let (Some(d), Some(m), Some(y)) = (day, month, year) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return Some(date);
            }
        }
    }

    let caps = DATE_NUMERIC.captures(text)?;
    let day = caps[1].parse::<u32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let year = caps[3].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "ianuarie", "februarie", "martie", "aprilie", "mai", "iunie",
        "iulie", "august", "septembrie", "octombrie", "noiembrie", "decembrie",
    ];
    let lower = name.to_lowercase();
    MONTHS.iter().position(|m| *m == lower).map(|i| i as u32 + 1)
}

fn extract_parties(decision: &mut ParsedDecision, text: &str) {
    decision.claimant = CLAIMANT
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| clean_party_name(m.as_str()))
        .filter(|s| !s.is_empty());

    decision.contracting_authority = AUTHORITY
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| clean_party_name(m.as_str()))
        .filter(|s| !s.is_empty());
}

fn clean_party_name(name: &str) -> String {
    WHITESPACE
        .replace_all(name.trim(), " ")
        .chars()
        .take(MAX_PARTY_CHARS)
        .collect()
}

/// Ruling from the dispositive: partial admission, then admission, then rejection
fn extract_outcome(decision: &mut ParsedDecision, text: &str) {
    let Some(start) = DISPOSITIVE_MARKERS.iter().find_map(|marker| text.find(marker)) else {
        return;
    };

    let window: String = text[start..].chars().take(DISPOSITIVE_WINDOW).collect();

    if ADMIS_PARTIAL.is_match(&window) {
        decision.outcome = Some(Outcome::AdmisPartial);
        return;
    }

    if ADMIS_INTEGRAL.is_match(&window) {
        decision.outcome = Some(Outcome::Admis);
        return;
    }

    if let Some(caps) = RESPINS.captures(&window) {
        decision.outcome = Some(Outcome::Respins);
        let reason = caps[1].to_lowercase();
        decision.rejection_reason = if REJECTION_REASONS.contains(&reason.as_str()) {
            Some(reason)
        } else {
            let lower = window.to_lowercase();
            REJECTION_REASONS
                .iter()
                .find(|r| lower.contains(*r))
                .map(|r| r.to_string())
        };
    }
}

fn reconcile(decision: &mut ParsedDecision, warnings: &mut Vec<String>) {
    if decision.filename_outcome != FilenameOutcome::X {
        match decision.outcome {
            None => decision.outcome = Outcome::from_filename(decision.filename_outcome),
            Some(outcome) => {
                let filename_admitted = decision.filename_outcome == FilenameOutcome::A;
                if filename_admitted != outcome.is_admitted() {
                    warnings.push(format!(
                        "Solution mismatch: filename={}, text={}",
                        decision.filename_outcome.as_str(),
                        outcome.as_str()
                    ));
                }
            }
        }
    }

    if decision.criticism_codes.is_empty() {
        warnings.push("No criticism codes found".to_string());
    }

    if decision.cpv_code.is_none() {
        warnings.push("No CPV code found".to_string());
    }
}
