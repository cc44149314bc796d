//! CNSC decision records

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Contest type, deduced from the first criticism code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContestType {
    /// Criticism of the award documentation (D* codes)
    #[default]
    Documentatie,
    /// Criticism of the procedure result (R* codes)
    Rezultat,
}

impl ContestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContestType::Documentatie => "documentatie",
            ContestType::Rezultat => "rezultat",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "documentatie" => Some(ContestType::Documentatie),
            "rezultat" => Some(ContestType::Rezultat),
            _ => None,
        }
    }
}

/// Solution code carried by the filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilenameOutcome {
    /// Admitted
    A,
    /// Rejected
    R,
    /// Unknown
    #[default]
    X,
}

impl FilenameOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilenameOutcome::A => "A",
            FilenameOutcome::R => "R",
            FilenameOutcome::X => "X",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Some(FilenameOutcome::A),
            "R" => Some(FilenameOutcome::R),
            "X" => Some(FilenameOutcome::X),
            _ => None,
        }
    }
}

/// Ruling extracted from the dispositive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Admis,
    AdmisPartial,
    Respins,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Admis, Outcome::AdmisPartial, Outcome::Respins];

    /// Stored/serialized code
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Admis => "ADMIS",
            Outcome::AdmisPartial => "ADMIS_PARTIAL",
            Outcome::Respins => "RESPINS",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Admis => "Admis",
            Outcome::AdmisPartial => "Admis parțial",
            Outcome::Respins => "Respins",
        }
    }

    /// Accepts stored codes and a few common aliases, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADMIS" | "A" => Some(Outcome::Admis),
            "ADMIS_PARTIAL" | "PARTIAL" => Some(Outcome::AdmisPartial),
            "RESPINS" | "R" => Some(Outcome::Respins),
            _ => None,
        }
    }

    /// Outcome implied by a filename solution code
    pub fn from_filename(code: FilenameOutcome) -> Option<Self> {
        match code {
            FilenameOutcome::A => Some(Outcome::Admis),
            FilenameOutcome::R => Some(Outcome::Respins),
            FilenameOutcome::X => None,
        }
    }

    pub fn is_admitted(&self) -> bool {
        matches!(self, Outcome::Admis | Outcome::AdmisPartial)
    }
}

/// Where the CPV code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpvSource {
    Filename,
    TextExplicit,
}

impl CpvSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CpvSource::Filename => "filename",
            CpvSource::TextExplicit => "text_explicit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "filename" => Some(CpvSource::Filename),
            "text_explicit" => Some(CpvSource::TextExplicit),
            _ => None,
        }
    }
}

/// Known rejection grounds, as worded in dispositives
pub const REJECTION_REASONS: &[&str] = &[
    "nefondată",
    "tardivă",
    "lipsită de interes",
    "inadmisibilă",
    "rămasă fără obiect",
];

/// A decision parsed from text, ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDecision {
    pub filename: String,
    pub bulletin_year: i32,
    pub bulletin_number: i64,
    pub decision_number: Option<i64>,
    pub panel: Option<String>,
    pub decision_date: Option<NaiveDate>,
    pub contest_type: ContestType,
    pub criticism_codes: Vec<String>,
    pub cpv_code: Option<String>,
    pub cpv_source: Option<CpvSource>,
    pub filename_outcome: FilenameOutcome,
    pub outcome: Option<Outcome>,
    pub rejection_reason: Option<String>,
    pub claimant: Option<String>,
    pub contracting_authority: Option<String>,
    pub full_text: String,
    pub parse_warnings: Vec<String>,
}

impl ParsedDecision {
    /// Empty record for a filename, before any text is examined
    pub fn empty(filename: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            bulletin_year: 0,
            bulletin_number: 0,
            decision_number: None,
            panel: None,
            decision_date: None,
            contest_type: ContestType::default(),
            criticism_codes: Vec::new(),
            cpv_code: None,
            cpv_source: None,
            filename_outcome: FilenameOutcome::X,
            outcome: None,
            rejection_reason: None,
            claimant: None,
            contracting_authority: None,
            full_text: full_text.into(),
            parse_warnings: Vec::new(),
        }
    }

    /// A record without bulletin identity cannot be stored
    pub fn has_identity(&self) -> bool {
        !(self.bulletin_year == 0 && self.bulletin_number == 0)
    }

    pub fn external_id(&self) -> String {
        external_id(self.bulletin_year, self.bulletin_number)
    }
}

/// A stored CNSC decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Surrogate id (UUID v4)
    pub id: String,
    pub filename: String,
    pub bulletin_year: i32,
    pub bulletin_number: i64,
    pub decision_number: Option<i64>,
    pub panel: Option<String>,
    pub decision_date: Option<NaiveDate>,
    pub contest_type: ContestType,
    pub criticism_codes: Vec<String>,
    pub cpv_code: Option<String>,
    pub cpv_source: Option<CpvSource>,
    pub filename_outcome: FilenameOutcome,
    pub outcome: Option<Outcome>,
    pub rejection_reason: Option<String>,
    pub claimant: Option<String>,
    pub contracting_authority: Option<String>,
    pub full_text: String,
    pub parse_warnings: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Decision {
    /// `BO{year}_{number}`
    pub fn external_id(&self) -> String {
        external_id(self.bulletin_year, self.bulletin_number)
    }

    /// e.g. `BO2025 - Nr. 3855 - [R2] - [ADMIS]`
    pub fn title(&self) -> String {
        let mut parts = vec![
            format!("BO{}", self.bulletin_year),
            format!("Nr. {}", self.bulletin_number),
        ];

        if !self.criticism_codes.is_empty() {
            parts.push(format!("[{}]", self.criticism_codes.join("+")));
        }

        match self.outcome {
            Some(outcome) => parts.push(format!("[{}]", outcome.as_str())),
            None if self.filename_outcome != FilenameOutcome::X => {
                parts.push(format!("[{}]", self.filename_outcome.as_str()))
            }
            None => {}
        }

        parts.join(" - ")
    }

    /// Decision date formatted `dd.mm.yyyy`
    pub fn date_display(&self) -> Option<String> {
        self.decision_date.map(|d| d.format("%d.%m.%Y").to_string())
    }

    pub fn summary(&self) -> DecisionSummary {
        DecisionSummary {
            id: self.id.clone(),
            external_id: self.external_id(),
            title: self.title(),
            filename: self.filename.clone(),
            bulletin_year: self.bulletin_year,
            bulletin_number: self.bulletin_number,
            decision_number: self.decision_number,
            decision_date: self.decision_date,
            contest_type: self.contest_type,
            criticism_codes: self.criticism_codes.clone(),
            cpv_code: self.cpv_code.clone(),
            outcome: self.outcome,
        }
    }
}

pub fn external_id(year: i32, number: i64) -> String {
    format!("BO{}_{}", year, number)
}

/// Decision row for list views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub id: String,
    pub external_id: String,
    pub title: String,
    pub filename: String,
    pub bulletin_year: i32,
    pub bulletin_number: i64,
    pub decision_number: Option<i64>,
    pub decision_date: Option<NaiveDate>,
    pub contest_type: ContestType,
    pub criticism_codes: Vec<String>,
    pub cpv_code: Option<String>,
    pub outcome: Option<Outcome>,
}

/// Full decision with derived fields and logical sections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionDetail {
    #[serde(flatten)]
    pub decision: Decision,
    pub external_id: String,
    pub title: String,
    pub sections: Vec<DecisionSection>,
}

/// Logical section kinds of a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ContestantRequests,
    AuthorityPointOfView,
    Intervention,
    Dispositive,
}

/// A contiguous section of a decision text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSection {
    pub kind: SectionKind,
    /// 1-based order within the decision
    pub order: usize,
    pub text: String,
}

/// Aggregate counts over the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionStats {
    pub total_decisions: u64,
    pub by_ruling: std::collections::BTreeMap<String, u64>,
    pub by_year: std::collections::BTreeMap<String, u64>,
    pub by_criticism: std::collections::BTreeMap<String, u64>,
    pub by_contest_type: std::collections::BTreeMap<String, u64>,
    pub last_updated: Option<DateTime<Utc>>,
}
