//! Red-flag analysis types

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Minimum document length accepted for analysis
pub const MIN_REDFLAG_TEXT_CHARS: usize = 10;

/// Fixed severity scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critica,
    Medie,
    Scazuta,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critica => "CRITICĂ",
            Severity::Medie => "MEDIE",
            Severity::Scazuta => "SCĂZUTĂ",
            Severity::Info => "INFO",
        }
    }

    /// Lenient parse: ignores case and Romanian diacritics
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .to_uppercase()
            .chars()
            .map(|c| match c {
                'Ă' | 'Â' => 'A',
                'Î' => 'I',
                'Ș' | 'Ş' => 'S',
                'Ț' | 'Ţ' => 'T',
                other => other,
            })
            .collect();

        match folded.as_str() {
            "CRITICA" | "CRITIC" | "CRITICAL" => Some(Severity::Critica),
            "MEDIE" | "MEDIU" | "MEDIUM" => Some(Severity::Medie),
            "SCAZUTA" | "SCAZUT" | "LOW" => Some(Severity::Scazuta),
            "INFO" => Some(Severity::Info),
            _ => None,
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Severity::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown severity: {}", raw)))
    }
}

/// A problematic clause found in procurement documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedFlag {
    pub category: String,
    pub severity: Severity,
    pub clause: String,
    pub issue: String,
    pub legal_reference: String,
    pub recommendation: String,
    #[serde(default)]
    pub decision_refs: Vec<String>,
}

/// POST /api/v1/redflags payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedFlagsRequest {
    pub text: String,
    #[serde(default = "default_use_jurisprudence")]
    pub use_jurisprudence: bool,
}

fn default_use_jurisprudence() -> bool {
    true
}

impl RedFlagsRequest {
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().chars().count() < MIN_REDFLAG_TEXT_CHARS {
            return Err(Error::validation(format!(
                "text must have at least {} characters",
                MIN_REDFLAG_TEXT_CHARS
            )));
        }
        Ok(())
    }
}

/// POST /api/v1/redflags response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedFlagsResponse {
    pub red_flags: Vec<RedFlag>,
    pub total_count: usize,
    pub critical_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub used_jurisprudence: bool,
}

impl RedFlagsResponse {
    pub fn new(red_flags: Vec<RedFlag>, used_jurisprudence: bool) -> Self {
        let count = |s: Severity| red_flags.iter().filter(|f| f.severity == s).count();
        Self {
            total_count: red_flags.len(),
            critical_count: count(Severity::Critica),
            medium_count: count(Severity::Medie),
            low_count: count(Severity::Scazuta),
            red_flags,
            used_jurisprudence,
        }
    }
}
