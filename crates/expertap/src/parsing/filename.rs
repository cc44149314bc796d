//! Decision filename convention
//!
//! `BO{year}_{bulletin}_{codes}[_CPV_{cpv}]_{A|R|X}.txt`, e.g.
//! `BO2025_3855_R2_CPV_55520000-1_A.txt` or `BO2024_5678_R3_R4_X.txt`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::codes::{contest_type_for, is_valid_code};
use crate::types::{ContestType, FilenameOutcome};

static FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^BO(\d{4})_(\d+)_([A-Za-z0-9_]+?)(?:_CPV_(\d{8}(?:-\d)?))?_([ARX])\.txt$")
        .expect("Invalid filename regex")
});

/// Metadata carried by a well-formed filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameMeta {
    pub filename: String,
    pub bulletin_year: i32,
    pub bulletin_number: i64,
    pub criticism_codes: Vec<String>,
    pub cpv_code: Option<String>,
    pub outcome: FilenameOutcome,
    pub contest_type: ContestType,
}

/// Result of parsing a filename; never panics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameParse {
    Valid(FilenameMeta),
    Invalid { reason: String },
}

impl FilenameParse {
    pub fn is_valid(&self) -> bool {
        matches!(self, FilenameParse::Valid(_))
    }

    pub fn into_meta(self) -> Option<FilenameMeta> {
        match self {
            FilenameParse::Valid(meta) => Some(meta),
            FilenameParse::Invalid { .. } => None,
        }
    }
}

/// Parse a bare filename (no directory components)
pub fn parse_filename(filename: &str) -> FilenameParse {
    let Some(caps) = FILENAME.captures(filename) else {
        return invalid(format!("Filename doesn't match expected pattern: {}", filename));
    };
    let (year, number, codes, cpv, outcome) = (
        caps.get(1).map(|m| m.as_str()),
        caps.get(2).map(|m| m.as_str()),
        caps.get(3).map(|m| m.as_str()),
        caps.get(4).map(|m| m.as_str().to_string()),
        caps.get(5).map(|m| m.as_str()),
    );

    let (Some(year), Some(number), Some(codes), Some(outcome)) = (year, number, codes, outcome)
    else {
        return invalid(format!("Incomplete filename match: {}", filename));
    };

    let Ok(bulletin_year) = year.parse::<i32>() else {
        return invalid(format!("Invalid bulletin year: {}", year));
    };
    let Ok(bulletin_number) = number.parse::<i64>() else {
        return invalid(format!("Bulletin number out of range: {}", number));
    };

    let criticism_codes = split_codes(codes);
    if criticism_codes.is_empty() {
        return invalid(format!("No valid criticism codes found in: {}", codes));
    }

    let outcome = FilenameOutcome::parse(outcome).unwrap_or_default();
    let contest_type = contest_type_for(&criticism_codes);

    FilenameParse::Valid(FilenameMeta {
        filename: filename.to_string(),
        bulletin_year,
        bulletin_number,
        criticism_codes,
        cpv_code: cpv,
        outcome,
        contest_type,
    })
}

/// `D1_D4` -> `["D1", "D4"]`; unknown segments are dropped
fn split_codes(segment: &str) -> Vec<String> {
    segment
        .split('_')
        .map(|part| part.to_ascii_uppercase())
        .filter(|part| is_valid_code(part))
        .collect()
}

fn invalid(reason: String) -> FilenameParse {
    FilenameParse::Invalid { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> FilenameMeta {
        parse_filename(name).into_meta().expect("valid filename")
    }

    #[test]
    fn test_filename_with_cpv() {
        let m = meta("BO2025_3855_R2_CPV_55520000-1_A.txt");
        assert_eq!(m.bulletin_year, 2025);
        assert_eq!(m.bulletin_number, 3855);
        assert_eq!(m.criticism_codes, vec!["R2"]);
        assert_eq!(m.cpv_code.as_deref(), Some("55520000-1"));
        assert_eq!(m.outcome, FilenameOutcome::A);
        assert_eq!(m.contest_type, ContestType::Rezultat);
    }

    #[test]
    fn test_filename_multiple_codes() {
        let m = meta("BO2025_1234_D1_D4_CPV_45233140-2_R.txt");
        assert_eq!(m.criticism_codes, vec!["D1", "D4"]);
        assert_eq!(m.contest_type, ContestType::Documentatie);
        assert_eq!(m.outcome, FilenameOutcome::R);
    }

    #[test]
    fn test_filename_without_cpv() {
        let m = meta("BO2024_5678_R3_R4_X.txt");
        assert_eq!(m.criticism_codes, vec!["R3", "R4"]);
        assert!(m.cpv_code.is_none());
        assert_eq!(m.outcome, FilenameOutcome::X);
    }

    #[test]
    fn test_filename_case_insensitive() {
        let m = meta("bo2024_15_d2_cpv_12345678-9_a.TXT");
        assert_eq!(m.criticism_codes, vec!["D2"]);
        assert_eq!(m.outcome, FilenameOutcome::A);
    }

    #[test]
    fn test_cpv_without_check_digit() {
        let m = meta("BO2023_77_DAL_CPV_45000000_R.txt");
        assert_eq!(m.cpv_code.as_deref(), Some("45000000"));
        assert_eq!(m.criticism_codes, vec!["DAL"]);
    }

    #[test]
    fn test_invalid_filenames() {
        for name in [
            "",
            "decision.txt",
            "BO2025_3855_R2_A.pdf",
            "BO25_3855_R2_A.txt",
            "BO2025_3855_XYZ_A.txt",
            "BO2025_3855_R2_Q.txt",
            "BO2025_99999999999999999999999_R2_A.txt",
        ] {
            assert!(
                matches!(parse_filename(name), FilenameParse::Invalid { .. }),
                "expected invalid: {name}"
            );
        }
    }

    #[test]
    fn test_unknown_segments_dropped() {
        let m = meta("BO2025_10_R2_FOO_R5_A.txt");
        assert_eq!(m.criticism_codes, vec!["R2", "R5"]);
    }
}
