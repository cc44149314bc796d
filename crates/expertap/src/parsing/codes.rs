//! CNSC criticism code legend

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::ContestType;

/// One entry of the criticism legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CriticismCode {
    pub code: &'static str,
    pub contest_type: ContestType,
    pub description: &'static str,
}

const fn doc(code: &'static str, description: &'static str) -> CriticismCode {
    CriticismCode { code, contest_type: ContestType::Documentatie, description }
}

const fn res(code: &'static str, description: &'static str) -> CriticismCode {
    CriticismCode { code, contest_type: ContestType::Rezultat, description }
}

/// All 16 codes, documentation criticisms first
pub const CRITICISM_CODES: [CriticismCode; 16] = [
    doc("D1", "Cerințe restrictive: experiență similară, criterii calificare, specificații tehnice"),
    doc("D2", "Criterii atribuire/factori evaluare fără algoritm calcul sau cu algoritm netransparent/subiectiv"),
    doc("D3", "Denumiri tehnologii/produse/mărci/producători fără sintagma 'sau echivalent'"),
    doc("D4", "Lipsa răspuns clar/complet la solicitările de clarificări privind documentația"),
    doc("D5", "Forma de constituire a garanției de participare"),
    doc("D6", "Clauze contractuale inechitabile sau excesive"),
    doc("D7", "Nedivizarea achiziției pe loturi (produse/lucrări similare)"),
    doc("DAL", "Altele (documentație) - necesită extragere din text"),
    res("R1", "Contestații contra PV ședință deschidere (garanție participare, mod desfășurare)"),
    res("R2", "Respingerea ofertei contestatorului ca neconformă sau inacceptabilă"),
    res("R3", "Preț neobișnuit de scăzut al ofertelor altor participanți"),
    res("R4", "Documente calificare ale altor ofertanți / mod de punctare-evaluare"),
    res("R5", "Lipsa precizării motivelor de respingere în comunicare"),
    res("R6", "Lipsa solicitare clarificări propunere tehnică/preț sau apreciere incorectă răspunsuri"),
    res("R7", "Anularea fără temei legal a procedurii de către AC"),
    res("RAL", "Altele (rezultat) - necesită extragere din text"),
];

/// True for `D1..D7`, `DAL`, `R1..R7`, `RAL` (case-insensitive)
pub fn is_valid_code(code: &str) -> bool {
    let upper = code.to_ascii_uppercase();
    CRITICISM_CODES.iter().any(|c| c.code == upper)
}

/// Contest type for a code, judged by its prefix
pub fn contest_type_of(code: &str) -> Result<ContestType> {
    match code.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('D') => Ok(ContestType::Documentatie),
        Some('R') => Ok(ContestType::Rezultat),
        _ => Err(Error::validation(format!("Unknown criticism code prefix: {}", code))),
    }
}

/// Contest type of a code list: the first code wins, documentation when empty
pub fn contest_type_for(codes: &[String]) -> ContestType {
    codes
        .first()
        .and_then(|c| contest_type_of(c).ok())
        .unwrap_or_default()
}

/// Legend description, or `Cod necunoscut`
pub fn describe(code: &str) -> &'static str {
    let upper = code.to_ascii_uppercase();
    CRITICISM_CODES
        .iter()
        .find(|c| c.code == upper)
        .map(|c| c.description)
        .unwrap_or("Cod necunoscut")
}
