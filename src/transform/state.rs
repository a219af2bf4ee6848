// src/transform/state.rs
use once_cell::sync::Lazy;
use std::collections::HashMap;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// One federative unit of the static lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub region: &'static str,
}

/// The 27 federative units, in definition order.
///
/// The substring fallback in [`normalize_uf`] scans this slice front to
/// back, so the order is part of the matching behavior.
#[rustfmt::skip]
pub const STATES: &[StateInfo] = &[
    StateInfo { code: "AC", name: "Acre",                region: "Norte" },
    StateInfo { code: "AL", name: "Alagoas",             region: "Nordeste" },
    StateInfo { code: "AP", name: "Amapa",               region: "Norte" },
    StateInfo { code: "AM", name: "Amazonas",            region: "Norte" },
    StateInfo { code: "BA", name: "Bahia",               region: "Nordeste" },
    StateInfo { code: "CE", name: "Ceara",               region: "Nordeste" },
    StateInfo { code: "DF", name: "Distrito Federal",    region: "Centro-Oeste" },
    StateInfo { code: "ES", name: "Espirito Santo",      region: "Sudeste" },
    StateInfo { code: "GO", name: "Goias",               region: "Centro-Oeste" },
    StateInfo { code: "MA", name: "Maranhao",            region: "Nordeste" },
    StateInfo { code: "MT", name: "Mato Grosso",         region: "Centro-Oeste" },
    StateInfo { code: "MS", name: "Mato Grosso do Sul",  region: "Centro-Oeste" },
    StateInfo { code: "MG", name: "Minas Gerais",        region: "Sudeste" },
    StateInfo { code: "PA", name: "Para",                region: "Norte" },
    StateInfo { code: "PB", name: "Paraiba",             region: "Nordeste" },
    StateInfo { code: "PR", name: "Parana",              region: "Sul" },
    StateInfo { code: "PE", name: "Pernambuco",          region: "Nordeste" },
    StateInfo { code: "PI", name: "Piaui",               region: "Nordeste" },
    StateInfo { code: "RJ", name: "Rio de Janeiro",      region: "Sudeste" },
    StateInfo { code: "RN", name: "Rio Grande do Norte", region: "Nordeste" },
    StateInfo { code: "RS", name: "Rio Grande do Sul",   region: "Sul" },
    StateInfo { code: "RO", name: "Rondonia",            region: "Norte" },
    StateInfo { code: "RR", name: "Roraima",             region: "Norte" },
    StateInfo { code: "SC", name: "Santa Catarina",      region: "Sul" },
    StateInfo { code: "SP", name: "Sao Paulo",           region: "Sudeste" },
    StateInfo { code: "SE", name: "Sergipe",             region: "Nordeste" },
    StateInfo { code: "TO", name: "Tocantins",           region: "Norte" },
];

static STATE_INDEX: Lazy<HashMap<&'static str, &'static StateInfo>> =
    Lazy::new(|| STATES.iter().map(|s| (s.code, s)).collect());

/// Static name/region pair for a valid code.
pub fn state_info(code: &str) -> Option<&'static StateInfo> {
    STATE_INDEX.get(code).copied()
}

/// Cleaned values that mean "no state".
const EMPTY_MARKERS: &[&str] = &["", "--", "NA", "N/A", "NULL", "NONE", "0"];

/// Normalize a raw UF field to one of the 27 valid codes, or `None`.
///
/// Cleaning: uppercase, diacritics stripped, `.`/`,` removed, trimmed.
/// Matching order, first hit wins: last whitespace token ("Boa Vista RR" →
/// RR), exact two-letter code, then the first code in table order occurring
/// as a substring of the cleaned value. The substring pass can latch onto
/// municipality names ("Sao Paulo" contains "PA"); kept for parity with the
/// historical loader.
pub fn normalize_uf(input: Option<&str>) -> Option<&'static str> {
    let raw = input?.trim();
    if raw.is_empty() {
        return None;
    }

    let cleaned: String = raw
        .to_uppercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| *c != '.' && *c != ',')
        .collect();
    let cleaned = cleaned.trim();

    if EMPTY_MARKERS.contains(&cleaned) {
        return None;
    }

    if cleaned.contains(' ') {
        if let Some(last) = cleaned.split_whitespace().last() {
            if let Some(info) = STATE_INDEX.get(last) {
                return Some(info.code);
            }
        }
    }

    if cleaned.len() == 2 {
        if let Some(info) = STATE_INDEX.get(cleaned) {
            return Some(info.code);
        }
    }

    STATES
        .iter()
        .find(|s| cleaned.contains(s.code))
        .map(|s| s.code)
}
