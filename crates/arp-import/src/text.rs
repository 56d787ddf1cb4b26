//! Text normalisation shared by header mapping and row decoding.

/// Fold one accented Latin character to its ASCII base letter.
fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

pub fn strip_accents(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Collapse internal whitespace runs to one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Header key: accent-stripped, uppercased, non-alphanumeric runs joined by
/// a single underscore, no leading/trailing underscore.
///
/// `"Especificação_"` → `"ESPECIFICACAO"`, `"R$ Unit."` → `"R_UNIT"`.
pub fn header_key(raw: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for c in strip_accents(raw.trim().trim_start_matches('\u{feff}')).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c.to_ascii_uppercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Canonical token every "unit" synonym collapses to.
pub const CANONICAL_UNIT: &str = "UNIDADE";

const UNIT_SYNONYMS: &[&str] = &["UN", "UND", "UNID", "UNIDADE", "UNIDADES", "UNIT", "UNITS", "UNI", "UNDS"];

/// Normalise a unit of measure: accents and trailing punctuation stripped,
/// uppercased, "unit" synonyms collapsed to [`CANONICAL_UNIT`].
pub fn normalize_unit(raw: &str) -> String {
    let folded = collapse_whitespace(&strip_accents(raw)).to_uppercase();
    let trimmed = folded
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_string();
    if UNIT_SYNONYMS.contains(&trimmed.as_str()) {
        CANONICAL_UNIT.to_string()
    } else {
        trimmed
    }
}

/// Boilerplate marker that ends the commercial part of a specification.
const NAME_MARKER: &str = ", CONFORME";

/// Commercial name: the specification cut at the first ", CONFORME"
/// (case-insensitive), else at the first comma; whitespace collapsed.
pub fn commercial_name(specification: &str) -> String {
    // ASCII uppercasing keeps byte offsets aligned with the original.
    let upper = specification.to_ascii_uppercase();
    let cut = upper
        .find(NAME_MARKER)
        .or_else(|| specification.find(','))
        .unwrap_or(specification.len());
    let name = collapse_whitespace(&specification[..cut]);
    if name.is_empty() {
        collapse_whitespace(specification)
    } else {
        name
    }
}
