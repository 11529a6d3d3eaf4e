//! # Text Decoder
//!
//! Repairs UTF-8 text that was read as a single-byte codepage (Windows-1252 /
//! Latin-1) somewhere upstream, e.g. `Ã³` for `ó` or `Â¿` for `¿`.
//!
//! Two modes:
//! - [`DecodeMode::Structural`] keeps line boundaries so the segment extractor
//!   can locate delimiters per line.
//! - [`DecodeMode::Flatten`] collapses every line break and whitespace run into a
//!   single space, for field text after segments are known.

/// Known mis-decoded sequences and the characters they stand for.
///
/// Three-character sequences come first so a two-character entry never eats
/// part of a longer one.
const MOJIBAKE: &[(&str, &str)] = &[
    ("â€œ", "“"),
    ("â€\u{9d}", "”"),
    ("â€˜", "‘"),
    ("â€™", "’"),
    ("â€“", "–"),
    ("â€”", "—"),
    ("â€¦", "…"),
    ("â‚¬", "€"),
    ("Ã¡", "á"),
    ("Ã©", "é"),
    ("Ã\u{ad}", "í"),
    ("Ã³", "ó"),
    ("Ãº", "ú"),
    ("Ã±", "ñ"),
    ("Ã¼", "ü"),
    ("Ã\u{81}", "Á"),
    ("Ã‰", "É"),
    ("Ã\u{8d}", "Í"),
    ("Ã“", "Ó"),
    ("Ãš", "Ú"),
    ("Ã‘", "Ñ"),
    ("Ãœ", "Ü"),
    ("Â¿", "¿"),
    ("Â¡", "¡"),
    ("Âº", "º"),
    ("Âª", "ª"),
    ("Â\u{a0}", " "),
];

const BOM: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Repair characters, normalise line endings to `\n`, keep lines.
    Structural,
    /// Repair characters and collapse all whitespace to single spaces.
    Flatten,
}

/// Repairs mojibake and applies the whitespace policy of `mode`.
pub fn decode(raw: &str, mode: DecodeMode) -> String {
    let repaired = repair(raw.trim_start_matches(BOM));
    match mode {
        DecodeMode::Structural => repaired.replace("\r\n", "\n").replace('\r', "\n"),
        DecodeMode::Flatten => flatten(&repaired),
    }
}

/// Applies the substitution table only.
pub fn repair(raw: &str) -> String {
    let mut out = raw.to_string();
    for (broken, fixed) in MOJIBAKE {
        if out.contains(broken) {
            out = out.replace(broken, fixed);
        }
    }
    out
}

fn flatten(s: &str) -> String {
    // Literal `\n` escapes show up in text exported from JSON columns.
    s.replace("\\n", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("AdministraciÃ³n", "Administración")]
    #[case("EspaÃ±a", "España")]
    #[case("Â¿QuÃ© es?", "¿Qué es?")]
    #[case("ConstituciÃ³n espaÃ±ola, artÃ\u{ad}culo 1Âº", "Constitución española, artículo 1º")]
    #[case("Ã\u{81}frica y Ã‰vora", "África y Évora")]
    #[case("â€œcitaâ€\u{9d}", "“cita”")]
    #[case("sin cambios", "sin cambios")]
    fn repairs_known_sequences(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(decode(input, DecodeMode::Structural), expected);
    }

    #[test]
    fn structural_keeps_lines_and_normalises_endings() {
        assert_eq!(
            decode("uno\r\ndos\rtres\n  cuatro", DecodeMode::Structural),
            "uno\ndos\ntres\n  cuatro"
        );
    }

    #[test]
    fn flatten_collapses_whitespace_and_escaped_newlines() {
        assert_eq!(
            decode("  uno\r\n\tdos \\n tres\n\n", DecodeMode::Flatten),
            "uno dos tres"
        );
    }

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(decode("\u{feff}Hola", DecodeMode::Flatten), "Hola");
    }

    #[test]
    fn repair_is_idempotent() {
        let once = repair("PolicÃ\u{ad}a");
        assert_eq!(repair(&once), once);
    }
}
