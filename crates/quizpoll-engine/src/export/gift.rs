use std::fmt::Write;

use crate::models::CanonicalQuestion;
use crate::parsing::escape::escape;

/// Label written after the first feedback marker so explanation text is never
/// mistaken for a label itself.
const FEEDBACK_LABEL: &str = "#### RETROALIMENTACIÓN:";

/// Writes `q` as a GIFT item, one option per line.
///
/// GIFT specials are backslash-escaped and `& < >` are written as HTML
/// entities, so parsing the output gives back the same record.
pub fn to_gift(q: &CanonicalQuestion) -> String {
    let mut out = String::new();

    if let Some(title) = &q.title {
        let _ = write!(out, "::{}::", encode(title));
    }
    let _ = writeln!(out, "{} {{", encode(&q.stem));

    for (i, option) in q.options.iter().enumerate() {
        let marker = if i == q.correct_index { '=' } else { '~' };
        let _ = writeln!(out, "{marker}{}", encode(option));
    }

    if let Some(explanation) = q.explanation.as_deref().filter(|e| !e.trim().is_empty()) {
        let mut sections = explanation.lines().map(encode);
        if let Some(first) = sections.next() {
            let _ = writeln!(out, "{FEEDBACK_LABEL} {first}");
        }
        for section in sections {
            let _ = writeln!(out, "#### {section}");
        }
    }

    out.push('}');
    out
}

fn encode(text: &str) -> String {
    escape(&html_escape::encode_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceFormat;
    use crate::parsing::parse_text;
    use pretty_assertions::assert_eq;

    fn question() -> CanonicalQuestion {
        CanonicalQuestion {
            title: Some("Tema 1: Constitución".to_string()),
            stem: "¿Qué artículo regula {el derecho} a la educación?".to_string(),
            options: vec![
                "Artículo 27".to_string(),
                "Artículo 14 = igualdad".to_string(),
                "Artículo ~43 #salud".to_string(),
            ],
            correct_index: 0,
            explanation: Some("El art. 27 <CE> lo regula.\nFeedback: & más".to_string()),
            source_format: SourceFormat::StructuredRecord,
        }
    }

    #[test]
    fn writes_one_option_per_line() {
        let q = CanonicalQuestion {
            title: None,
            stem: "¿Capital?".to_string(),
            options: vec!["París".to_string(), "Roma".to_string()],
            correct_index: 1,
            explanation: None,
            source_format: SourceFormat::TextSegments,
        };
        assert_eq!(to_gift(&q), "¿Capital? {\n~París\n=Roma\n}");
    }

    #[test]
    fn escapes_specials() {
        let gift = to_gift(&question());
        assert!(
            gift.starts_with(r"::Tema 1\: Constitución::¿Qué artículo regula \{el derecho\}")
        );
        assert!(gift.contains(r"~Artículo 14 \= igualdad"));
        assert!(gift.contains("El art. 27 &lt;CE&gt; lo regula."));
    }

    #[test]
    fn reparses_to_the_same_record() {
        let q = question();
        let reparsed = parse_text(&to_gift(&q)).unwrap();
        assert_eq!(
            reparsed,
            CanonicalQuestion {
                source_format: SourceFormat::TextSegments,
                ..q
            }
        );
    }
}
