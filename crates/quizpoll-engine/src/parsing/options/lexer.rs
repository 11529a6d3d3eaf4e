use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::escape::{is_escaped, unescape};

use super::{
    cursor::Cursor,
    kinds::{AnswerMarker, GeneralFeedback, OptionFeedback, Weight},
};

/// One answer choice as written in the block.
#[derive(Debug, Clone, PartialEq)]
pub struct RawOption {
    pub text: String,
    pub correct: bool,
    /// Moodle grade weight, kept for diagnostics; correctness comes from the marker.
    pub weight: Option<f32>,
}

/// Everything the lexer found in an option block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LexedBlock {
    pub options: Vec<RawOption>,
    /// General feedback after `####`.
    pub feedback: Option<String>,
    /// Text inside the block before the first marker.
    pub preamble: Option<String>,
}

impl LexedBlock {
    /// Index of the first `=` option. Later `=` options never override it.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.correct)
    }
}

/// How the block is cut into fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitMode {
    /// Two or more lines start with a marker: only line-leading markers split,
    /// unmarked lines continue the previous option.
    Lines,
    /// Split at every unescaped marker, e.g. `=París~Madrid~Roma`.
    Inline,
}

struct Fragment<'a> {
    correct: bool,
    body: std::borrow::Cow<'a, str>,
}

/// Lexes a raw option block into options, general feedback and preamble.
pub fn lex(option_block: &str) -> LexedBlock {
    let (body, feedback) = split_feedback(option_block);

    let mode = if body.lines().filter(|l| AnswerMarker::leads(l)).count() >= 2 {
        SplitMode::Lines
    } else {
        SplitMode::Inline
    };
    let (preamble, fragments) = match mode {
        SplitMode::Lines => split_lines(body),
        SplitMode::Inline => split_inline(body),
    };

    LexedBlock {
        options: fragments.into_iter().filter_map(to_option).collect(),
        feedback,
        preamble: Some(clean_markup(&preamble)).filter(|p| !p.is_empty()),
    }
}

/// Separates trailing general feedback so `=`/`~` inside it are never read as
/// answer markers.
fn split_feedback(block: &str) -> (&str, Option<String>) {
    let Some((start, end)) = GeneralFeedback::find(block) else {
        return (block, None);
    };
    let feedback = block[end..]
        .split(GeneralFeedback::MARK)
        .map(str::trim)
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let feedback = clean_markup(&feedback);
    (&block[..start], Some(feedback).filter(|f| !f.is_empty()))
}

fn split_lines(body: &str) -> (String, Vec<Fragment<'_>>) {
    let mut preamble = String::new();
    let mut fragments: Vec<Fragment<'_>> = vec![];

    for line in body.lines() {
        let t = line.trim();
        let Some(&first) = t.as_bytes().first() else {
            continue;
        };
        match AnswerMarker::correctness(first) {
            Some(correct) => fragments.push(Fragment {
                correct,
                body: t[1..].into(),
            }),
            None => {
                let target = match fragments.last_mut() {
                    Some(f) => f.body.to_mut(),
                    None => &mut preamble,
                };
                if !target.is_empty() {
                    target.push(' ');
                }
                target.push_str(t);
            }
        }
    }

    (preamble, fragments)
}

fn split_inline(body: &str) -> (String, Vec<Fragment<'_>>) {
    let mut cur = Cursor::new(body);
    let mut marks = vec![];
    while let Some(at) = cur.seek_unescaped(|b| AnswerMarker::correctness(b).is_some()) {
        marks.push(at);
        cur.bump();
    }

    let preamble = body[..marks.first().copied().unwrap_or(body.len())].to_string();
    let fragments = marks
        .iter()
        .enumerate()
        .map(|(k, &at)| {
            let end = marks.get(k + 1).copied().unwrap_or(body.len());
            Fragment {
                correct: body.as_bytes()[at] == AnswerMarker::CORRECT,
                body: body[at + 1..end].into(),
            }
        })
        .collect();

    (preamble, fragments)
}

fn to_option(fragment: Fragment<'_>) -> Option<RawOption> {
    let (weight, body) = Weight::strip(&fragment.body);
    let body = match find_option_feedback(body) {
        Some(at) => &body[..at],
        None => body,
    };
    let text = clean_markup(body);
    (!text.is_empty()).then_some(RawOption {
        text,
        correct: fragment.correct,
        weight,
    })
}

/// First unescaped `#` that is not part of a numeric HTML entity (`&#225;`).
fn find_option_feedback(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    (0..bytes.len()).find(|&i| {
        bytes[i] == OptionFeedback::MARK
            && !is_escaped(body, i)
            && (i == 0 || bytes[i - 1] != b'&')
    })
}

/// Strips GIFT format tags and HTML, decodes entities and escapes, trims.
pub fn clean_markup(text: &str) -> String {
    static FORMAT_TAG: OnceLock<Regex> = OnceLock::new();
    static HTML_TAG: OnceLock<Regex> = OnceLock::new();
    let format_tag = FORMAT_TAG.get_or_init(|| {
        Regex::new(r"(?i)^\s*\[(?:html|markdown|plain|moodle)\]")
            .expect("Invalid format tag regex")
    });
    // Only tag-shaped text: `3 < 5 y 7 > 2` is not a tag.
    let html_tag = HTML_TAG
        .get_or_init(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("Invalid HTML tag regex"));

    let text = format_tag.replace(text, "");
    let text = html_tag.replace_all(&text, " ");
    let text = html_escape::decode_html_entities(&text);
    unescape(&text).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(block: &LexedBlock) -> Vec<&str> {
        block.options.iter().map(|o| o.text.as_str()).collect()
    }

    #[test]
    fn inline_block() {
        let lexed = lex("=París~Madrid~Roma");
        assert_eq!(texts(&lexed), vec!["París", "Madrid", "Roma"]);
        assert_eq!(lexed.correct_index(), Some(0));
        assert_eq!(lexed.feedback, None);
    }

    #[test]
    fn correct_answer_in_any_position() {
        assert_eq!(lex("~a ~b =c ~d").correct_index(), Some(2));
        assert_eq!(lex("\n~a\n~b\n~c\n=d\n").correct_index(), Some(3));
    }

    #[test]
    fn first_correct_marker_wins() {
        let lexed = lex("~a =b =c");
        assert_eq!(lexed.correct_index(), Some(1));
        assert!(lexed.options[2].correct);
    }

    #[test]
    fn line_mode_keeps_inner_markers() {
        let lexed = lex("\n=x = 5\n~x ~ 6\n");
        assert_eq!(texts(&lexed), vec!["x = 5", "x ~ 6"]);
    }

    #[test]
    fn line_mode_joins_continuation_lines() {
        let lexed = lex("\n=Primera parte\ny segunda\n~Otra\n");
        assert_eq!(texts(&lexed), vec!["Primera parte y segunda", "Otra"]);
    }

    #[test]
    fn feedback_is_isolated_before_splitting() {
        let lexed = lex("=a\n~b\n#### RETROALIMENTACIÓN: x = y ~ z");
        assert_eq!(texts(&lexed), vec!["a", "b"]);
        assert_eq!(lexed.feedback.as_deref(), Some("x = y ~ z"));
    }

    #[test]
    fn additional_feedback_sections_become_lines() {
        let lexed = lex("=a ~b #### Uno #### DESGLOSE: Dos");
        assert_eq!(lexed.feedback.as_deref(), Some("Uno\nDESGLOSE: Dos"));
    }

    #[test]
    fn empty_feedback_is_none() {
        assert_eq!(lex("=a ~b ####   ").feedback, None);
    }

    #[test]
    fn weights_and_option_feedback_are_stripped() {
        let lexed = lex("=%100%Sí#Correcto ~%-50%No#Incorrecto");
        assert_eq!(texts(&lexed), vec!["Sí", "No"]);
        assert_eq!(lexed.options[0].weight, Some(100.0));
        assert_eq!(lexed.options[1].weight, Some(-50.0));
    }

    #[test]
    fn markup_and_escapes_are_cleaned() {
        let lexed = lex(r"=[html]<b>Art&iacute;culo</b>1\=2 ~Mam&#225; \#3");
        assert_eq!(texts(&lexed), vec!["Artículo 1=2", "Mamá #3"]);
    }

    #[test]
    fn comparison_signs_are_not_tags() {
        assert_eq!(clean_markup("¿Es 3 < 5 y 7 > 2?"), "¿Es 3 < 5 y 7 > 2?");
        assert_eq!(clean_markup("a <br/>b</p>"), "a  b");
        assert_eq!(texts(&lex("=x < y ~x > y")), vec!["x < y", "x > y"]);
    }

    #[test]
    fn empty_fragments_are_dropped() {
        let lexed = lex("= ~ ~b =c");
        assert_eq!(texts(&lexed), vec!["b", "c"]);
        assert_eq!(lexed.correct_index(), Some(1));
    }

    #[test]
    fn preamble_before_first_marker() {
        let lexed = lex("¿Pregunta dentro? =a ~b");
        assert_eq!(lexed.preamble.as_deref(), Some("¿Pregunta dentro?"));
        assert_eq!(texts(&lexed), vec!["a", "b"]);
    }

    #[test]
    fn no_markers() {
        let lexed = lex("solo texto");
        assert!(lexed.options.is_empty());
        assert_eq!(lexed.correct_index(), None);
    }
}
