use crate::models::{
    CanonicalQuestion, FieldRef, LimitProfile, ValidationViolation, ViolationKind, char_len,
};

/// Checks `q` against `profile` and returns every violation found, in a fixed
/// order: stem, option count, each option, correct index, explanation.
///
/// An empty result means the question fits the poll limits as is.
pub fn validate(q: &CanonicalQuestion, profile: &LimitProfile) -> Vec<ValidationViolation> {
    let mut violations = vec![];

    check_text(
        &mut violations,
        FieldRef::Stem,
        &q.stem,
        profile.stem_min_len,
        profile.stem_max_len,
    );

    let count = q.options.len();
    if count < profile.min_options {
        violations.push(ValidationViolation {
            field: FieldRef::OptionCount,
            kind: ViolationKind::TooFewOptions,
            observed: count,
            limit: profile.min_options,
        });
    } else if count > profile.max_options {
        violations.push(ValidationViolation {
            field: FieldRef::OptionCount,
            kind: ViolationKind::TooManyOptions,
            observed: count,
            limit: profile.max_options,
        });
    }

    for (i, option) in q.options.iter().enumerate() {
        check_text(
            &mut violations,
            FieldRef::Option(i),
            option,
            profile.option_min_len,
            profile.option_max_len,
        );
    }

    if q.correct_index >= count {
        violations.push(ValidationViolation {
            field: FieldRef::OptionCount,
            kind: ViolationKind::MissingCorrectAnswer,
            observed: q.correct_index,
            limit: count,
        });
    }

    // Absent or blank explanations are legal; the default phrase stands in.
    if let Some(explanation) = &q.explanation {
        let len = char_len(explanation);
        if len > profile.explanation_max_len {
            violations.push(ValidationViolation {
                field: FieldRef::Explanation,
                kind: ViolationKind::TooLong,
                observed: len,
                limit: profile.explanation_max_len,
            });
        }
    }

    violations
}

fn check_text(
    violations: &mut Vec<ValidationViolation>,
    field: FieldRef,
    text: &str,
    min_len: usize,
    max_len: usize,
) {
    let len = char_len(text);
    let violation = if text.trim().is_empty() {
        Some((ViolationKind::EmptyField, min_len))
    } else if len < min_len {
        Some((ViolationKind::TooShort, min_len))
    } else if len > max_len {
        Some((ViolationKind::TooLong, max_len))
    } else {
        None
    };
    if let Some((kind, limit)) = violation {
        violations.push(ValidationViolation {
            field,
            kind,
            observed: len,
            limit,
        });
    }
}
