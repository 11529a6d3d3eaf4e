use std::fmt;

use serde::Serialize;

/// The part of a question a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldRef {
    Stem,
    /// An answer option, by index.
    Option(usize),
    Explanation,
    /// The number of options as a whole.
    OptionCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ViolationKind {
    TooLong,
    TooShort,
    TooFewOptions,
    TooManyOptions,
    MissingCorrectAnswer,
    EmptyField,
}

/// A single way a question fails to fit a [`LimitProfile`](super::LimitProfile).
///
/// `observed` and `limit` are in characters for length checks, in options for
/// count checks, and hold the correct index and option count for
/// [`ViolationKind::MissingCorrectAnswer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationViolation {
    pub field: FieldRef,
    pub kind: ViolationKind,
    pub observed: usize,
    pub limit: usize,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Stem => write!(f, "stem"),
            FieldRef::Option(i) => write!(f, "option {}", i + 1),
            FieldRef::Explanation => write!(f, "explanation"),
            FieldRef::OptionCount => write!(f, "option count"),
        }
    }
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            field,
            observed,
            limit,
            ..
        } = self;
        match self.kind {
            ViolationKind::TooLong => {
                write!(f, "{field} too long: {observed}/{limit} characters")
            }
            ViolationKind::TooShort => {
                write!(f, "{field} too short: {observed} characters (minimum {limit})")
            }
            ViolationKind::TooFewOptions => {
                write!(f, "too few options: {observed} (minimum {limit})")
            }
            ViolationKind::TooManyOptions => {
                write!(f, "too many options: {observed} (maximum {limit})")
            }
            ViolationKind::MissingCorrectAnswer => write!(
                f,
                "correct answer index {observed} is outside the {limit} options"
            ),
            ViolationKind::EmptyField => write!(f, "{field} is empty"),
        }
    }
}
