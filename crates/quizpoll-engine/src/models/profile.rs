use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::FieldRef;

pub const DEFAULT_STEM_MAX_LEN: usize = 200;
pub const DEFAULT_OPTION_MAX_LEN: usize = 100;
pub const DEFAULT_EXPLANATION_MAX_LEN: usize = 200;
pub const DEFAULT_MIN_OPTIONS: usize = 2;
pub const DEFAULT_MAX_OPTIONS: usize = 10;

/// Fields the normalizer may shorten instead of rejecting the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruncatableField {
    Stem,
    Option,
    Explanation,
}

/// Length and cardinality limits of a poll target, plus the repair policy.
///
/// Lengths are in characters. A profile is read-only once built and is shared
/// by reference across every item of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitProfile {
    pub stem_max_len: usize,
    pub stem_min_len: usize,
    pub option_max_len: usize,
    pub option_min_len: usize,
    pub explanation_max_len: usize,
    pub min_options: usize,
    pub max_options: usize,
    pub truncatable_fields: BTreeSet<TruncatableField>,
}

impl LimitProfile {
    /// Only the explanation may shrink; overlong stems and options reject.
    pub fn lenient() -> Self {
        Self {
            truncatable_fields: BTreeSet::from([TruncatableField::Explanation]),
            ..Self::with_limits()
        }
    }

    /// Stem, options and explanation may all shrink.
    pub fn permissive() -> Self {
        Self {
            truncatable_fields: BTreeSet::from([
                TruncatableField::Stem,
                TruncatableField::Option,
                TruncatableField::Explanation,
            ]),
            ..Self::with_limits()
        }
    }

    /// Looks up one of the built-in presets by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "lenient" => Some(Self::lenient()),
            "permissive" => Some(Self::permissive()),
            _ => None,
        }
    }

    pub fn is_truncatable(&self, field: FieldRef) -> bool {
        let field = match field {
            FieldRef::Stem => TruncatableField::Stem,
            FieldRef::Option(_) => TruncatableField::Option,
            FieldRef::Explanation => TruncatableField::Explanation,
            FieldRef::OptionCount => return false,
        };
        self.truncatable_fields.contains(&field)
    }

    fn with_limits() -> Self {
        Self {
            stem_max_len: DEFAULT_STEM_MAX_LEN,
            stem_min_len: 1,
            option_max_len: DEFAULT_OPTION_MAX_LEN,
            option_min_len: 1,
            explanation_max_len: DEFAULT_EXPLANATION_MAX_LEN,
            min_options: DEFAULT_MIN_OPTIONS,
            max_options: DEFAULT_MAX_OPTIONS,
            truncatable_fields: BTreeSet::new(),
        }
    }
}

impl Default for LimitProfile {
    fn default() -> Self {
        Self::lenient()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_lenient() {
        assert_eq!(LimitProfile::default(), LimitProfile::lenient());
        assert_eq!(LimitProfile::default().stem_max_len, 200);
    }

    #[test]
    fn lenient_only_truncates_explanation() {
        let p = LimitProfile::lenient();
        assert!(p.is_truncatable(FieldRef::Explanation));
        assert!(!p.is_truncatable(FieldRef::Stem));
        assert!(!p.is_truncatable(FieldRef::Option(0)));
    }

    #[test]
    fn option_count_is_never_truncatable() {
        assert!(!LimitProfile::permissive().is_truncatable(FieldRef::OptionCount));
    }

    #[test]
    fn unknown_preset() {
        assert!(LimitProfile::preset("strict").is_none());
        assert_eq!(
            LimitProfile::preset("permissive"),
            Some(LimitProfile::permissive())
        );
    }

    #[test]
    fn partial_profile_deserializes_with_defaults() {
        let p: LimitProfile = serde_json::from_str(
            r#"{"stem_max_len": 300, "truncatable_fields": ["stem", "option"]}"#,
        )
        .unwrap();
        assert_eq!(p.stem_max_len, 300);
        assert_eq!(p.option_max_len, DEFAULT_OPTION_MAX_LEN);
        assert!(p.is_truncatable(FieldRef::Option(3)));
        assert!(!p.is_truncatable(FieldRef::Explanation));
    }
}
