use crate::models::{CanonicalQuestion, FieldRef, LimitProfile, ValidationViolation, ViolationKind};

use super::{truncate::truncate, validate::validate};

/// Repairs `q` by truncation, or rejects it with the full violation list.
///
/// Only overlong fields the profile lists as truncatable can be repaired. Any
/// other violation, including an overlong field that may not shrink, rejects
/// the whole question and nothing is truncated. A truncated record is checked
/// again, and rejected with the new violations if a cut left a field below its
/// minimum length. `q` is left untouched; an accepted question is a new record.
pub fn normalize(
    q: &CanonicalQuestion,
    violations: &[ValidationViolation],
    profile: &LimitProfile,
) -> Result<CanonicalQuestion, Vec<ValidationViolation>> {
    let repairable = |v: &ValidationViolation| {
        v.kind == ViolationKind::TooLong && profile.is_truncatable(v.field)
    };
    if !violations.iter().all(repairable) {
        return Err(violations.to_vec());
    }

    let mut normalized = q.clone();
    for v in violations {
        match v.field {
            FieldRef::Stem => normalized.stem = truncate(&normalized.stem, v.limit),
            FieldRef::Option(i) => {
                if let Some(option) = normalized.options.get_mut(i) {
                    *option = truncate(option, v.limit);
                }
            }
            FieldRef::Explanation => {
                if let Some(explanation) = normalized.explanation.as_mut() {
                    *explanation = truncate(explanation, v.limit);
                }
            }
            FieldRef::OptionCount => {}
        }
    }

    if violations.is_empty() {
        return Ok(normalized);
    }
    let remaining = validate(&normalized, profile);
    if remaining.is_empty() {
        Ok(normalized)
    } else {
        Err(remaining)
    }
}

/// Whether any field of `normalized` differs from `original`.
pub fn was_truncated(original: &CanonicalQuestion, normalized: &CanonicalQuestion) -> bool {
    original.stem != normalized.stem
        || original.options != normalized.options
        || original.explanation != normalized.explanation
}
