pub mod profile;
pub mod question;
pub mod violation;

pub use profile::{LimitProfile, TruncatableField};
pub use question::{CanonicalQuestion, DEFAULT_EXPLANATION, SourceFormat, char_len};
pub use violation::{FieldRef, ValidationViolation, ViolationKind};
