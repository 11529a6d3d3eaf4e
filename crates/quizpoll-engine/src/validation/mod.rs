//! # Constraint Validation
//!
//! [`validate`] reports how a [`CanonicalQuestion`] breaks a [`LimitProfile`];
//! [`normalize`] then decides whether those violations can be repaired by
//! truncation or must reject the question.
//!
//! [`CanonicalQuestion`]: crate::models::CanonicalQuestion
//! [`LimitProfile`]: crate::models::LimitProfile

pub mod normalize;
pub mod truncate;
pub mod validate;

pub use normalize::{normalize, was_truncated};
pub use truncate::{ELLIPSIS, truncate};
pub use validate::validate;
