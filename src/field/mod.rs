//! Measurement fields and their validity masks.

pub mod kind;
pub mod slice;

pub use kind::FieldKind;
pub use slice::{FieldError, GridSlice, RawSlice};
