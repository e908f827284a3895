//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the export domain.

mod color;
mod element_type;
mod errors;
mod ids;
mod timestamp;

pub use color::HexColor;
pub use element_type::ElementType;
pub use errors::ValidationError;
pub use ids::ElementId;
pub use timestamp::Timestamp;
