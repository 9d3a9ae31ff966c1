//! Format-agnostic section tree consumed by the graph builder.

pub mod attribute;
pub mod section;

pub use attribute::{Attribute, AttributeType};
pub use section::Section;
