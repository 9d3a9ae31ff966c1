//! Decoding of XGML markup into the section tree.

pub mod xml;

pub use xml::{decode_tree, strip_declaration};
