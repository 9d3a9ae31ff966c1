//! Generic section tree.
//!
//! A section is a named container of attributes and child sections. It has
//! no graph semantics of its own; the builder gives names like `node` and
//! `edge` their meaning.
//!
//! # Example
//!
//! ```rust
//! use xgml::tree::Section;
//!
//! let node = Section::new("node")
//!     .with_int("id", 5)
//!     .with_string("label", "Idle\nkind: initial");
//!
//! assert_eq!(node.require("id").unwrap().as_int(), Ok(5));
//! assert!(node.attribute("gid").is_none());
//! ```

use crate::error::AttributeError;
use crate::tree::Attribute;

/// A named node of the decoded markup tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Section>,
}

impl Section {
    /// Creates an empty section with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attributes in document order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the child sections in document order.
    pub fn children(&self) -> &[Section] {
        &self.children
    }

    /// Returns the child sections with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Section> + 'a {
        self.children.iter().filter(move |s| s.name == name)
    }

    /// Looks up an attribute by key.
    ///
    /// Keys are expected to be unique within a section; if they are not, the
    /// first one in document order is returned.
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key() == key)
    }

    /// Returns true if an attribute with this key is present, whatever its value.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// Looks up an attribute that must be present.
    pub fn require(&self, key: &str) -> Result<&Attribute, AttributeError> {
        self.attribute(key).ok_or_else(|| AttributeError::Missing {
            section: self.name.clone(),
            key: key.to_string(),
        })
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Appends an attribute.
    pub fn push_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Appends a child section.
    pub fn push_child(&mut self, child: Section) {
        self.children.push(child);
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds an `int` attribute.
    pub fn with_int(self, key: impl Into<String>, value: i64) -> Self {
        self.with_attribute(Attribute::int(key, value))
    }

    /// Adds a `double` attribute.
    pub fn with_double(self, key: impl Into<String>, value: f64) -> Self {
        self.with_attribute(Attribute::double(key, value))
    }

    /// Adds a `String` attribute.
    pub fn with_string(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_attribute(Attribute::string(key, value))
    }

    /// Adds a `boolean` attribute.
    pub fn with_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.with_attribute(Attribute::boolean(key, value))
    }

    /// Adds a child section.
    pub fn with_child(mut self, child: Section) -> Self {
        self.children.push(child);
        self
    }

    /// Adds a child section built by a closure.
    pub fn with_section<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(Section) -> Section,
    {
        self.with_child(f(Section::new(name)))
    }
}
