//! Typed attributes carried by sections.
//!
//! XGML stores every value as text together with a declared type name.
//! The accessors here check the declared type before interpreting the text.

use std::fmt;

use crate::error::AttributeError;

/// Declared type of an attribute, as written in the `type` XML attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Int,
    Double,
    String,
    Boolean,
}

impl AttributeType {
    /// Creates an AttributeType from its wire name.
    pub fn from_wire(name: &str) -> Option<AttributeType> {
        match name {
            "int" => Some(AttributeType::Int),
            "double" => Some(AttributeType::Double),
            "String" => Some(AttributeType::String),
            "boolean" => Some(AttributeType::Boolean),
            _ => None,
        }
    }

    /// Returns the wire name of this type.
    pub fn wire_name(self) -> &'static str {
        match self {
            AttributeType::Int => "int",
            AttributeType::Double => "double",
            AttributeType::String => "String",
            AttributeType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A single `(key, declared type, raw text)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    key: String,
    kind: AttributeType,
    raw: String,
}

impl Attribute {
    /// Creates an attribute from its parts.
    pub fn new(key: impl Into<String>, kind: AttributeType, raw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            raw: raw.into(),
        }
    }

    /// Creates an `int` attribute.
    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, AttributeType::Int, value.to_string())
    }

    /// Creates a `double` attribute.
    pub fn double(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, AttributeType::Double, value.to_string())
    }

    /// Creates a `String` attribute.
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, AttributeType::String, value)
    }

    /// Creates a `boolean` attribute.
    pub fn boolean(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, AttributeType::Boolean, value.to_string())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the declared type.
    pub fn kind(&self) -> AttributeType {
        self.kind
    }

    /// Returns the undecoded text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Reads an `int` attribute.
    pub fn as_int(&self) -> Result<i64, AttributeError> {
        self.expect_kind(AttributeType::Int)?;
        self.raw.trim().parse().map_err(|_| self.malformed())
    }

    /// Reads a `double` attribute.
    pub fn as_float(&self) -> Result<f64, AttributeError> {
        self.expect_kind(AttributeType::Double)?;
        self.raw.trim().parse().map_err(|_| self.malformed())
    }

    /// Reads a `String` attribute. The text is returned untouched.
    pub fn as_str(&self) -> Result<&str, AttributeError> {
        self.expect_kind(AttributeType::String)?;
        Ok(&self.raw)
    }

    /// Reads a `boolean` attribute (`true`/`false`, case-insensitive, or `1`/`0`).
    pub fn as_bool(&self) -> Result<bool, AttributeError> {
        self.expect_kind(AttributeType::Boolean)?;
        let text = self.raw.trim();
        if text.eq_ignore_ascii_case("true") || text == "1" {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") || text == "0" {
            Ok(false)
        } else {
            Err(self.malformed())
        }
    }

    fn expect_kind(&self, expected: AttributeType) -> Result<(), AttributeError> {
        if self.kind != expected {
            return Err(AttributeError::TypeMismatch {
                key: self.key.clone(),
                expected,
                actual: self.kind,
            });
        }
        Ok(())
    }

    fn malformed(&self) -> AttributeError {
        AttributeError::MalformedValue {
            key: self.key.clone(),
            raw: self.raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        for kind in [
            AttributeType::Int,
            AttributeType::Double,
            AttributeType::String,
            AttributeType::Boolean,
        ] {
            assert_eq!(AttributeType::from_wire(kind.wire_name()), Some(kind));
        }
        // Wire names are case-sensitive: yEd writes "String" but "int".
        assert_eq!(AttributeType::from_wire("string"), None);
        assert_eq!(AttributeType::from_wire("Int"), None);
    }

    #[test]
    fn test_int() {
        assert_eq!(Attribute::int("id", -7).as_int(), Ok(-7));
        assert_eq!(Attribute::new("id", AttributeType::Int, " 12\n").as_int(), Ok(12));
    }

    #[test]
    fn test_int_malformed() {
        let attr = Attribute::new("id", AttributeType::Int, "twelve");
        assert_eq!(
            attr.as_int(),
            Err(AttributeError::MalformedValue {
                key: "id".to_string(),
                raw: "twelve".to_string(),
            })
        );
    }

    #[test]
    fn test_type_mismatch() {
        let attr = Attribute::string("source", "5");
        assert_eq!(
            attr.as_int(),
            Err(AttributeError::TypeMismatch {
                key: "source".to_string(),
                expected: AttributeType::Int,
                actual: AttributeType::String,
            })
        );
        assert!(matches!(
            Attribute::int("x", 1).as_str(),
            Err(AttributeError::TypeMismatch { expected: AttributeType::String, .. })
        ));
        assert!(matches!(
            Attribute::int("x", 1).as_float(),
            Err(AttributeError::TypeMismatch { expected: AttributeType::Double, .. })
        ));
    }

    #[test]
    fn test_float() {
        assert_eq!(Attribute::double("w", 30.5).as_float(), Ok(30.5));
        assert_eq!(Attribute::new("w", AttributeType::Double, "1e3").as_float(), Ok(1000.0));
        assert!(matches!(
            Attribute::new("w", AttributeType::Double, "wide").as_float(),
            Err(AttributeError::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_string_untrimmed() {
        let attr = Attribute::string("label", "  a\nb ");
        assert_eq!(attr.as_str(), Ok("  a\nb "));
    }

    #[test]
    fn test_bool() {
        assert_eq!(Attribute::boolean("isGroup", true).as_bool(), Ok(true));
        assert_eq!(Attribute::new("isGroup", AttributeType::Boolean, "FALSE").as_bool(), Ok(false));
        assert_eq!(Attribute::new("isGroup", AttributeType::Boolean, "1").as_bool(), Ok(true));
        assert!(Attribute::new("isGroup", AttributeType::Boolean, "yes").as_bool().is_err());
    }
}
