//! XGML markup decoding.
//!
//! XGML files are XML with two element kinds:
//!
//! ```xml
//! <section name="node">
//!   <attribute key="id" type="int">5</attribute>
//!   <attribute key="label" type="String">Idle</attribute>
//! </section>
//! ```
//!
//! Tokenizing is left to `quick-xml`; this module only maps those elements
//! onto [`Section`] and [`Attribute`]. Other elements are skipped along with
//! their content.

use std::borrow::Cow;
use std::fmt;

use log::{debug, trace};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::DecodeError;
use crate::limits::{MAX_INPUT_SIZE, MAX_SECTION_DEPTH};
use crate::tree::{Attribute, AttributeType, Section};

const ELEMENT_SECTION: &[u8] = b"section";
const ELEMENT_ATTRIBUTE: &[u8] = b"attribute";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Decodes XGML bytes into a section tree.
///
/// A leading `<?xml ... ?>` declaration is skipped before decoding, since
/// yEd declares encodings such as `Cp1252` that are not honoured anyway.
/// Input that is not valid UTF-8 is read as Latin-1.
pub fn decode_tree(input: &[u8]) -> Result<Section, DecodeError> {
    if input.len() > MAX_INPUT_SIZE {
        return Err(DecodeError::InputTooLarge {
            len: input.len(),
            max: MAX_INPUT_SIZE,
        });
    }
    let body = strip_declaration(input);
    let text = decode_text(body);
    Decoder::new(&text).run()
}

/// Returns `input` without a leading BOM and `<?xml ... ?>` declaration.
///
/// Input without a declaration is returned unchanged.
pub fn strip_declaration(input: &[u8]) -> &[u8] {
    let start = input.strip_prefix(UTF8_BOM).unwrap_or(input);
    let trimmed = start.trim_ascii_start();
    if !trimmed.starts_with(b"<?xml") {
        return input;
    }
    match trimmed.windows(2).position(|w| w == b"?>") {
        Some(end) => &trimmed[end + 2..],
        None => input,
    }
}

fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            debug!(len = bytes.len(); "Input is not UTF-8, reading it as Latin-1");
            Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())
        }
    }
}

// =============================================================================
// DECODER
// =============================================================================

/// An `<attribute>` element whose text is still being read.
#[derive(Debug)]
struct OpenAttribute {
    key: String,
    kind: AttributeType,
    raw: String,
}

impl OpenAttribute {
    fn finish(self) -> Attribute {
        Attribute::new(self.key, self.kind, self.raw)
    }
}

struct Decoder<'a> {
    reader: Reader<&'a [u8]>,
    stack: Vec<Section>,
    open: Option<OpenAttribute>,
    root: Option<Section>,
}

impl<'a> Decoder<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            reader: Reader::from_str(text),
            stack: Vec::new(),
            open: None,
            root: None,
        }
    }

    fn run(mut self) -> Result<Section, DecodeError> {
        loop {
            let event = self.reader.read_event().map_err(|e| self.xml_error(e))?;
            match event {
                Event::Start(e) => match e.name().as_ref() {
                    ELEMENT_SECTION => self.open_section(&e)?,
                    ELEMENT_ATTRIBUTE => self.open_attribute(&e)?,
                    other => {
                        self.reject_inside_attribute(other)?;
                        debug!(element:% = String::from_utf8_lossy(other); "Skipping unknown element");
                        self.reader
                            .read_to_end(e.name())
                            .map_err(|err| self.xml_error(err))?;
                    }
                },
                Event::Empty(e) => match e.name().as_ref() {
                    ELEMENT_SECTION => {
                        self.reject_inside_attribute(ELEMENT_SECTION)?;
                        let section = Section::new(self.xml_attr(&e, "section", "name")?);
                        self.close_section(section)?;
                    }
                    ELEMENT_ATTRIBUTE => {
                        self.open_attribute(&e)?;
                        self.close_attribute()?;
                    }
                    other => self.reject_inside_attribute(other)?,
                },
                Event::Text(t) => {
                    if self.open.is_some() {
                        let text = t.unescape().map_err(|e| self.xml_error(e))?;
                        self.push_text(&text);
                    }
                }
                Event::CData(c) => {
                    if self.open.is_some() {
                        let text = std::str::from_utf8(&c)
                            .map_err(|_| DecodeError::InvalidUtf8 { field: "CDATA" })?;
                        self.push_text(text);
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    ELEMENT_ATTRIBUTE => self.close_attribute()?,
                    ELEMENT_SECTION if self.open.is_none() => {
                        let section = self.stack.pop().ok_or(DecodeError::UnbalancedSection {
                            element: "section".to_string(),
                        })?;
                        self.close_section(section)?;
                    }
                    other => {
                        return Err(DecodeError::UnbalancedSection {
                            element: String::from_utf8_lossy(other).into_owned(),
                        });
                    }
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !self.stack.is_empty() || self.open.is_some() {
            return Err(DecodeError::UnexpectedEof);
        }
        self.root.ok_or(DecodeError::NoRootSection)
    }

    fn open_section(&mut self, e: &BytesStart<'_>) -> Result<(), DecodeError> {
        self.reject_inside_attribute(ELEMENT_SECTION)?;
        let name = self.xml_attr(e, "section", "name")?;
        trace!(name = name.as_str(), depth = self.stack.len(); "Opening section");
        self.stack.push(Section::new(name));
        if self.stack.len() > MAX_SECTION_DEPTH {
            return Err(DecodeError::DepthExceeded {
                max: MAX_SECTION_DEPTH,
            });
        }
        Ok(())
    }

    /// Attaches a finished section to its parent, or makes it the root.
    fn close_section(&mut self, section: Section) -> Result<(), DecodeError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.push_child(section);
        } else if self.root.is_none() {
            self.root = Some(section);
        } else {
            return Err(DecodeError::UnexpectedElement {
                element: "section".to_string(),
                context: "after the root section",
            });
        }
        Ok(())
    }

    fn open_attribute(&mut self, e: &BytesStart<'_>) -> Result<(), DecodeError> {
        self.reject_inside_attribute(ELEMENT_ATTRIBUTE)?;
        if self.stack.is_empty() {
            return Err(DecodeError::UnexpectedElement {
                element: "attribute".to_string(),
                context: "outside a section",
            });
        }
        let key = self.xml_attr(e, "attribute", "key")?;
        let declared = self.xml_attr(e, "attribute", "type")?;
        let kind = AttributeType::from_wire(&declared)
            .ok_or_else(|| DecodeError::UnknownAttributeType {
                key: key.clone(),
                declared,
            })?;
        self.open = Some(OpenAttribute {
            key,
            kind,
            raw: String::new(),
        });
        Ok(())
    }

    fn close_attribute(&mut self) -> Result<(), DecodeError> {
        let unbalanced = || DecodeError::UnbalancedSection {
            element: "attribute".to_string(),
        };
        let attribute = self.open.take().ok_or_else(unbalanced)?;
        let section = self.stack.last_mut().ok_or_else(unbalanced)?;
        section.push_attribute(attribute.finish());
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        if let Some(open) = self.open.as_mut() {
            open.raw.push_str(text);
        }
    }

    fn reject_inside_attribute(&self, element: &[u8]) -> Result<(), DecodeError> {
        if self.open.is_some() {
            return Err(DecodeError::UnexpectedElement {
                element: String::from_utf8_lossy(element).into_owned(),
                context: "inside an attribute",
            });
        }
        Ok(())
    }

    /// Reads a required XML attribute of the current element.
    fn xml_attr(
        &self,
        e: &BytesStart<'_>,
        element: &'static str,
        name: &'static str,
    ) -> Result<String, DecodeError> {
        let attr = e
            .try_get_attribute(name)
            .map_err(|err| self.xml_error(err))?
            .ok_or(DecodeError::MissingXmlAttribute {
                element,
                attribute: name,
            })?;
        let value = attr.unescape_value().map_err(|err| self.xml_error(err))?;
        Ok(value.into_owned())
    }

    fn xml_error(&self, err: impl fmt::Display) -> DecodeError {
        DecodeError::Xml {
            position: self.reader.buffer_position() as u64,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r#"<?xml version="1.0" encoding="Cp1252"?>
<section name="xgml">
  <attribute key="Creator" type="String">yFiles</attribute>
  <attribute key="Version" type="String">2.8</attribute>
  <section name="graph">
    <attribute key="hierarchic" type="int">1</attribute>
    <section name="node">
      <attribute key="id" type="int">0</attribute>
      <attribute key="label" type="String">Idle
kind: initial</attribute>
      <attribute key="isGroup" type="boolean">true</attribute>
    </section>
    <section name="empty"/>
  </section>
</section>
"#;

    #[test]
    fn test_decode_tree_structure() {
        let root = decode_tree(SIMPLE.as_bytes()).unwrap();
        assert_eq!(root.name(), "xgml");
        assert_eq!(root.attribute("Creator").unwrap().as_str(), Ok("yFiles"));

        let graph = &root.children()[0];
        assert_eq!(graph.name(), "graph");
        assert_eq!(graph.attribute("hierarchic").unwrap().as_int(), Ok(1));
        assert_eq!(graph.children().len(), 2);

        let node = &graph.children()[0];
        assert_eq!(node.attribute("label").unwrap().as_str(), Ok("Idle\nkind: initial"));
        assert_eq!(node.attribute("isGroup").unwrap().as_bool(), Ok(true));
        assert_eq!(graph.children()[1].name(), "empty");
    }

    #[test]
    fn test_strip_declaration() {
        assert_eq!(strip_declaration(b"<?xml version=\"1.0\"?><a/>"), b"<a/>");
        assert_eq!(strip_declaration(b"\xEF\xBB\xBF <?xml?>\n<a/>"), b"\n<a/>");
        assert_eq!(strip_declaration(b"<a>?></a>"), b"<a>?></a>");
        assert_eq!(strip_declaration(b"<?xml unterminated"), b"<?xml unterminated");
    }

    #[test]
    fn test_entities_and_cdata() {
        let xml = r#"<section name="n">
            <attribute key="a" type="String">x &amp; y &lt;z&gt;</attribute>
            <attribute key="b" type="String"><![CDATA[<raw>]]></attribute>
            <attribute key="c" type="String"/>
        </section>"#;
        let root = decode_tree(xml.as_bytes()).unwrap();
        assert_eq!(root.attribute("a").unwrap().as_str(), Ok("x & y <z>"));
        assert_eq!(root.attribute("b").unwrap().as_str(), Ok("<raw>"));
        assert_eq!(root.attribute("c").unwrap().as_str(), Ok(""));
    }

    #[test]
    fn test_latin1_fallback() {
        let mut xml = b"<section name=\"n\"><attribute key=\"l\" type=\"String\">caf".to_vec();
        xml.push(0xE9);
        xml.extend_from_slice(b"</attribute></section>");
        let root = decode_tree(&xml).unwrap();
        assert_eq!(root.attribute("l").unwrap().as_str(), Ok("caf\u{e9}"));
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let xml = r#"<section name="n"><comment><section name="hidden"/></comment></section>"#;
        let root = decode_tree(xml.as_bytes()).unwrap();
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_unknown_attribute_type() {
        let xml = r#"<section name="n"><attribute key="k" type="long">1</attribute></section>"#;
        assert_eq!(
            decode_tree(xml.as_bytes()),
            Err(DecodeError::UnknownAttributeType {
                key: "k".to_string(),
                declared: "long".to_string(),
            })
        );
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            decode_tree(br#"<section><attribute key="k" type="int">1</attribute></section>"#),
            Err(DecodeError::MissingXmlAttribute { element: "section", attribute: "name" })
        );
        assert!(matches!(
            decode_tree(br#"<attribute key="k" type="int">1</attribute>"#),
            Err(DecodeError::UnexpectedElement { .. })
        ));
        assert_eq!(decode_tree(b"<other/>"), Err(DecodeError::NoRootSection));
        assert_eq!(decode_tree(b""), Err(DecodeError::NoRootSection));
        assert!(matches!(
            decode_tree(br#"<section name="a">"#),
            Err(DecodeError::UnexpectedEof) | Err(DecodeError::Xml { .. })
        ));
        assert!(matches!(
            decode_tree(br#"<section name="a"></other>"#),
            Err(DecodeError::Xml { .. })
        ));
        assert!(matches!(
            decode_tree(br#"<section name="a"/><section name="b"/>"#),
            Err(DecodeError::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut xml = String::new();
        for _ in 0..=MAX_SECTION_DEPTH {
            xml.push_str(r#"<section name="s">"#);
        }
        assert_eq!(
            decode_tree(xml.as_bytes()),
            Err(DecodeError::DepthExceeded { max: MAX_SECTION_DEPTH })
        );
    }
}
