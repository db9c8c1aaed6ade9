use crate::element::{Attribute, Element, Node};
use crate::validation::{first_invalid_char, is_xml_name};
use std::fmt;

/// Error returned when canonicalization fails.
///
/// Trees built by this workspace never trigger these; they indicate a name or
/// value that XML cannot represent.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// An element or attribute name is not a valid XML name.
    #[error("invalid {kind} name {name:?} at {path}")]
    InvalidName {
        /// `"element"` or `"attribute"`.
        kind: &'static str,
        /// Offending name.
        name: String,
        /// Location in the tree.
        path: String,
    },
    /// Text or an attribute value contains a character outside XML's `Char`.
    #[error("character U+{codepoint:04X} cannot be encoded at {path}")]
    InvalidCharacter {
        /// Offending code point.
        codepoint: u32,
        /// Location in the tree.
        path: String,
    },
}

/// Attribute ordering rule applied during canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeOrder {
    /// Attributes are written in the order they were set.
    #[default]
    Document,
    /// Namespace declarations first, then attributes sorted by name, as
    /// W3C Canonical XML 1.0 prescribes.
    Lexicographic,
}

/// Serializes an element tree into canonical bytes.
///
/// Implementations must be deterministic: the same tree always yields the
/// same bytes.
pub trait Canonicalize: Send + Sync {
    /// Produces canonical UTF-8 bytes for `element` and its descendants.
    fn canonicalize(&self, element: &Element) -> Result<Vec<u8>, CanonicalizationError>;
}

/// Helper for building element paths in error messages.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root(name: &str) -> Self {
        Self {
            segments: vec![name.to_string()],
        }
    }

    fn push_child(&self, name: &str, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("{}[{}]", name, index));
        Self { segments }
    }

    fn push_attribute(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("@{}", name));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Canonical XML serializer.
///
/// Output rules (Canonical XML 1.0 without comments):
/// - UTF-8, no XML declaration, no whitespace that is not in the tree
/// - empty elements are written as a start/end tag pair
/// - attribute values are double-quoted; `&`, `<`, `"`, TAB, LF and CR are
///   escaped as `&amp;`, `&lt;`, `&quot;`, `&#x9;`, `&#xA;`, `&#xD;`
/// - text escapes `&`, `<`, `>` and CR as `&amp;`, `&lt;`, `&gt;`, `&#xD;`
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer {
    order: AttributeOrder,
}

impl Canonicalizer {
    /// Creates a canonicalizer with the given attribute ordering.
    pub fn new(order: AttributeOrder) -> Self {
        Self { order }
    }

    /// Attribute ordering in use.
    pub fn attribute_order(&self) -> AttributeOrder {
        self.order
    }

    fn write_element(
        &self,
        element: &Element,
        path: &Path,
        out: &mut String,
    ) -> Result<(), CanonicalizationError> {
        if !is_xml_name(element.name()) {
            return Err(CanonicalizationError::InvalidName {
                kind: "element",
                name: element.name().to_string(),
                path: path.to_string(),
            });
        }

        out.push('<');
        out.push_str(element.name());
        for attr in self.ordered_attributes(element) {
            let attr_path = path.push_attribute(&attr.name);
            if !is_xml_name(&attr.name) {
                return Err(CanonicalizationError::InvalidName {
                    kind: "attribute",
                    name: attr.name.clone(),
                    path: attr_path.to_string(),
                });
            }
            check_chars(&attr.value, &attr_path)?;
            out.push(' ');
            out.push_str(&attr.name);
            out.push_str("=\"");
            escape_attribute(&attr.value, out);
            out.push('"');
        }
        out.push('>');

        for (index, child) in element.children().iter().enumerate() {
            match child {
                Node::Element(nested) => {
                    self.write_element(nested, &path.push_child(nested.name(), index), out)?
                }
                Node::Text(text) => {
                    check_chars(text, path)?;
                    escape_text(text, out);
                }
            }
        }

        out.push_str("</");
        out.push_str(element.name());
        out.push('>');
        Ok(())
    }

    fn ordered_attributes<'a>(&self, element: &'a Element) -> Vec<&'a Attribute> {
        let mut attributes: Vec<&Attribute> = element.attributes().iter().collect();
        if self.order == AttributeOrder::Lexicographic {
            // Stable sort: namespace declarations keep their relative order.
            attributes.sort_by(|a, b| {
                (!is_namespace_decl(&a.name), a.name.as_str())
                    .cmp(&(!is_namespace_decl(&b.name), b.name.as_str()))
            });
        }
        attributes
    }
}

impl Canonicalize for Canonicalizer {
    fn canonicalize(&self, element: &Element) -> Result<Vec<u8>, CanonicalizationError> {
        let mut out = String::new();
        self.write_element(element, &Path::root(element.name()), &mut out)?;
        Ok(out.into_bytes())
    }
}

fn is_namespace_decl(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

fn check_chars(value: &str, path: &Path) -> Result<(), CanonicalizationError> {
    match first_invalid_char(value) {
        Some(c) => Err(CanonicalizationError::InvalidCharacter {
            codepoint: c as u32,
            path: path.to_string(),
        }),
        None => Ok(()),
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            other => out.push(other),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            other => out.push(other),
        }
    }
}
