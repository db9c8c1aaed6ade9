use crate::element::Element;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Error returned when XML bytes cannot be read into an element tree.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// Low-level XML syntax error.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Malformed or duplicated attribute.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),
    /// Name or CDATA section is not UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// A closing tag without a matching opening tag.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedEnd(String),
    /// Input ended while an element was still open.
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    /// A second top-level element.
    #[error("document has more than one root element")]
    MultipleRoots,
    /// Non-whitespace text outside the root element.
    #[error("text outside the root element")]
    StrayText,
    /// No root element at all.
    #[error("document contains no root element")]
    Empty,
}

/// Parses XML bytes into an [`Element`] tree.
///
/// The XML declaration, comments, processing instructions and doctype are
/// dropped; CDATA sections become text. Whitespace inside elements is kept
/// verbatim, so a canonical document parses back to the exact tree that
/// produced it.
pub fn parse(bytes: &[u8]) -> Result<Element, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(false);
    reader.check_end_names(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    ParseError::UnexpectedEnd(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                push_text(&mut stack, std::str::from_utf8(&raw)?)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed(open.name().to_string()));
    }
    root.ok_or(ParseError::Empty)
}

fn open_element(start: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
        let value = attribute.unescape_value()?.into_owned();
        element.set_attribute(key, value);
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_child(element);
            Ok(())
        }
        None if root.is_some() => Err(ParseError::MultipleRoots),
        None => {
            *root = Some(element);
            Ok(())
        }
    }
}

fn push_text(stack: &mut [Element], text: &str) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_text(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError::StrayText),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Canonicalize, Canonicalizer};

    #[test]
    fn parses_attributes_text_and_children() {
        let root = parse(br#"<pdv><obj-stored><document type="text/plain" name="a.txt">aGVsbG8=</document></obj-stored><ipdv/></pdv>"#).unwrap();
        assert_eq!(root.name(), "pdv");
        let document = root.child("obj-stored").and_then(|o| o.child("document")).unwrap();
        assert_eq!(document.attribute("type"), Some("text/plain"));
        assert_eq!(document.attribute("name"), Some("a.txt"));
        assert_eq!(document.text(), "aGVsbG8=");
        assert!(root.child("ipdv").unwrap().children().is_empty());
    }

    #[test]
    fn unescapes_character_references() {
        let root = parse(b"<a k=\"x&#xA;y&quot;\">1 &lt; 2 &amp;&#xD;</a>").unwrap();
        assert_eq!(root.attribute("k"), Some("x\ny\""));
        assert_eq!(root.text(), "1 < 2 &\r");
    }

    #[test]
    fn ignores_prolog_and_comments() {
        let root = parse(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- c --><a><!-- inner -->x<![CDATA[<y>]]></a>\n").unwrap();
        assert_eq!(root.text(), "x<y>");
    }

    #[test]
    fn canonical_bytes_round_trip() {
        let bytes = "<pdv><ipdv><documento IDDocumento=\"ABCDEFGHIJ0123456789\"><oggettodocumento>a &amp; b&#xD;</oggettodocumento><Embedded></Embedded></documento></ipdv></pdv>";
        let tree = parse(bytes.as_bytes()).unwrap();
        let again = Canonicalizer::default().canonicalize(&tree).unwrap();
        assert_eq!(again, bytes.as_bytes());
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(matches!(parse(b"<a><b></a></b>"), Err(ParseError::Xml(_))));
    }

    #[test]
    fn rejects_unclosed_elements() {
        assert!(matches!(
            parse(b"<a><b></b>"),
            Err(ParseError::Unclosed(_)) | Err(ParseError::Xml(_))
        ));
    }

    #[test]
    fn rejects_multiple_roots() {
        assert!(matches!(parse(b"<a></a><b></b>"), Err(ParseError::MultipleRoots)));
    }

    #[test]
    fn rejects_stray_text() {
        assert!(matches!(parse(b"<a></a>tail"), Err(ParseError::StrayText)));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(parse(b"  \n"), Err(ParseError::Empty)));
    }
}
