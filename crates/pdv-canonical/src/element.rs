/// A single attribute, kept in the order it was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name.
    pub name: String,
    /// Unescaped attribute value.
    pub value: String,
}

/// Content of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Unescaped character data.
    Text(String),
}

/// A named element with ordered attributes and ordered children.
///
/// Order is significant: the canonicalizer emits children exactly as they
/// were appended, and attributes in insertion order unless configured
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Looks up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Sets an attribute. An existing attribute with the same name keeps its
    /// position and has its value replaced.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Builder form of [`Element::set_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child element.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Builder form of [`Element::push_child`].
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    /// Appends character data. Adjacent text nodes are merged so that a
    /// parsed tree and a constructed tree compare equal.
    pub fn push_text(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    /// Builder form of [`Element::push_text`].
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        self.push_text(text);
        self
    }

    /// All child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Child elements with the given name.
    pub fn elements_named<'a, 'b>(
        &'a self,
        name: &'b str,
    ) -> impl Iterator<Item = &'a Element> + 'b
    where
        'a: 'b,
    {
        self.elements().filter(move |element| element.name == name)
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|element| element.name == name)
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attribute_replaces_in_place() {
        let element = Element::new("document")
            .with_attribute("type", "text/plain")
            .with_attribute("name", "a.txt")
            .with_attribute("type", "application/pdf");

        let names: Vec<_> = element.attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["type", "name"]);
        assert_eq!(element.attribute("type"), Some("application/pdf"));
    }

    #[test]
    fn adjacent_text_is_merged() {
        let element = Element::new("a").with_text("foo").with_text("").with_text("bar");
        assert_eq!(element.children().len(), 1);
        assert_eq!(element.text(), "foobar");
    }

    #[test]
    fn child_lookup_skips_text() {
        let element = Element::new("ipdv")
            .with_text("x")
            .with_child(Element::new("documento"))
            .with_child(Element::new("documento"))
            .with_child(Element::new("hash-ipdv").with_text("abc"));

        assert_eq!(element.elements_named("documento").count(), 2);
        assert_eq!(element.child("hash-ipdv").map(Element::text), Some("abc".into()));
        assert!(element.child("missing").is_none());
    }

    #[test]
    fn child_outlives_the_lookup_name() {
        let element = Element::new("pdv").with_child(Element::new("ipdv").with_text("x"));
        let found = {
            let name = String::from("ipdv");
            element.child(&name)
        };
        assert_eq!(found.map(Element::text), Some("x".into()));
    }
}
