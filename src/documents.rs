//! XSD source documents
//!
//! A small ordered DOM built with quick-xml. Elements keep their prefix,
//! their attributes in document order and every child node (text and
//! comments included) so the traversal can decide what to skip.

use crate::error::{Error, ParseError, Result};
use crate::namespaces::NamespaceContext;
use crate::xpath;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// A node of the source tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element
    Element(Element),
    /// Character data (CDATA sections included)
    Text(String),
    /// A comment
    Comment(String),
}

impl XmlNode {
    /// The element, if this node is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }
}

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Namespace prefix as written in the source (`xs` in `xs:element`)
    pub prefix: Option<String>,
    /// Local name
    pub local_name: String,
    /// Attributes by their raw name, in document order
    pub attributes: IndexMap<String, String>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element from a raw tag name
    pub fn new(name: &str) -> Self {
        let (prefix, local_name) = match name.split_once(':') {
            Some((p, l)) => (Some(p.to_string()), l.to_string()),
            None => (None, name.to_string()),
        };
        Self {
            prefix,
            local_name,
            attributes: IndexMap::new(),
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Get the local name of the element (the dispatch key)
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Tag name as written, prefix included
    pub fn tag_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Find child elements by local name
    pub fn find_children<'a, 'b>(&'a self, local_name: &'b str) -> impl Iterator<Item = &'a Element> + 'b
    where
        'a: 'b,
    {
        self.elements().filter(move |e| e.local_name() == local_name)
    }

    /// First child element with the given local name
    pub fn first_child(&self, local_name: &str) -> Option<&Element> {
        self.find_children(local_name).next()
    }

    /// Concatenated text content of this element's direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|n| match n {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
            .trim()
            .to_string()
    }

    /// Add a child node
    pub fn add_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }
}

/// A parsed XSD file
#[derive(Debug, Clone)]
pub struct XsdDocument {
    /// Location the document was read from
    pub uri: String,
    /// File name of the document, extension included
    pub base_filename: String,
    /// Root element (`xs:schema`)
    pub root: Element,
}

impl XsdDocument {
    /// Parse a document from a string
    pub fn from_string(uri: impl Into<String>, xml: &str) -> Result<Self> {
        Self::parse(uri, xml.as_bytes())
    }

    /// Parse a document from bytes
    pub fn parse(uri: impl Into<String>, xml: &[u8]) -> Result<Self> {
        let uri = uri.into();
        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut root = None;
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    element_stack.push(Self::parse_element(&e)?);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = element_stack.pop() {
                        match element_stack.last_mut() {
                            Some(parent) => parent.add_child(XmlNode::Element(current)),
                            None => root = Some(current),
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e)?;
                    match element_stack.last_mut() {
                        Some(parent) => parent.add_child(XmlNode::Element(element)),
                        None => root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?
                            .to_string();
                        current.add_child(XmlNode::Text(text));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                        current.add_child(XmlNode::Text(text));
                    }
                }
                Ok(Event::Comment(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = String::from_utf8_lossy(&e).to_string();
                        current.add_child(XmlNode::Comment(text));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::new(e.to_string())
                        .with_location(format!("{}:{}", uri, reader.buffer_position()))
                        .into())
                }
                _ => {} // Declarations, processing instructions, doctype
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(ParseError::new("unexpected end of document")
                .with_location(uri)
                .into());
        }
        let root = root.ok_or_else(|| {
            Error::from(ParseError::new("document has no root element").with_location(uri.clone()))
        })?;

        let base_filename = Path::new(&uri)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&uri)
            .to_string();

        Ok(Self {
            uri,
            base_filename,
            root,
        })
    }

    /// Parse element from BytesStart event
    fn parse_element(start: &BytesStart) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut element = Element::new(&name);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            if attr_name == "xmlns" {
                element.namespaces.set_default_namespace(&attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                element.namespaces.add_prefix(prefix, &attr_value);
            }
            element.attributes.insert(attr_name, attr_value);
        }

        Ok(element)
    }

    /// The `targetNamespace` declared on the schema element
    pub fn target_namespace(&self) -> Option<&str> {
        self.root
            .attribute("targetNamespace")
            .filter(|ns| !ns.trim().is_empty())
    }

    /// Prefix bindings declared at document level
    pub fn namespaces(&self) -> &NamespaceContext {
        &self.root.namespaces
    }

    /// `schemaLocation` of every `include` and `import`, in document order
    pub fn include_uris(&self) -> Vec<String> {
        self.root
            .elements()
            .filter(|e| matches!(e.local_name(), "include" | "import"))
            .filter_map(|e| e.attribute("schemaLocation"))
            .map(str::to_string)
            .collect()
    }

    /// True when the document includes or imports other files
    pub fn has_includes(&self) -> bool {
        !self.include_uris().is_empty()
    }

    /// Every element matching a path like `//xs:schema/xs:element[2]`
    pub fn select(&self, path: &str) -> Vec<&Element> {
        xpath::select(&self.root, path)
    }

    /// The first element matching a path
    pub fn select1(&self, path: &str) -> Option<&Element> {
        self.select(path).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:tns="http://www.totvs.com/example"
           targetNamespace="http://www.totvs.com/example">
  <xs:include schemaLocation="../commons_1_000.xsd"/>
  <!-- business content -->
  <xs:element name="Code" type="xs:string">
    <xs:annotation><xs:documentation>Código &amp; nome</xs:documentation></xs:annotation>
  </xs:element>
</xs:schema>"#;

    #[test]
    fn test_parse_keeps_prefix_and_order() {
        let doc = XsdDocument::from_string("schemas/Example_1_000.xsd", SCHEMA).unwrap();
        assert_eq!(doc.base_filename, "Example_1_000.xsd");
        assert_eq!(doc.root.tag_name(), "xs:schema");
        assert_eq!(doc.root.local_name(), "schema");

        let names: Vec<_> = doc.root.elements().map(|e| e.local_name()).collect();
        assert_eq!(names, vec!["include", "element"]);
        assert!(doc
            .root
            .children
            .iter()
            .any(|n| matches!(n, XmlNode::Comment(c) if c.contains("business content"))));
    }

    #[test]
    fn test_document_level_information() {
        let doc = XsdDocument::from_string("Example_1_000.xsd", SCHEMA).unwrap();
        assert_eq!(doc.target_namespace(), Some("http://www.totvs.com/example"));
        assert_eq!(
            doc.namespaces().get_namespace("xs"),
            Some("http://www.w3.org/2001/XMLSchema")
        );
        assert_eq!(doc.include_uris(), vec!["../commons_1_000.xsd".to_string()]);
        assert!(doc.has_includes());
    }

    #[test]
    fn test_text_is_unescaped() {
        let doc = XsdDocument::from_string("Example_1_000.xsd", SCHEMA).unwrap();
        let doc_node = doc
            .select1("//xs:schema/xs:element/xs:annotation/xs:documentation")
            .unwrap();
        assert_eq!(doc_node.text(), "Código & nome");
    }

    #[test]
    fn test_attributes_in_document_order() {
        let doc = XsdDocument::from_string(
            "a.xsd",
            r#"<schema><element name="A" type="string" minOccurs="0"/></schema>"#,
        )
        .unwrap();
        let element = doc.root.first_child("element").unwrap();
        let keys: Vec<_> = element.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "type", "minOccurs"]);
        assert_eq!(element.attribute("minOccurs"), Some("0"));
        assert_eq!(element.attribute("maxOccurs"), None);
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let err = XsdDocument::from_string("broken.xsd", "<schema><element></schema>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_unclosed_document_is_a_parse_error() {
        let err = XsdDocument::from_string("broken.xsd", "<schema><element>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
