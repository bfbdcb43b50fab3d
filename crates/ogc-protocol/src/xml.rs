//! Minimal XML element tree built on quick-xml's event reader.
//!
//! OGC documents are small enough to hold in memory, and walking a tree is
//! much easier to read than a state machine over raw events. Lookups by name
//! always return every match so callers never special-case a single child
//! versus a repeated one.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use ogc_common::{GeoServerError, GeoServerResult};

/// One XML element: qualified name, attributes, text content and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlNode {
    /// Qualified element name as written in the document (`gml:Point`).
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Text content directly inside this element, concatenated across
    /// comments and CDATA sections and trimmed once the element closes.
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Parse a document and return its root element.
    ///
    /// `document` names the kind of document in error messages.
    pub fn parse(xml: &str, document: &'static str) -> GeoServerResult<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            let event = reader.read_event();
            let position = reader.buffer_position();
            let fail = |message: String| xml_error(document, position, message);

            match event {
                Ok(Event::Start(e)) => stack.push(Self::from_start(&e).map_err(fail)?),
                Ok(Event::Empty(e)) => {
                    let node = Self::from_start(&e).map_err(fail)?;
                    attach(&mut stack, &mut root, node).map_err(fail)?;
                }
                Ok(Event::End(_)) => {
                    // quick-xml has already matched the end tag against the open one.
                    let mut node = stack
                        .pop()
                        .ok_or_else(|| fail("unbalanced end tag".to_string()))?;
                    node.text = node.text.trim().to_string();
                    attach(&mut stack, &mut root, node).map_err(fail)?;
                }
                Ok(Event::Text(t)) => {
                    let text = t.unescape().map_err(|e| fail(e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(t)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&t.into_inner()));
                    }
                }
                Ok(Event::Eof) => break,
                // Declarations, comments, processing instructions, doctype
                Ok(_) => {}
                Err(e) => return Err(fail(e.to_string())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(xml_error(
                document,
                reader.buffer_position(),
                format!("document ended inside <{}>", open.name),
            ));
        }

        root.ok_or_else(|| GeoServerError::XmlParse {
            document,
            message: "document has no root element".to_string(),
        })
    }

    fn from_start(e: &BytesStart<'_>) -> Result<Self, String> {
        let mut node = XmlNode {
            name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
            ..Default::default()
        };
        for attr in e.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            node.attributes.push((key, value.into_owned()));
        }
        Ok(node)
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every child element with the given qualified name, in document order.
    ///
    /// This is the single place where XML cardinality is normalized: one
    /// matching child yields a one-element vector, none yields an empty one.
    pub fn elements(&self, name: &str) -> Vec<&XmlNode> {
        self.children.iter().filter(|c| c.name == name).collect()
    }

    /// First child element with the given qualified name.
    pub fn first(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first child with the given name, if present and non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.first(name)
            .map(|c| c.text.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Every descendant (at any depth) whose local name matches.
    pub fn descendants(&self, local: &str) -> Vec<&XmlNode> {
        let mut found = Vec::new();
        let mut pending: Vec<&XmlNode> = self.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            if node.local_name() == local {
                found.push(node);
            }
            pending.extend(node.children.iter().rev());
        }
        found
    }

    /// Message of an OGC exception document (`ServiceExceptionReport` or
    /// `ows:ExceptionReport`), or `None` for any other root.
    pub fn exception_report(&self) -> Option<String> {
        match self.local_name() {
            "ServiceExceptionReport" | "ExceptionReport" => {}
            _ => return None,
        }
        let mut messages: Vec<&str> = self
            .descendants("ServiceException")
            .into_iter()
            .chain(self.descendants("ExceptionText"))
            .map(|n| n.text.as_str())
            .filter(|t| !t.is_empty())
            .collect();
        if messages.is_empty() {
            messages.push("no exception text");
        }
        Some(messages.join("; "))
    }

    /// Drop namespace prefixes from this element and all of its descendants,
    /// so qualified lookups work on documents that mix prefixed and
    /// default-namespace elements.
    pub fn into_local_names(mut self) -> Self {
        self.name = local_name(&self.name).to_string();
        self.children = self
            .children
            .into_iter()
            .map(Self::into_local_names)
            .collect();
        self
    }

    /// True when the element carries only text: no attributes, no children.
    pub fn is_text_leaf(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

/// Strip the namespace prefix from a qualified name.
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn xml_error(document: &'static str, position: usize, message: String) -> GeoServerError {
    GeoServerError::XmlParse {
        document,
        message: format!("{} (at byte {})", message, position),
    }
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(format!("second root element <{}>", node.name)),
    }
}
