//! A small owned XML tree on top of `xml-rs`.
//!
//! The schema machinery needs random access to the children of a node, so
//! the event stream of `xml::EventReader` is folded into `XmlElement` values
//! before anything is decoded, and `XmlElement::write_to` replays a tree
//! through `xml::EventWriter` on the way out.
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::io;

use thiserror::Error;
use xml::attribute::{Attribute, OwnedAttribute};
use xml::name::OwnedName;
use xml::namespace::{Namespace, NS_XMLNS_PREFIX, NS_XML_PREFIX};
use xml::reader::{EventReader, XmlEvent as ReaderEvent};
use xml::writer::{EmitterConfig, XmlEvent as WriterEvent};

use crate::schema::SchemaError;

pub type XmlName = OwnedName;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed XML: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("document has no root element")]
    NoRoot,

    #[error("expected <{expected}> as the root element, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },

    #[error("attribute {0:?} not found")]
    AttributeNotFound(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

pub type EncodeResult<T> = Result<T, xml::writer::Error>;

#[derive(Clone, Debug, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct XmlElement {
    pub name: XmlName,
    pub attributes: Vec<OwnedAttribute>,
    /// Namespace declarations made on this element, prefix to URI.  The
    /// default namespace has the empty prefix.
    pub namespaces: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: XmlName) -> XmlElement {
        XmlElement {
            name: name,
            attributes: Vec::new(),
            namespaces: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// An element in the namespace `xmlns`, without a prefix.
    pub fn qualified(xmlns: &str, local_name: &str) -> XmlElement {
        XmlElement::new(OwnedName::qualified(local_name, xmlns, None::<&str>))
    }

    /// Read the root element of a document.
    pub fn parse<R: io::Read>(source: R) -> DecodeResult<XmlElement> {
        let mut stack: Vec<(XmlElement, BTreeMap<String, String>)> = Vec::new();
        for event in EventReader::new(source) {
            match event? {
                ReaderEvent::StartElement { name, attributes, namespace } => {
                    let scope = namespace.0;
                    let declared = {
                        let parent = stack.last().map(|entry| &entry.1);
                        scope.iter()
                            .filter(|&(p, u)| {
                                p != NS_XML_PREFIX && p != NS_XMLNS_PREFIX &&
                                !(p.is_empty() && u.is_empty()) &&
                                parent.map_or(true, |s| s.get(p) != Some(u))
                            })
                            .map(|(p, u)| (p.clone(), u.clone()))
                            .collect()
                    };
                    let element = XmlElement {
                        name: name,
                        attributes: attributes,
                        namespaces: declared,
                        children: Vec::new(),
                    };
                    stack.push((element, scope));
                }
                ReaderEvent::EndElement { .. } => {
                    if let Some((element, _)) = stack.pop() {
                        match stack.last_mut() {
                            Some(&mut (ref mut parent, _)) => {
                                parent.children.push(XmlNode::Element(element));
                            }
                            None => { return Ok(element); }
                        }
                    }
                }
                ReaderEvent::Characters(s) |
                ReaderEvent::CData(s) |
                ReaderEvent::Whitespace(s) => {
                    if let Some(&mut (ref mut top, _)) = stack.last_mut() {
                        top.push_text(s);
                    }
                }
                _ => { }
            }
        }
        Err(DecodeError::NoRoot)
    }

    /// Parse `markup` as the content of a `<wrapper>` element in the default
    /// namespace `xmlns`.
    pub fn parse_fragment(xmlns: &str, wrapper: &str, markup: &str)
                          -> DecodeResult<XmlElement>
    {
        let doc = format!("<{w} xmlns=\"{ns}\">{m}</{w}>",
                          w = wrapper, ns = escape_attr(xmlns), m = markup);
        XmlElement::parse(doc.as_bytes())
    }

    /// The value of an attribute that has no namespace.
    pub fn get_attr(&self, local_name: &str) -> Option<&str> {
        self.attributes.iter()
            .find(|a| a.name.namespace.is_none() && a.name.local_name == local_name)
            .map(|a| &a.value[..])
    }

    pub fn require_attr(&self, local_name: &str) -> DecodeResult<&str> {
        self.get_attr(local_name)
            .ok_or_else(|| DecodeError::AttributeNotFound(local_name.to_owned()))
    }

    pub fn set_attr<T: Into<String>>(&mut self, local_name: &str, value: T) {
        let value = value.into();
        match self.attributes.iter_mut()
            .find(|a| a.name.namespace.is_none() && a.name.local_name == local_name)
        {
            Some(attr) => { attr.value = value; }
            None => {
                self.attributes.push(OwnedAttribute::new(OwnedName::local(local_name), value));
            }
        }
    }

    pub fn declare_namespace(&mut self, prefix: Option<&str>, uri: &str) {
        self.namespaces.insert(prefix.unwrap_or("").to_owned(), uri.to_owned());
    }

    pub fn push(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn push_text<T: Into<String>>(&mut self, text: T) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        if let Some(&mut XmlNode::Text(ref mut last)) = self.children.last_mut() {
            last.push_str(&text);
            return;
        }
        self.children.push(XmlNode::Text(text));
    }

    /// Concatenation of the text directly under this element.
    pub fn text(&self) -> String {
        let mut buf = String::new();
        for child in self.children.iter() {
            if let XmlNode::Text(ref s) = *child {
                buf.push_str(s);
            }
        }
        buf
    }

    pub fn elements(&self) -> impl Iterator<Item=&XmlElement> {
        self.children.iter().filter_map(|c| match *c {
            XmlNode::Element(ref e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, xmlns: &'a str, local_name: &'a str)
                              -> impl Iterator<Item=&'a XmlElement> + 'a
    {
        self.elements().filter(move |e| e.is(xmlns, local_name))
    }

    pub fn is(&self, xmlns: &str, local_name: &str) -> bool {
        self.name.namespace.as_deref() == Some(xmlns) && self.name.local_name == local_name
    }

    /// Serialize the tree, with an XML declaration when `declaration`.
    pub fn write_to<W: io::Write>(&self, w: W, declaration: bool) -> EncodeResult<()> {
        let mut writer = EmitterConfig::new()
            .write_document_declaration(declaration)
            .perform_indent(false)
            .normalize_empty_elements(false)
            .create_writer(w);
        self.emit(&mut writer)
    }

    fn emit<W: io::Write>(&self, writer: &mut xml::EventWriter<W>) -> EncodeResult<()> {
        let mut namespace = Namespace::empty();
        for (prefix, uri) in self.namespaces.iter() {
            namespace.put(&prefix[..], &uri[..]);
        }
        if let Some(ref uri) = self.name.namespace {
            namespace.put(self.name.prefix.as_deref().unwrap_or(""), &uri[..]);
        }
        let attributes: Vec<Attribute> = self.attributes.iter().map(|a| a.borrow()).collect();
        writer.write(WriterEvent::StartElement {
            name: self.name.borrow(),
            attributes: Cow::Owned(attributes),
            namespace: Cow::Owned(namespace),
        })?;
        for child in self.children.iter() {
            match *child {
                XmlNode::Element(ref e) => { e.emit(writer)?; }
                XmlNode::Text(ref s) => { writer.write(WriterEvent::characters(s))?; }
            }
        }
        writer.write(WriterEvent::end_element())
    }

    pub fn to_xml_string(&self) -> EncodeResult<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, true)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Drop the prefix of every element in `xmlns` within this subtree, so
    /// the markup reads the same under a default namespace declaration.
    pub fn unprefix(&mut self, xmlns: &str) {
        if self.name.namespace.as_deref() == Some(xmlns) {
            self.name.prefix = None;
        }
        self.namespaces.retain(|p, u| p.is_empty() || u != xmlns);
        for child in self.children.iter_mut() {
            if let XmlNode::Element(ref mut e) = *child {
                e.unprefix(xmlns);
            }
        }
    }

    /// The serialized children of this element, without its own tags.
    pub fn inner_markup(&self) -> EncodeResult<String> {
        let mut buf = Vec::new();
        self.write_to(&mut buf, false)?;
        let markup = String::from_utf8_lossy(&buf);
        // attribute values are escaped, so the first '>' closes the start tag
        let start = markup.find('>').map_or(0, |i| i + 1);
        let end = markup.rfind("</").unwrap_or(markup.len()).max(start);
        Ok(markup[start..end].to_owned())
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let xml = self.to_xml_string().map_err(|_| fmt::Error)?;
        f.write_str(&xml)
    }
}

fn escape_attr(value: &str) -> Cow<'_, str> {
    if value.contains(|c: char| c == '"' || c == '&' || c == '<') {
        Cow::Owned(value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;"))
    } else {
        Cow::Borrowed(value)
    }
}
