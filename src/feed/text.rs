use std::fmt;

use log::{debug, warn};

use super::XHTML_XMLNS;
use crate::mimetype::MimeType;
use crate::parser::base::{DecodeResult, XmlElement};
use crate::schema::{FromElement, SchemaError, ToElement};

/// The `type` attribute of a text construct (RFC 4287 section 3.1.1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextType {
    #[default]
    Text,
    Html,
    Xhtml,
}

impl TextType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            TextType::Text => "text",
            TextType::Html => "html",
            TextType::Xhtml => "xhtml",
        }
    }

    /// Recognize one of the three construct types.  Anything else is left to
    /// the caller: a text construct falls back to plain text, a content
    /// construct takes it as a media type.
    pub fn from_attr(value: &str) -> Option<TextType> {
        match value {
            "text" => Some(TextType::Text),
            "html" => Some(TextType::Html),
            "xhtml" => Some(TextType::Xhtml),
            _ => None,
        }
    }

    pub fn mimetype(&self) -> MimeType {
        match *self {
            TextType::Text => MimeType::Text,
            TextType::Html => MimeType::Html,
            TextType::Xhtml => MimeType::Xhtml,
        }
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text construct defined in RFC 4287 (section 3.1).
///
/// Two texts are equal when their bodies are; the `type` is not compared.
/// An XHTML body is kept as the markup inside its wrapping `div`.
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-3.1>
#[derive(Clone, Debug, Default)]
pub struct Text {
    pub type_: TextType,
    pub value: String,
}

impl Text {
    pub fn new<T: Into<String>>(type_: TextType, value: T) -> Text {
        Text { type_: type_, value: value.into() }
    }

    pub fn plain<T: Into<String>>(value: T) -> Text {
        Text::new(TextType::Text, value)
    }

    pub fn html<T: Into<String>>(value: T) -> Text {
        Text::new(TextType::Html, value)
    }

    pub fn xhtml<T: Into<String>>(value: T) -> Text {
        Text::new(TextType::Xhtml, value)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub(crate) fn read_body(&mut self, element: &XmlElement) -> DecodeResult<()> {
        self.value = match self.type_ {
            TextType::Xhtml => match element.children_named(XHTML_XMLNS, "div").next() {
                Some(div) => {
                    let mut div = div.clone();
                    div.unprefix(XHTML_XMLNS);
                    div.inner_markup().map_err(|e| {
                        SchemaError::MalformedValue { what: "xhtml text", value: e.to_string() }
                    })?
                }
                None => element.text(),
            },
            _ => element.text(),
        };
        Ok(())
    }

    pub(crate) fn write_body(&self, element: &mut XmlElement) {
        if self.type_ == TextType::Xhtml {
            if let Ok(div) = XmlElement::parse_fragment(XHTML_XMLNS, "div", &self.value) {
                element.push(div);
                return;
            }
            debug!("xhtml text is not well-formed; writing it as character data");
        }
        element.push_text(&self.value[..]);
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Text) -> bool {
        self.value == other.value
    }
}

impl Eq for Text { }

impl From<String> for Text {
    fn from(value: String) -> Text { Text::plain(value) }
}

impl<'a> From<&'a str> for Text {
    fn from(value: &'a str) -> Text { Text::plain(value) }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl FromElement for Text {
    fn read_from(&mut self, element: &XmlElement) -> DecodeResult<()> {
        self.type_ = match element.get_attr("type") {
            None => TextType::Text,
            Some(t) => TextType::from_attr(t).unwrap_or_else(|| {
                warn!("unknown text construct type {:?}; read as text", t);
                TextType::Text
            }),
        };
        self.read_body(element)
    }
}

impl ToElement for Text {
    fn write_into(&self, element: &mut XmlElement) {
        element.set_attr("type", self.type_.as_str());
        self.write_body(element);
    }
}
