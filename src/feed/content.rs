use data_encoding::BASE64;

use super::{Text, TextType};
use crate::mimetype::{is_base64_encoded, MimeType};
use crate::parser::base::{DecodeResult, XmlElement};
use crate::schema::{FromElement, SchemaError, SchemaResult, ToElement};

/// Content construct defined in RFC 4287 (section 4.1.3).
///
/// The body lives in `text`.  When the `type` attribute names a media type
/// rather than one of `text`, `html`, `xhtml`, it is kept in `media_type`
/// and the body is read as plain character data.
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-4.1.3>
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub text: Text,
    /// The IRI of out-of-line content (section 4.1.3.2).
    pub src: Option<String>,
    pub media_type: Option<String>,
}

impl Content {
    pub fn new<T: Into<Text>>(text: T) -> Content {
        Content { text: text.into(), src: None, media_type: None }
    }

    pub fn html<T: Into<String>>(value: T) -> Content {
        Content::new(Text::html(value))
    }

    /// Content that lives at `src`, outside the document.
    pub fn out_of_line<T: Into<String>>(src: T, media_type: Option<&str>) -> Content {
        let content = Content { text: Text::default(), src: Some(src.into()), media_type: None };
        match media_type {
            Some(t) => content.with_type(t),
            None => content,
        }
    }

    /// Inline content of a non-textual media type, base64-encoded.
    pub fn binary(media_type: &str, data: &[u8]) -> Content {
        Content::new(BASE64.encode(data)).with_type(media_type)
    }

    /// Set the `type` attribute.  `text`, `html` and `xhtml` select the
    /// text type of the body; anything else is kept as `media_type`.
    pub fn with_type(mut self, type_: &str) -> Content {
        self.set_type(type_);
        self
    }

    fn set_type(&mut self, type_: &str) {
        match TextType::from_attr(type_) {
            Some(t) => {
                self.text.type_ = t;
                self.media_type = None;
            }
            None => { self.media_type = Some(type_.to_owned()); }
        }
    }

    /// The value of the `type` attribute.
    pub fn type_(&self) -> &str {
        match self.media_type {
            Some(ref t) => t,
            None => self.text.type_.as_str(),
        }
    }

    pub fn mimetype(&self) -> MimeType {
        match self.media_type {
            Some(ref t) => MimeType::from_str(t).unwrap_or_else(|| MimeType::Other(t.clone())),
            None => self.text.type_.mimetype(),
        }
    }

    pub fn is_out_of_line(&self) -> bool {
        self.src.is_some()
    }

    /// Whether the inline body is base64 of a non-textual media type.
    pub fn is_encoded(&self) -> bool {
        self.media_type.as_ref().is_some_and(|t| is_base64_encoded(t))
    }

    /// The bytes of the body, decoding base64 when the content is encoded.
    pub fn decoded_bytes(&self) -> SchemaResult<Vec<u8>> {
        if !self.is_encoded() {
            return Ok(self.text.value.as_bytes().to_vec());
        }
        let packed: String = self.text.value.chars().filter(|c| !c.is_whitespace()).collect();
        BASE64.decode(packed.as_bytes()).map_err(|_| SchemaError::MalformedValue {
            what: "base64 content",
            value: self.text.value.clone(),
        })
    }
}

/// Two contents are equal when they carry the same `type` attribute, the
/// same `src` and the same body.
impl PartialEq for Content {
    fn eq(&self, other: &Content) -> bool {
        self.type_() == other.type_() && self.src == other.src && self.text == other.text
    }
}

impl FromElement for Content {
    fn read_from(&mut self, element: &XmlElement) -> DecodeResult<()> {
        self.src = element.get_attr("src").map(ToOwned::to_owned);
        self.media_type = None;
        self.text.type_ = TextType::Text;
        if let Some(t) = element.get_attr("type") {
            self.set_type(t);
        }
        self.text.read_body(element)
    }
}

impl ToElement for Content {
    fn write_into(&self, element: &mut XmlElement) {
        element.set_attr("type", self.type_());
        match self.src {
            Some(ref src) => element.set_attr("src", &src[..]),
            None => self.text.write_body(element),
        }
    }
}
