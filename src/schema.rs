//! The declarative element schema.
//!
//! A document type lists its permitted children once, as a `'static` slice of
//! [`Field`] descriptors returned by [`DocumentElement::schema`].  Every
//! instance of the type shares that table; the generic reader, writer and
//! merge in [`feed::Element`](../feed/struct.Element.html) walk it instead of
//! hard-coding any field.
//!
//! ```
//! use atom_sync::schema::{Coder, Field, Item};
//!
//! const AUTHORS: Field = Field::element("authors", Coder::Multiple(Item::Person))
//!     .tagged("author");
//! assert!(AUTHORS.is_multiple());
//! assert!(!AUTHORS.required);
//! ```
use std::fmt;

use thiserror::Error;

use crate::parser::base::{DecodeResult, XmlElement};

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("error occurred while encoding")]
    EncodeError,

    /// A coder could not turn the text of a node into its value type.
    #[error("malformed {what}: {value:?}")]
    MalformedValue { what: &'static str, value: String },

    #[error("no element named {0:?} in the schema")]
    UnknownField(String),

    #[error("value does not fit the coder of element {0:?}")]
    TypeMismatch(&'static str),

    #[error("element {0:?} is declared more than once")]
    DescriptorConflict(&'static str),
}

impl From<fmt::Error> for SchemaError {
    fn from(_: fmt::Error) -> SchemaError {
        SchemaError::EncodeError
    }
}

/// Conversion between a value and its textual form.
pub trait Codec<T> {
    fn encode(&self, value: &T, w: &mut dyn fmt::Write) -> SchemaResult<()>;
    fn decode(&self, r: &str) -> SchemaResult<T>;
}

/// The element type a `Multiple` field collects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    Person,
    Category,
    Link,
    Entry,
}

/// How the value of a field is read from and written to its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coder {
    /// Plain string, the text content of the node.
    Str,
    /// Text construct (RFC 4287 section 3.1).
    Text,
    /// Content construct (RFC 4287 section 4.1.3).
    Content,
    /// RFC 3339 date-time.
    Time,
    /// Every matching child, in document order.
    Multiple(Item),
}

/// A declared child of a document type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    /// The name the field is addressed by.
    pub name: &'static str,
    /// Local name of the XML element, in the document's namespace.
    pub tag: &'static str,
    pub coder: Coder,
    /// Checked only by the validity rules of the document, never by the
    /// reader.
    pub required: bool,
}

impl Field {
    pub const fn element(name: &'static str, coder: Coder) -> Field {
        Field { name: name, tag: name, coder: coder, required: false }
    }

    pub const fn tagged(self, tag: &'static str) -> Field {
        Field { tag: tag, ..self }
    }

    pub const fn required(self) -> Field {
        Field { required: true, ..self }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self.coder, Coder::Multiple(_))
    }
}

/// The root element of a document type, and the table of its children.
pub trait DocumentElement {
    fn tag() -> &'static str;
    fn xmlns() -> &'static str;
    fn schema() -> &'static [Field];
}

/// Look up the descriptor of `name` in the schema of `D`.
pub fn field<D: DocumentElement>(name: &str) -> Option<&'static Field> {
    D::schema().iter().find(|f| f.name == name)
}

/// Fail on the first name declared twice.
pub fn check_unique(schema: &[Field]) -> SchemaResult<()> {
    for (i, f) in schema.iter().enumerate() {
        if schema[..i].iter().any(|g| g.name == f.name) {
            return Err(SchemaError::DescriptorConflict(f.name));
        }
    }
    Ok(())
}

/// Values that can be read from the node of an element.
pub trait FromElement: Default {
    fn build_from(element: &XmlElement) -> DecodeResult<Self> {
        let mut value: Self = Default::default();
        value.read_from(element)?;
        Ok(value)
    }

    fn read_from(&mut self, element: &XmlElement) -> DecodeResult<()>;
}

/// Values that can fill an empty node with their attributes and children.
pub trait ToElement {
    fn write_into(&self, element: &mut XmlElement);
}

/// Reconcile a document with a newer copy of itself.
pub trait Mergeable: Sized {
    /// Take every part of `incoming` that is set, keeping the rest of `self`.
    fn merge_with(&mut self, incoming: Self);
}


#[cfg(test)]
mod test {
    use super::{check_unique, Coder, Field, Item, SchemaError};

    #[test]
    fn test_field_builder() {
        let f = Field::element("links", Coder::Multiple(Item::Link)).tagged("link");
        assert_eq!(f.name, "links");
        assert_eq!(f.tag, "link");
        assert!(f.is_multiple());
        assert!(!f.required);
        let f = Field::element("id", Coder::Str).required();
        assert_eq!(f.tag, "id");
        assert!(f.required);
        assert!(!f.is_multiple());
    }

    #[test]
    fn test_check_unique() {
        let ok = [Field::element("id", Coder::Str),
                  Field::element("title", Coder::Text)];
        unwrap!(check_unique(&ok));
        let dup = [Field::element("id", Coder::Str),
                   Field::element("title", Coder::Text),
                   Field::element("id", Coder::Text)];
        assert_err!(check_unique(&dup), SchemaError::DescriptorConflict(name) => {
            assert_eq!(name, "id");
        });
    }
}
