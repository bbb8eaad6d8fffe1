use std::fmt;

use super::ATOM_XMLNS;
use crate::parser::base::{DecodeResult, XmlElement};
use crate::schema::{FromElement, ToElement};

/// Person construct defined in RFC 4287 (section 3.2).
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-3.2>
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Person {
    /// The human-readable name for the person.  It corresponds to
    /// `atom:name` element of [RFC 4287 (section 3.2.1)][rfc-person-1].
    ///
    /// [rfc-person-1]: https://tools.ietf.org/html/rfc4287#section-3.2.1
    pub name: String,

    /// The optional URI associated with the person.  It corresponds to
    /// `atom:uri` element of [RFC 4287 (section 3.2.2)][rfc-person-2].
    ///
    /// [rfc-person-2]: https://tools.ietf.org/html/rfc4287#section-3.2.2
    pub uri: Option<String>,

    /// The optional email address associated with the person.  It
    /// corresponds to `atom:email` element of [RFC 4287 (section 3.2.3)
    /// ][rfc-person-3].
    ///
    /// [rfc-person-3]: https://tools.ietf.org/html/rfc4287#section-3.2.3
    pub email: Option<String>,
}

impl Person {
    pub fn new<T: Into<String>>(name: T) -> Person {
        Person { name: name.into(), uri: None, email: None }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(r) = self.uri.as_ref().or(self.email.as_ref()) {
            write!(f, " <{}>", r)?;
        }
        Ok(())
    }
}

impl FromElement for Person {
    fn read_from(&mut self, element: &XmlElement) -> DecodeResult<()> {
        let child = |name| element.children_named(ATOM_XMLNS, name).next().map(|e| e.text());
        if let Some(name) = child("name") {
            self.name = name;
        }
        self.uri = child("uri");
        self.email = child("email");
        Ok(())
    }
}

impl ToElement for Person {
    fn write_into(&self, element: &mut XmlElement) {
        let fields = [("name", Some(&self.name)), ("uri", self.uri.as_ref()),
                      ("email", self.email.as_ref())];
        for &(tag, value) in fields.iter() {
            if let Some(value) = value {
                let mut child = XmlElement::qualified(ATOM_XMLNS, tag);
                child.push_text(&value[..]);
                element.push(child);
            }
        }
    }
}
