use std::fmt;

use crate::parser::base::{DecodeResult, XmlElement};
use crate::schema::{FromElement, ToElement};

/// Category element defined in RFC 4287 (section 4.2.2).
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-4.2.2>
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Category {
    /// The required machine-readable identifier string of the category.
    /// It corresponds to `term` attribute of RFC 4287 (section 4.2.2.1).
    pub term: String,

    /// The URI that identifies a categorization scheme.  It corresponds to
    /// `scheme` attribute of RFC 4287 (section 4.2.2.2).
    ///
    /// ### See also
    ///
    /// * [Tag Scheme?][scheme-1] by Tim Bray
    /// * [Representing tags in Atom][scheme-2] by Edward O'Connor
    ///
    /// [scheme-1]: http://www.tbray.org/ongoing/When/200x/2007/02/01/Tag-Scheme
    /// [scheme-2]: http://edward.oconnor.cx/2007/02/representing-tags-in-atom
    pub scheme_uri: Option<String>,

    /// The optional human-readable label for display in end-user
    /// applications.  It corresponds to `label` attribute of RFC 4287
    /// (section 4.2.2.3).
    pub label: Option<String>,
}

impl Category {
    pub fn new<T: Into<String>>(term: T) -> Category {
        Category { term: term.into(), ..Default::default() }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label.as_ref().unwrap_or(&self.term))
    }
}

impl FromElement for Category {
    fn read_from(&mut self, element: &XmlElement) -> DecodeResult<()> {
        self.term = element.require_attr("term")?.to_owned();
        self.scheme_uri = element.get_attr("scheme").map(ToOwned::to_owned);
        self.label = element.get_attr("label").map(ToOwned::to_owned);
        Ok(())
    }
}

impl ToElement for Category {
    fn write_into(&self, element: &mut XmlElement) {
        element.set_attr("term", &self.term[..]);
        if let Some(ref scheme) = self.scheme_uri {
            element.set_attr("scheme", &scheme[..]);
        }
        if let Some(ref label) = self.label {
            element.set_attr("label", &label[..]);
        }
    }
}
