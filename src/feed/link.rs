use std::fmt;

use lazy_regex::regex;

use crate::parser::base::{DecodeResult, XmlElement};
use crate::schema::{FromElement, ToElement};

/// Link element defined in RFC 4287 (section 4.2.7).
///
/// RFC: <https://tools.ietf.org/html/rfc4287#section-4.2.7>.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
    /// The link's required URI.  It corresponds to `href` attribute of
    /// [RFC 4287 (section 4.2.7.1)][rfc-link-1].
    ///
    /// [rfc-link-1]: https://tools.ietf.org/html/rfc4287#section-4.2.7.1
    pub uri: String,

    /// The relation type of the link.  It corresponds to `rel` attribute
    /// of [RFC 4287 (section 4.2.7.2)][rfc-link-2], and is `alternate` when
    /// the attribute is absent.
    ///
    /// ### See also
    ///
    /// * [Existing rel values][rel-values] --- Microformats Wiki
    ///
    /// [rfc-link-2]: https://tools.ietf.org/html/rfc4287#section-4.2.7.2
    /// [rel-values]: http://microformats.org/wiki/existing-rel-values
    pub relation: String,

    /// The optional hint for the MIME media type of the linked content.
    /// It corresponds to `type` attribute of
    /// [RFC 4287 (section 4.2.7.3)][rfc-link-3].
    ///
    /// [rfc-link-3]: https://tools.ietf.org/html/rfc4287#section-4.2.7.3
    pub mimetype: Option<String>,

    /// The language of the linked content.  It corresponds to `hreflang`
    /// attribute of [RFC 4287 (section 4.2.7.4)][rfc-link-4].
    ///
    /// [rfc-link-4]: https://tools.ietf.org/html/rfc4287#section-4.2.7.4
    pub language: Option<String>,

    /// The title of the linked resource.  It corresponds to `title`
    /// attribute of [RFC 4287 (section 4.2.7.5)][rfc-link-5].
    ///
    /// [rfc-link-5]: https://tools.ietf.org/html/rfc4287#section-4.2.7.5
    pub title: Option<String>,

    /// The optional hint for the length of the linked content in octets.
    /// It corresponds to `length` attribute of [RFC 4287 (section 4.2.7.6)
    /// ][rfc-link-6].
    ///
    /// [rfc-link-6]: https://tools.ietf.org/html/rfc4287#section-4.2.7.6
    pub byte_size: Option<u64>,
}

impl Link {
    pub fn new<T: Into<String>>(uri: T) -> Link {
        Link {
            uri: uri.into(), relation: "alternate".to_owned(),
            mimetype: None, language: None, title: None, byte_size: None
        }
    }

    /// Whether its `mimetype` is HTML (or XHTML).
    pub fn is_html(&self) -> bool {
        if let Some(ref mimetype) = self.mimetype {
            let pat = regex!(r#"^\s*([^;/\s]+/[^;/\s]+)\s*(?:;\s*.*)?$"#);
            if let Some(c) = pat.captures(mimetype) {
                if let Some(mimetype) = c.get(1) {
                    return ["text/html", "application/xhtml+xml"]
                        .contains(&mimetype.as_str());
                }
            }
        }
        false
    }
}

impl Default for Link {
    fn default() -> Link { Link::new("") }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

impl FromElement for Link {
    fn read_from(&mut self, element: &XmlElement) -> DecodeResult<()> {
        let attr = |name| element.get_attr(name).map(ToOwned::to_owned);
        self.uri = element.require_attr("href")?.to_owned();
        self.relation = attr("rel").unwrap_or_else(|| "alternate".to_owned());
        self.mimetype = attr("type");
        self.language = attr("hreflang");
        self.title = attr("title");
        self.byte_size = element.get_attr("length").and_then(|v| v.trim().parse().ok());
        Ok(())
    }
}

impl ToElement for Link {
    fn write_into(&self, element: &mut XmlElement) {
        element.set_attr("href", &self.uri[..]);
        element.set_attr("rel", &self.relation[..]);
        let optional = [("type", &self.mimetype), ("hreflang", &self.language),
                        ("title", &self.title)];
        for &(name, value) in optional.iter() {
            if let Some(ref value) = *value {
                element.set_attr(name, &value[..]);
            }
        }
        if let Some(size) = self.byte_size {
            element.set_attr("length", size.to_string());
        }
    }
}
