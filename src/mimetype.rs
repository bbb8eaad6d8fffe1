use std::fmt;

use lazy_regex::regex;

/// A media type, with the three that text constructs use told apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MimeType {
    Text,
    Html,
    Xhtml,
    Other(String),
}

impl MimeType {
    /// Parse `type/subtype`, ignoring any parameters.
    pub fn from_str(mimetype: &str) -> Option<MimeType> {
        let pattern = regex!(r#"^\s*(?P<type>[A-Za-z0-9!#$&.+^_-]{1,127})/(?P<subtype>[A-Za-z0-9!#$&.+^_-]{1,127})\s*(?:;.*)?$"#);
        let captures = pattern.captures(mimetype)?;
        let type_ = captures["type"].to_ascii_lowercase();
        let subtype = captures["subtype"].to_ascii_lowercase();
        Some(match (&type_[..], &subtype[..]) {
            ("text", "plain") => MimeType::Text,
            ("text", "html") => MimeType::Html,
            ("application", "xhtml+xml") => MimeType::Xhtml,
            _ => MimeType::Other(format!("{}/{}", type_, subtype)),
        })
    }

    pub fn mimetype(&self) -> &str {
        match *self {
            MimeType::Text => "text/plain",
            MimeType::Html => "text/html",
            MimeType::Xhtml => "application/xhtml+xml",
            MimeType::Other(ref mimetype) => mimetype,
        }
    }

    /// Whether the type is textual: `text/*` or an XML type.
    pub fn is_text(&self) -> bool {
        match *self {
            MimeType::Other(ref mimetype) => {
                mimetype.starts_with("text/") ||
                    mimetype.ends_with("/xml") || mimetype.ends_with("+xml")
            }
            _ => true,
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.mimetype())
    }
}

/// Whether content of the media type `type_` is carried base64-encoded in
/// an Atom document (RFC 4287 section 4.1.3.3).
///
/// The construct types `text`, `html` and `xhtml` are never encoded; neither
/// is a textual media type.  Unparsable types count as encoded.
pub fn is_base64_encoded(type_: &str) -> bool {
    match type_.trim() {
        "" | "text" | "html" | "xhtml" => false,
        t => !MimeType::from_str(t).is_some_and(|m| m.is_text()),
    }
}


#[cfg(test)]
mod test {
    use super::{is_base64_encoded, MimeType};

    #[test]
    fn test_from_str() {
        assert_eq!(MimeType::from_str("text/plain"), Some(MimeType::Text));
        assert_eq!(MimeType::from_str("text/html; charset=utf-8"), Some(MimeType::Html));
        assert_eq!(MimeType::from_str("Application/XHTML+XML"), Some(MimeType::Xhtml));
        assert_eq!(MimeType::from_str("image/png"),
                   Some(MimeType::Other("image/png".to_owned())));
        assert_eq!(MimeType::from_str("png"), None);
        assert_eq!(MimeType::Html.to_string(), "text/html");
    }

    #[test]
    fn test_is_base64_encoded() {
        for t in ["text", "html", "xhtml", "text/plain", "text/csv",
                  "application/xml", "application/atom+xml",
                  "application/atom+xml;type=entry", "image/svg+xml"].iter() {
            assert!(!is_base64_encoded(t), "{}", t);
        }
        for t in ["image/png", "application/octet-stream", "application/json",
                  "application/xml-dtd", "garbage"].iter() {
            assert!(is_base64_encoded(t), "{}", t);
        }
    }
}
