use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

use super::{Category, Content, Element, Link, Person, Text, ATOM_XMLNS};
use crate::schema::{Coder, DocumentElement, Field, Item};

/// The document type of `atom:entry` (RFC 4287 section 4.1.2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AtomEntry;

/// An individual entry, acting as a container for metadata and data
/// associated with the entry.
pub type Entry = Element<AtomEntry>;

const ENTRY_SCHEMA: &[Field] = &[
    Field::element("id", Coder::Str).required(),
    Field::element("title", Coder::Text).required(),
    // advisory: an alternate link may stand in for it
    Field::element("content", Coder::Content).required(),
    Field::element("icon", Coder::Str),
    Field::element("logo", Coder::Str),
    Field::element("generator", Coder::Str),
    Field::element("rights", Coder::Text),
    Field::element("subtitle", Coder::Text),
    Field::element("summary", Coder::Text),
    Field::element("published", Coder::Time),
    Field::element("updated", Coder::Time),
    Field::element("authors", Coder::Multiple(Item::Person)).tagged("author"),
    Field::element("contributors", Coder::Multiple(Item::Person)).tagged("contributor"),
    Field::element("categories", Coder::Multiple(Item::Category)).tagged("category"),
    Field::element("links", Coder::Multiple(Item::Link)).tagged("link"),
];

impl DocumentElement for AtomEntry {
    fn tag() -> &'static str { "entry" }
    fn xmlns() -> &'static str { ATOM_XMLNS }
    fn schema() -> &'static [Field] { ENTRY_SCHEMA }
}

/// The first rule of RFC 4287 section 4.1.2 an entry breaks.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("required element atom:{0} missing")]
    MissingElement(&'static str),

    #[error("required element atom:author missing")]
    MissingAuthor,

    #[error("no atom:content or atom:link[rel='alternate']")]
    NoContentOrAlternate,

    #[error("more than one atom:link with a rel attribute value of \"alternate\" \
             that has the same combination of type ({mimetype:?}) and hreflang \
             ({language:?}) attribute values")]
    DuplicateAlternate { mimetype: Option<String>, language: Option<String> },

    #[error("out-of-line or base64ed atom:content and no atom:summary")]
    MissingSummary,
}

impl Element<AtomEntry> {
    scalar_fields! {
        id, id_mut, set_id: String;
        title, title_mut, set_title: Text;
        content, content_mut, set_content: Content;
        icon, icon_mut, set_icon: String;
        logo, logo_mut, set_logo: String;
        generator, generator_mut, set_generator: String;
        rights, rights_mut, set_rights: Text;
        subtitle, subtitle_mut, set_subtitle: Text;
        summary, summary_mut, set_summary: Text;
        published, published_mut, set_published: DateTime<FixedOffset>;
        updated, updated_mut, set_updated: DateTime<FixedOffset>;
    }

    multiple_fields! {
        authors, authors_mut: Person;
        contributors, contributors_mut: Person;
        categories, categories_mut: Category;
        links, links_mut: Link;
    }

    /// Check the entry against the rules of RFC 4287 section 4.1.2, stopping
    /// at the first one it breaks.
    pub fn check_validity(&self) -> Result<(), Violation> {
        for field in ENTRY_SCHEMA.iter().filter(|f| f.required && f.name != "content") {
            if !self.is_set(field.name) {
                return Err(Violation::MissingElement(field.name));
            }
        }
        if self.authors().is_empty() {
            return Err(Violation::MissingAuthor);
        }
        let alternates: Vec<&Link> = self.links().iter()
            .filter(|l| l.relation == "alternate")
            .collect();
        if self.content().is_none() && alternates.is_empty() {
            return Err(Violation::NoContentOrAlternate);
        }
        for (i, a) in alternates.iter().enumerate() {
            if let Some(b) = alternates[i + 1..].iter()
                .find(|b| b.mimetype == a.mimetype && b.language == a.language)
            {
                return Err(Violation::DuplicateAlternate {
                    mimetype: b.mimetype.clone(),
                    language: b.language.clone(),
                });
            }
        }
        if let Some(content) = self.content() {
            if (content.is_out_of_line() || content.is_encoded()) && self.summary().is_none() {
                return Err(Violation::MissingSummary);
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.check_validity().is_ok()
    }

    /// Mark the entry as updated now.
    pub fn touch(&mut self) {
        self.set_updated(Utc::now());
    }

    /// Add a category for each whitespace-separated term of `tags`.
    pub fn tag_with(&mut self, tags: &str) {
        let categories = self.categories_mut();
        for tag in tags.split_whitespace() {
            categories.append_new().term = tag.to_owned();
        }
    }
}


#[cfg(test)]
mod test {
    use chrono::Utc;

    use super::{Violation, ENTRY_SCHEMA};

    use crate::feed::{Content, Entry, Link, Person, Text};
    use crate::schema::check_unique;

    fn valid_entry() -> Entry {
        let mut entry = Entry::new();
        entry.set_id("tag:example.org,2003:3.2397");
        entry.set_title("Atom draft-07 snapshot");
        entry.set_content(Content::html("<p>Hello</p>"));
        entry.authors_mut().push(Person::new("Mark Pilgrim"));
        entry
    }

    fn alternate(href: &str, mimetype: Option<&str>, language: Option<&str>) -> Link {
        Link {
            mimetype: mimetype.map(ToOwned::to_owned),
            language: language.map(ToOwned::to_owned),
            ..Link::new(href)
        }
    }

    #[test]
    fn test_schema_is_unique() {
        unwrap!(check_unique(ENTRY_SCHEMA));
    }

    #[test]
    fn test_valid_entry() {
        let entry = valid_entry();
        assert_eq!(entry.check_validity(), Ok(()));
        assert!(entry.is_valid());
    }

    #[test]
    fn test_missing_required_element() {
        let mut entry = valid_entry();
        entry.unset("title");
        assert_eq!(entry.check_validity(), Err(Violation::MissingElement("title")));
        assert_eq!(Violation::MissingElement("id").to_string(),
                   "required element atom:id missing");
    }

    #[test]
    fn test_missing_author() {
        let mut entry = valid_entry();
        entry.authors_mut().clear();
        let violation = entry.check_validity().unwrap_err();
        assert_eq!(violation, Violation::MissingAuthor);
        assert_eq!(violation.to_string(), "required element atom:author missing");
    }

    #[test]
    fn test_alternate_link_stands_in_for_content() {
        let mut entry = valid_entry();
        entry.unset("content");
        assert_eq!(entry.check_validity(), Err(Violation::NoContentOrAlternate));
        assert_eq!(Violation::NoContentOrAlternate.to_string(),
                   "no atom:content or atom:link[rel='alternate']");
        entry.links_mut().push(Link::new("http://example.org/2003/12/13/atom03"));
        assert!(entry.is_valid());
        let mut edit = Link::new("http://example.org/edit");
        edit.relation = "edit".to_owned();
        entry.links_mut().push(edit.clone());
        entry.links_mut().push(edit);
        assert!(entry.is_valid());
    }

    #[test]
    fn test_duplicate_alternates() {
        let mut entry = valid_entry();
        entry.links_mut().push(alternate("http://example.org/1", Some("text/html"), Some("en")));
        entry.links_mut().push(alternate("http://example.org/2", Some("text/html"), Some("ko")));
        assert!(entry.is_valid());
        entry.links_mut().push(alternate("http://example.org/3", Some("text/html"), Some("en")));
        let violation = entry.check_validity().unwrap_err();
        assert_eq!(violation, Violation::DuplicateAlternate {
            mimetype: Some("text/html".to_owned()),
            language: Some("en".to_owned()),
        });
        assert!(violation.to_string().starts_with("more than one atom:link"));
    }

    #[test]
    fn test_out_of_line_content_needs_summary() {
        let mut entry = valid_entry();
        entry.set_content(Content::out_of_line("http://example.org/movie.mp4",
                                               Some("video/mp4")));
        assert_eq!(entry.check_validity(), Err(Violation::MissingSummary));
        assert_eq!(Violation::MissingSummary.to_string(),
                   "out-of-line or base64ed atom:content and no atom:summary");
        entry.set_summary("A movie");
        assert!(entry.is_valid());

        let mut entry = valid_entry();
        entry.set_content(Content::binary("image/png", b"\x89PNG"));
        assert_eq!(entry.check_validity(), Err(Violation::MissingSummary));
    }

    #[test]
    fn test_touch() {
        let mut entry = Entry::new();
        assert!(entry.updated().is_none());
        let before = Utc::now();
        entry.touch();
        let updated = *entry.updated().unwrap();
        assert!(updated >= before && updated <= Utc::now());
    }

    #[test]
    fn test_tag_with() {
        let mut entry = Entry::new();
        entry.tag_with("  rust atom\tsync ");
        let terms: Vec<_> = entry.categories().iter().map(|c| &c.term[..]).collect();
        assert_eq!(terms, ["rust", "atom", "sync"]);
        entry.tag_with("");
        assert_eq!(entry.categories().len(), 3);
    }

    #[test]
    fn test_round_trip() {
        let mut entry = valid_entry();
        entry.set_summary(Text::xhtml("Some <b>text</b>."));
        entry.set_rights(Text::html("&copy; 2005"));
        entry.set_published(unwrap!(chrono::DateTime::parse_from_rfc3339(
            "2003-12-13T08:29:29-04:00")));
        entry.contributors_mut().push(Person {
            name: "Sam Ruby".to_owned(),
            uri: Some("http://intertwingly.net/".to_owned()),
            email: None,
        });
        entry.links_mut().push(alternate("http://example.org/", Some("text/html"), None));
        entry.tag_with("a b");
        let xml = entry.to_string();
        let reread = unwrap!(Entry::parse(xml.as_bytes()));
        assert_eq!(reread, entry);
        assert_eq!(reread.summary().map(|t| t.type_), entry.summary().map(|t| t.type_));
        assert_eq!(reread.published().map(|d| d.offset().local_minus_utc()),
                   Some(-4 * 3600));
        assert_eq!(reread.categories()[1].term, "b");
    }
}
