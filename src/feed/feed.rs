use std::fmt;
use std::io;
use std::ops::{Deref, DerefMut};

use chrono::{DateTime, FixedOffset};
use url::Url;

use super::{Category, Element, Entry, Link, Person, Text, ATOM_XMLNS};
use crate::parser::base::DecodeResult;
use crate::schema::{Coder, DocumentElement, Field, Item, Mergeable};

/// The document type of `atom:feed` (RFC 4287 section 4.1.1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AtomFeed;

const FEED_SCHEMA: &[Field] = &[
    Field::element("id", Coder::Str).required(),
    Field::element("title", Coder::Text).required(),
    Field::element("updated", Coder::Time).required(),
    Field::element("subtitle", Coder::Text),
    Field::element("rights", Coder::Text),
    Field::element("icon", Coder::Str),
    Field::element("logo", Coder::Str),
    Field::element("generator", Coder::Str),
    Field::element("authors", Coder::Multiple(Item::Person)).tagged("author"),
    Field::element("contributors", Coder::Multiple(Item::Person)).tagged("contributor"),
    Field::element("categories", Coder::Multiple(Item::Category)).tagged("category"),
    Field::element("links", Coder::Multiple(Item::Link)).tagged("link"),
    Field::element("entries", Coder::Multiple(Item::Entry)).tagged("entry"),
];

impl DocumentElement for AtomFeed {
    fn tag() -> &'static str { "feed" }
    fn xmlns() -> &'static str { ATOM_XMLNS }
    fn schema() -> &'static [Field] { FEED_SCHEMA }
}

impl Element<AtomFeed> {
    scalar_fields! {
        id, id_mut, set_id: String;
        title, title_mut, set_title: Text;
        updated, updated_mut, set_updated: DateTime<FixedOffset>;
        subtitle, subtitle_mut, set_subtitle: Text;
        rights, rights_mut, set_rights: Text;
        icon, icon_mut, set_icon: String;
        logo, logo_mut, set_logo: String;
        generator, generator_mut, set_generator: String;
    }

    multiple_fields! {
        authors, authors_mut: Person;
        contributors, contributors_mut: Person;
        categories, categories_mut: Category;
        links, links_mut: Link;
        entries, entries_mut: Entry;
    }
}

/// An Atom feed document, and what is known about where it came from.
///
/// The revalidation state (`etag`, `last_modified`, `source_url`) is never
/// part of the XML: [`Feed::update`](#method.update) maintains it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Feed {
    document: Element<AtomFeed>,
    /// The `ETag` of the last successful fetch.
    pub etag: Option<String>,
    /// The `Last-Modified` of the last successful fetch.
    pub last_modified: Option<String>,
    pub source_url: Option<Url>,
}

impl Deref for Feed {
    type Target = Element<AtomFeed>;
    fn deref(&self) -> &Element<AtomFeed> { &self.document }
}

impl DerefMut for Feed {
    fn deref_mut(&mut self) -> &mut Element<AtomFeed> { &mut self.document }
}

impl Feed {
    pub fn new() -> Feed {
        Default::default()
    }

    /// An empty feed to be filled from `url`.
    pub fn with_source(url: &str) -> Result<Feed, url::ParseError> {
        Ok(Feed { source_url: Some(Url::parse(url)?), ..Default::default() })
    }

    pub fn from_document(document: Element<AtomFeed>) -> Feed {
        Feed { document: document, ..Default::default() }
    }

    /// Read a feed document; the result has no revalidation state.
    pub fn parse<R: io::Read>(source: R) -> DecodeResult<Feed> {
        Element::parse(source).map(Feed::from_document)
    }

    pub fn document(&self) -> &Element<AtomFeed> {
        &self.document
    }

    pub fn into_document(self) -> Element<AtomFeed> {
        self.document
    }
}

impl Mergeable for Feed {
    /// Merge the documents.  Revalidation state stays as it is.
    fn merge_with(&mut self, incoming: Feed) {
        self.document.merge_with(incoming.document);
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.document, f)
    }
}
