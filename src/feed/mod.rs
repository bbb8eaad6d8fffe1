//! The Atom document model.
//!
//! Constructs (`Text`, `Content`, `Person`, `Category`, `Link`) are plain
//! structs.  Document types (`Entry`, `Feed`) are instances of the generic
//! [`Element`], driven by the schema table of their marker type.
pub use self::category::Category;
pub use self::content::Content;
pub use self::element::{CollectionValue, Element, FieldValue, Value};
pub use self::entry::{AtomEntry, Entry, Violation};
pub use self::feed::{AtomFeed, Feed};
pub use self::link::Link;
pub use self::multiple::Multiple;
pub use self::person::Person;
pub use self::text::{Text, TextType};

/// The XML namespace name used for Atom (RFC 4287).
pub const ATOM_XMLNS: &str = "http://www.w3.org/2005/Atom";

/// The XML namespace name used for XHTML.
pub const XHTML_XMLNS: &str = "http://www.w3.org/1999/xhtml";

mod category;
mod content;
mod element;
mod entry;
#[allow(clippy::module_inception)]
mod feed;
mod link;
mod multiple;
mod person;
mod text;
