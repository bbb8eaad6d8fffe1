//! **atom-sync** is a typed document model for the [Atom syndication
//! format][RFC 4287], together with the conditional-GET protocol that keeps a
//! local copy of a feed fresh.
//!
//! Every Atom document type (`Entry`, `Feed`) declares its children once, as a
//! constant table of [`schema::Field`] descriptors.  The generic machinery in
//! [`feed::Element`] reads an XML tree against that table, writes it back, and
//! merges two documents of the same type field by field.  [`Feed::update`]
//! builds on top of it: it revalidates the feed against its source with
//! `If-None-Match` / `If-Modified-Since`, and merges whatever the server sends
//! back into the resident feed.
//!
//! ```no_run
//! use atom_sync::Feed;
//! use atom_sync::http::Client;
//!
//! let mut client = Client::new();
//! let mut feed = Feed::with_source("http://example.org/feed.atom").unwrap();
//! feed.update(&mut client).unwrap();
//! for entry in feed.entries() {
//!     println!("{}", entry.title().map(|t| t.to_string()).unwrap_or_default());
//! }
//! ```
//!
//! [RFC 4287]: https://tools.ietf.org/html/rfc4287

#[macro_use]
mod macros;
#[macro_use]
pub mod test_utils;

pub mod codecs;
pub mod feed;
pub mod http;
pub mod mimetype;
pub mod parser;
pub mod schema;
pub mod sync;

pub use feed::{Entry, Feed};
