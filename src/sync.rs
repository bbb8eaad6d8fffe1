//! Keeping a [`Feed`] fresh with conditional GET.
//!
//! [`Feed::update`] asks the source of the feed for a new copy, sending back
//! the validators of the last copy it got (`If-None-Match` with the ETag,
//! `If-Modified-Since` with the Last-Modified date).  A `304 Not Modified`
//! leaves the feed alone; a `200 OK` is parsed and merged into it.
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH,
                      LAST_MODIFIED};
use reqwest::StatusCode;
use thiserror::Error;

use crate::feed::Feed;
use crate::http::{self, Client, Transport};
use crate::parser::base::DecodeError;
use crate::schema::Mergeable;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("the feed has no source URL")]
    NoSource,

    #[error(transparent)]
    Http(#[from] http::Error),

    /// The source answered with neither `200` nor `304`.
    #[error("fetching the feed failed: {0}")]
    Fetch(StatusCode),

    #[error("the fetched feed could not be read: {0}")]
    Decode(#[from] DecodeError),
}

/// What an update did to the feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    NotModified,
    Updated,
}

impl Feed {
    /// Fetch the feed from its `source_url` and merge it in.
    ///
    /// On a `200` the fetched document is merged into this one, so fields and
    /// entries the server left out are kept; the ETag and Last-Modified
    /// headers are recorded when the server sends them.  On any error the
    /// feed is left as it was.
    pub fn update<T: Transport>(&mut self, client: &mut Client<T>)
                                -> Result<Outcome, UpdateError> {
        let url = self.source_url.clone().ok_or(UpdateError::NoSource)?;
        let mut headers = HeaderMap::new();
        if let Some(ref etag) = self.etag {
            headers.insert(IF_NONE_MATCH, HeaderValue::from_str(etag).map_err(http::Error::from)?);
        }
        if let Some(ref last_modified) = self.last_modified {
            headers.insert(IF_MODIFIED_SINCE,
                           HeaderValue::from_str(last_modified).map_err(http::Error::from)?);
        }

        let response = client.get(url.as_str(), headers)?;
        match response.status {
            StatusCode::NOT_MODIFIED => {
                debug!("{} not modified", url);
                Ok(Outcome::NotModified)
            }
            StatusCode::OK => {
                let fetched = Feed::parse(&response.body[..])?;
                debug!("{} fetched with {} entries", url, fetched.entries().len());
                self.merge_with(fetched);
                if let Some(etag) = response.header(ETAG.as_str()) {
                    self.etag = Some(etag.to_owned());
                }
                if let Some(last_modified) = response.header(LAST_MODIFIED.as_str()) {
                    self.last_modified = Some(last_modified.to_owned());
                }
                Ok(Outcome::Updated)
            }
            status => {
                warn!("{} could not be fetched: {}", url, status);
                Err(UpdateError::Fetch(status))
            }
        }
    }
}
