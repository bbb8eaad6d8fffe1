//! A small blocking HTTP client that answers `401 Unauthorized` with Basic
//! credentials from a callback.
//!
//! The wire is abstracted behind [`Transport`]; [`ReqwestTransport`] is the
//! real one.
use log::{debug, trace};
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, USER_AGENT,
                      WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode};
use thiserror::Error;
use url::Url;

pub use self::auth::{Challenge, Credentials, DigestAuth};
pub use self::config::ClientConfig;

pub mod auth;
mod config;

#[derive(Debug, Error)]
pub enum Error {
    /// The server refused the request, and no credentials could be found or
    /// the ones found were refused too.
    #[error("unauthorized")]
    Unauthorized,

    #[error("can't handle {0} authentication")]
    UnsupportedAuthScheme(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),
}

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    /// A header value, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Sends one request and reads the whole response.
pub trait Transport {
    fn send(&self, request: &Request) -> Result<Response>;
}

/// [`Transport`] over a blocking `reqwest` client.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> ReqwestTransport {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        ReqwestTransport { client: builder.build().unwrap_or_default() }
    }

    pub fn with_client(client: reqwest::blocking::Client) -> ReqwestTransport {
        ReqwestTransport { client: client }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &Request) -> Result<Response> {
        let mut builder = self.client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }
        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();
        Ok(Response { status: status, headers: headers, body: body })
    }
}

/// Looks up credentials for a protection space: the root URL of the server
/// that sent the challenge, and the realm it named.
pub type AuthCallback = Box<dyn FnMut(&Url, Option<&str>) -> Option<Credentials>>;

/// An HTTP client.
///
/// ```
/// use atom_sync::http::{Client, ClientConfig, Credentials};
///
/// let mut client = Client::with_config(ClientConfig {
///     user_agent: "my-reader/1.0".to_owned(),
///     ..Default::default()
/// });
/// client.when_auth(|_url, realm| match realm {
///     Some("private") => Some(Credentials::new("joe", "secret")),
///     _ => None,
/// });
/// ```
pub struct Client<T = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
    get_auth_details: AuthCallback,
    digest: DigestAuth,
}

impl Client<ReqwestTransport> {
    pub fn new() -> Client {
        Client::with_config(Default::default())
    }

    pub fn with_config(config: ClientConfig) -> Client {
        let transport = ReqwestTransport::new(&config);
        Client::with_transport(transport, config)
    }
}

impl Default for Client<ReqwestTransport> {
    fn default() -> Client { Client::new() }
}

impl<T: Transport> Client<T> {
    /// A client sending its requests through `transport`.  Credentials come
    /// from `config.user` and `config.pass` until [`when_auth`] replaces
    /// the callback.
    ///
    /// [`when_auth`]: #method.when_auth
    pub fn with_transport(transport: T, config: ClientConfig) -> Client<T> {
        let user = config.user.clone();
        let pass = config.pass.clone();
        Client {
            transport: transport,
            config: config,
            get_auth_details: Box::new(move |_: &Url, _: Option<&str>| match (&user, &pass) {
                (&Some(ref u), &Some(ref p)) => Some(Credentials::new(&u[..], &p[..])),
                _ => None,
            }),
            digest: DigestAuth::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Replace the callback asked for credentials when a server answers
    /// `401`.  It gets the root URL of the server and the realm of the
    /// challenge; `None` gives up.
    pub fn when_auth<F>(&mut self, callback: F)
        where F: FnMut(&Url, Option<&str>) -> Option<Credentials> + 'static
    {
        self.get_auth_details = Box::new(callback);
    }

    pub fn get(&mut self, url: &str, headers: HeaderMap) -> Result<Response> {
        self.http_request(Method::GET, url, None, headers)
    }

    pub fn post(&mut self, url: &str, body: Vec<u8>, headers: HeaderMap) -> Result<Response> {
        self.http_request(Method::POST, url, Some(body), headers)
    }

    pub fn put(&mut self, url: &str, body: Vec<u8>, headers: HeaderMap) -> Result<Response> {
        self.http_request(Method::PUT, url, Some(body), headers)
    }

    pub fn delete(&mut self, url: &str, headers: HeaderMap) -> Result<Response> {
        self.http_request(Method::DELETE, url, None, headers)
    }

    /// The `Authorization` value answering a Digest `challenge` for a request
    /// of `method` on `url`, with the credentials of the callback.
    ///
    /// Requests never retry with Digest on their own; callers that need it
    /// set the header themselves.
    pub fn digest_authorization(&mut self, method: &Method, url: &Url,
                                challenge: &Challenge) -> Result<String> {
        let root = url.join("/")?;
        let credentials = (self.get_auth_details)(&root, challenge.realm())
            .ok_or(Error::Unauthorized)?;
        let mut path = url.path().to_owned();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        Ok(self.digest.authorization(method.as_str(), &path, challenge, &credentials, false))
    }

    fn http_request(&mut self, method: Method, url: &str, body: Option<Vec<u8>>,
                    init_headers: HeaderMap) -> Result<Response> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.config.user_agent)?);
        for (name, value) in init_headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        let mut request = Request {
            method: method,
            url: Url::parse(url)?,
            headers: headers,
            body: body,
        };
        debug!("{} {}", request.method, request.url);
        trace!("request headers: {:?}", request.headers);
        let response = self.transport.send(&request)?;
        if response.status != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let challenge = response.header(WWW_AUTHENTICATE.as_str())
            .and_then(Challenge::parse)
            .ok_or(Error::Unauthorized)?;
        let root = request.url.join("/")?;
        let credentials = (self.get_auth_details)(&root, challenge.realm())
            .ok_or(Error::Unauthorized)?;
        if !challenge.is_scheme("basic") {
            return Err(Error::UnsupportedAuthScheme(challenge.scheme));
        }
        request.headers.insert(AUTHORIZATION,
                               HeaderValue::from_str(&credentials.basic_authorization())?);
        debug!("{} {} (retrying with Basic credentials for realm {:?})",
               request.method, request.url, challenge.realm());
        let response = self.transport.send(&request)?;
        if response.status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        Ok(response)
    }
}


#[cfg(test)]
mod test {
    use std::cell::Cell;
    use std::rc::Rc;

    use reqwest::header::{HeaderMap, HeaderValue, IF_NONE_MATCH};
    use reqwest::{Method, StatusCode};
    use url::Url;

    use super::{Challenge, Client, ClientConfig, Credentials, Error};
    use crate::test_utils::FakeTransport;

    fn client(config: ClientConfig) -> Client<FakeTransport> {
        Client::with_transport(FakeTransport::new(), config)
    }

    #[test]
    fn test_plain_request() {
        let mut client = client(ClientConfig {
            user_agent: "tester/1".to_owned(),
            ..Default::default()
        });
        client.transport().reply(200, &[("Content-Type", "text/plain")], "hello");
        let mut headers = HeaderMap::new();
        headers.insert(IF_NONE_MATCH, HeaderValue::from_static("\"xyzzy\""));
        let response = unwrap!(client.get("http://example.org/feed", headers));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"hello");
        assert_eq!(response.header("content-type"), Some("text/plain"));
        let sent = client.transport().recorded();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].header("user-agent"), Some("tester/1"));
        assert_eq!(sent[0].header("if-none-match"), Some("\"xyzzy\""));
        assert_eq!(sent[0].header("authorization"), None);
    }

    #[test]
    fn test_basic_auth_retry() {
        let mut client = client(Default::default());
        let asked = Rc::new(Cell::new(0));
        let counter = asked.clone();
        client.when_auth(move |url, realm| {
            counter.set(counter.get() + 1);
            assert_eq!(url.as_str(), "http://example.org/");
            assert_eq!(realm, Some("atom"));
            Some(Credentials::new("Aladdin", "open sesame"))
        });
        client.transport().reply(401, &[("WWW-Authenticate", "Basic realm=\"atom\"")], "");
        client.transport().reply(201, &[], "created");
        let response = unwrap!(client.post("http://example.org/collection/x", b"<entry/>".to_vec(),
                                           HeaderMap::new()));
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(asked.get(), 1);
        let sent = client.transport().recorded();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].header("authorization"), None);
        assert_eq!(sent[1].method, Method::POST);
        assert_eq!(sent[1].header("authorization"), Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="));
    }

    #[test]
    fn test_default_callback_uses_config() {
        let mut client = client(ClientConfig {
            user: Some("joe".to_owned()),
            pass: Some("secret".to_owned()),
            ..Default::default()
        });
        client.transport().reply(401, &[("WWW-Authenticate", "Basic realm=\"r\"")], "");
        client.transport().reply(204, &[], "");
        let response = unwrap!(client.delete("http://example.org/x", HeaderMap::new()));
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        let sent = client.transport().recorded();
        assert_eq!(sent[1].header("authorization"), Some("Basic am9lOnNlY3JldA=="));
    }

    #[test]
    fn test_no_credentials() {
        let mut client = client(Default::default());
        client.transport().reply(401, &[("WWW-Authenticate", "Basic realm=\"r\"")], "");
        assert_err!(client.get("http://example.org/", HeaderMap::new()),
                    Error::Unauthorized => { });
        assert_eq!(client.transport().recorded().len(), 1);
    }

    #[test]
    fn test_missing_challenge() {
        let mut client = client(ClientConfig {
            user: Some("joe".to_owned()),
            pass: Some("secret".to_owned()),
            ..Default::default()
        });
        client.transport().reply(401, &[], "");
        assert_err!(client.get("http://example.org/", HeaderMap::new()),
                    Error::Unauthorized => { });
    }

    #[test]
    fn test_unsupported_scheme() {
        let mut client = client(Default::default());
        client.when_auth(|_, _| Some(Credentials::new("u", "p")));
        client.transport().reply(401, &[("WWW-Authenticate",
                                         "Digest realm=\"r\", nonce=\"abc\", qop=\"auth\"")], "");
        assert_err!(client.put("http://example.org/x", Vec::new(), HeaderMap::new()),
                    Error::UnsupportedAuthScheme(scheme) => {
            assert_eq!(scheme, "Digest");
        });
        assert_eq!(client.transport().recorded().len(), 1);
    }

    #[test]
    fn test_credentials_refused() {
        let mut client = client(Default::default());
        client.when_auth(|_, _| Some(Credentials::new("u", "wrong")));
        client.transport().reply(401, &[("WWW-Authenticate", "Basic realm=\"r\"")], "");
        client.transport().reply(401, &[("WWW-Authenticate", "Basic realm=\"r\"")], "");
        assert_err!(client.get("http://example.org/", HeaderMap::new()),
                    Error::Unauthorized => { });
        assert_eq!(client.transport().recorded().len(), 2);
    }

    #[test]
    fn test_invalid_url() {
        let mut client = client(Default::default());
        assert_err!(client.get("not a url", HeaderMap::new()), Error::InvalidUrl(_) => { });
        assert!(client.transport().recorded().is_empty());
    }

    #[test]
    fn test_digest_authorization() {
        let mut client = client(Default::default());
        client.when_auth(|url, realm| {
            assert_eq!(url.as_str(), "http://example.org/");
            assert_eq!(realm, Some("testrealm@host.com"));
            Some(Credentials::new("Mufasa", "Circle Of Life"))
        });
        let challenge = Challenge::parse(
            "Digest realm=\"testrealm@host.com\", qop=\"auth\", nonce=\"abc\"").unwrap();
        let url = Url::parse("http://example.org/dir/index.html?x=1").unwrap();
        let first = unwrap!(client.digest_authorization(&Method::GET, &url, &challenge));
        assert!(first.contains("uri=\"/dir/index.html?x=1\""));
        assert!(first.contains("nc=00000001"));
        let second = unwrap!(client.digest_authorization(&Method::GET, &url, &challenge));
        assert!(second.contains("nc=00000002"));
    }
}
