//! HTTP authentication: `WWW-Authenticate` challenges, Basic credentials
//! (RFC 7617) and Digest responses (RFC 2617).
use std::collections::BTreeMap;
use std::fmt;

use data_encoding::BASE64;
use lazy_regex::regex;

/// A user name and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Credentials {
        Credentials { username: username.into(), password: password.into() }
    }

    /// The value of an `Authorization` header for the Basic scheme.
    pub fn basic_authorization(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64.encode(pair.as_bytes()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// The scheme and parameters of a `WWW-Authenticate` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    pub scheme: String,
    pub params: BTreeMap<String, String>,
}

impl Challenge {
    /// Parse the first challenge of a header value.  Parameter names are
    /// lowercased; quoted values are unquoted.
    pub fn parse(header: &str) -> Option<Challenge> {
        let head = regex!(r"^\s*([A-Za-z0-9!#$%&'*+.^_`|~-]+)(?:\s+(.*))?$");
        let caps = head.captures(header)?;
        let mut params = BTreeMap::new();
        if let Some(rest) = caps.get(2) {
            let param = regex!(r#"(\w+)\s*=\s*(?:"((?:[^"\\]|\\.)*)"|([^\s,"]+))"#);
            for p in param.captures_iter(rest.as_str()) {
                let value = match p.get(2) {
                    Some(quoted) => quoted.as_str().replace("\\\"", "\"").replace("\\\\", "\\"),
                    None => p.get(3).map_or(String::new(), |m| m.as_str().to_owned()),
                };
                params.entry(p[1].to_ascii_lowercase()).or_insert(value);
            }
        }
        Some(Challenge { scheme: caps[1].to_owned(), params: params })
    }

    pub fn is_scheme(&self, scheme: &str) -> bool {
        self.scheme.eq_ignore_ascii_case(scheme)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|v| &v[..])
    }

    pub fn realm(&self) -> Option<&str> {
        self.param("realm")
    }
}

fn hex_md5(data: &str) -> String {
    format!("{:x}", md5::compute(data.as_bytes()))
}

/// Digest authentication state: a client nonce fixed for the life of the
/// state, and the count of nonces sent with it.
#[derive(Clone, Debug)]
pub struct DigestAuth {
    cnonce: String,
    nonce_count: u32,
}

impl DigestAuth {
    pub fn new() -> DigestAuth {
        DigestAuth::with_cnonce(hex_md5(&format!("{:x}", rand::random::<u64>())))
    }

    pub fn with_cnonce<T: Into<String>>(cnonce: T) -> DigestAuth {
        DigestAuth { cnonce: cnonce.into(), nonce_count: 0 }
    }

    pub fn cnonce(&self) -> &str {
        &self.cnonce
    }

    pub fn nonce_count(&self) -> u32 {
        self.nonce_count
    }

    /// The value of an `Authorization` header answering `challenge` for a
    /// request of `method` on `path`.  Each call counts one nonce use.
    ///
    /// `qop` is `auth` when the server offers it, otherwise the first option
    /// it lists.  Some servers (IIS) want it quoted; `quote_qop` does that.
    pub fn authorization(&mut self, method: &str, path: &str, challenge: &Challenge,
                         credentials: &Credentials, quote_qop: bool) -> String {
        self.nonce_count += 1;
        let realm = challenge.realm().unwrap_or("");
        let nonce = challenge.param("nonce").unwrap_or("");
        let offered = challenge.param("qop").unwrap_or("auth");
        let qop = if offered.split(',').any(|q| q.trim() == "auth") {
            "auth"
        } else {
            offered.split(',').next().map_or("auth", str::trim)
        };
        let nc = format!("{:08x}", self.nonce_count);

        let ha1 = hex_md5(&format!("{}:{}:{}", credentials.username, realm, credentials.password));
        let ha2 = hex_md5(&format!("{}:{}", method, path));
        let response = hex_md5(&format!("{}:{}:{}:{}:{}:{}",
                                        ha1, nonce, nc, self.cnonce, qop, ha2));

        let qop = if quote_qop { format!("\"{}\"", qop) } else { qop.to_owned() };
        let mut header = format!(
            "Digest username=\"{}\", realm=\"{}\", qop={}, uri=\"{}\", nonce=\"{}\", \
             nc={}, cnonce=\"{}\", response=\"{}\"",
            credentials.username, realm, qop, path, nonce, nc, self.cnonce, response);
        if let Some(opaque) = challenge.param("opaque") {
            header.push_str(&format!(", opaque=\"{}\"", opaque));
        }
        header
    }
}

impl Default for DigestAuth {
    fn default() -> DigestAuth { DigestAuth::new() }
}
