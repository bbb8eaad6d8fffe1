use std::fmt;
use std::time::Duration;

/// Settings of an HTTP [`Client`](struct.Client.html).
///
/// ```
/// use atom_sync::http::ClientConfig;
///
/// let config = ClientConfig {
///     user: Some("joe".to_owned()),
///     pass: Some("secret".to_owned()),
///     ..Default::default()
/// };
/// assert!(config.user_agent.starts_with("atom-sync/"));
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// Sent as `User-Agent` with every request.
    pub user_agent: String,
    /// Applies to the whole of each request; `None` waits forever.
    pub timeout: Option<Duration>,
    /// Credentials offered by the default authentication callback.
    pub user: Option<String>,
    pub pass: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            user_agent: concat!("atom-sync/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: Some(Duration::from_secs(30)),
            user: None,
            pass: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("user", &self.user)
            .field("pass", &self.pass.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
