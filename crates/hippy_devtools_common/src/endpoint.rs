//! Resolution of the debug socket endpoint from the hosting page location.
//!
//! The hosting page is opened as `.../devtools?ws=127.0.0.1:38989&hash=abc`
//! (or `?wss=...` behind TLS). The query parameters name the socket host and
//! the session hash; everything else is fixed identification.

use std::fmt::Display;

use url::Url;
use url::form_urlencoded;

/// Socket scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Ws,
    Wss,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Ws => "ws",
            Scheme::Wss => "wss",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identification tags attached to every socket URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointOptions {
    pub extension_name: String,
    pub role: String,
}

impl Default for EndpointOptions {
    fn default() -> Self {
        Self {
            extension_name: "react-devtools".to_string(),
            role: "react_devtools".to_string(),
        }
    }
}

/// A resolved connection target. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    /// `host[:port][/path]` exactly as given in the page query. May be empty.
    pub host: String,
    pub extension_name: String,
    pub role: String,
    /// Session identifier, empty when the page carries none.
    pub hash: String,
}

impl Endpoint {
    /// Builds an endpoint from the page location using default identification tags.
    pub fn from_location(location: &str) -> Self {
        Self::from_location_with(location, &EndpointOptions::default())
    }

    /// Builds an endpoint from the page location.
    ///
    /// `ws` (plaintext) wins over `wss` (secure). Absent parameters resolve
    /// to empty strings and an unparseable location behaves like one without
    /// any query. Hosts are not validated here.
    pub fn from_location_with(location: &str, options: &EndpointOptions) -> Self {
        let query = Url::parse(location)
            .map(|url| url.query_pairs().into_owned().collect::<Vec<_>>())
            .unwrap_or_default();
        let param = |key: &str| {
            query
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };

        let (scheme, host) = match param("ws").filter(|ws| !ws.is_empty()) {
            Some(ws) => (Scheme::Ws, ws),
            None => (Scheme::Wss, param("wss").unwrap_or_default()),
        };

        Self {
            scheme,
            host,
            extension_name: options.extension_name.clone(),
            role: options.role.clone(),
            hash: param("hash").unwrap_or_default(),
        }
    }

    fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("extensionName", &self.extension_name)
            .append_pair("role", &self.role)
            .append_pair("hash", &self.hash)
            .finish()
    }

    /// Parses the endpoint as a URL.
    ///
    /// Fails when the host from the page query is empty or malformed.
    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}://{}", self.scheme, self.host))?;
        url.set_query(Some(&self.query_string()));
        Ok(url)
    }

    /// The socket URL as a string.
    ///
    /// A host that does not parse is passed through unchanged so the socket
    /// layer reports the failure as a connection error.
    pub fn url_string(&self) -> String {
        match self.to_url() {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}://{}?{}", self.scheme, self.host, self.query_string()),
        }
    }
}

/// Resolves the socket URL for a page location.
pub fn resolve_socket_url(location: &str) -> String {
    Endpoint::from_location(location).url_string()
}
