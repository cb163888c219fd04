//! Inbound request model handed to the function
//!
//! Mirrors what the Functions host exposes for an HTTP trigger: method, absolute
//! URI, decoded query parameters, headers and an optional raw body.

use hyper::body::Bytes;
use hyper::header::{HeaderMap, CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use hyper::http::request::Parts;
use hyper::http::uri::PathAndQuery;
use hyper::{Method, Uri};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

/// Read-only view of one HTTP trigger invocation
#[derive(Debug, Clone)]
pub struct HttpRequestMessage {
    method: Method,
    uri: String,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Option<String>,
}

impl HttpRequestMessage {
    pub fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Option<String>) -> Self {
        Self {
            query: parse_query(uri.query()),
            uri: absolute_uri(uri, &headers),
            method,
            headers,
            body,
        }
    }

    /// Build from hyper request parts and the collected body bytes, if the request carried one
    pub fn from_parts(parts: &Parts, body: Option<Bytes>) -> Self {
        let body = body.map(|bytes| String::from_utf8_lossy(&bytes).into_owned());
        Self::new(parts.method.clone(), &parts.uri, parts.headers.clone(), body)
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, case-insensitive; invalid UTF-8 is replaced lossily
    pub fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers
            .get(name)
            .map(|value| String::from_utf8_lossy(value.as_bytes()))
    }

    /// All headers flattened to name -> value; repeated headers are joined with ", "
    pub fn header_map(&self) -> BTreeMap<String, String> {
        let mut flat = BTreeMap::new();
        for name in self.headers.keys() {
            let joined = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            flat.insert(name.as_str().to_string(), joined);
        }
        flat
    }

    /// Raw body; `Some("")` for a request that declared an empty body
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// Whether the request declares message framing, and therefore a body (possibly empty)
pub fn declares_body(headers: &HeaderMap) -> bool {
    headers.contains_key(CONTENT_LENGTH) || headers.contains_key(TRANSFER_ENCODING)
}

/// Decode `application/x-www-form-urlencoded` query pairs; the first occurrence of a key wins
fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    params
}

/// Reconstruct the absolute URI the client addressed.
///
/// Origin-form request targets are combined with the `Host` header and the
/// scheme reported by `X-Forwarded-Proto` (defaulting to http).
fn absolute_uri(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.scheme().is_some() && uri.authority().is_some() {
        return uri.to_string();
    }

    let path_and_query = uri.path_and_query().map_or("/", PathAndQuery::as_str);
    let Some(host) = headers.get(HOST).and_then(|v| v.to_str().ok()) else {
        return path_and_query.to_string();
    };

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("http");

    format!("{scheme}://{host}{path_and_query}")
}
