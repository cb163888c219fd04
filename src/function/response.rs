//! Outbound response model produced by the function
//!
//! A small builder keyed by status code, converted into a hyper response by the host adapter.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::{Response, StatusCode};

#[derive(Debug, Clone)]
pub struct HttpResponseMessage {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl HttpResponseMessage {
    pub fn builder(status: StatusCode) -> HttpResponseMessageBuilder {
        HttpResponseMessageBuilder {
            status,
            headers: HeaderMap::new(),
            body: String::new(),
        }
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[derive(Debug)]
pub struct HttpResponseMessageBuilder {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl HttpResponseMessageBuilder {
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> HttpResponseMessage {
        HttpResponseMessage {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}
