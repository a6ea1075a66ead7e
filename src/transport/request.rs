use crate::utils::error::{FanoutError, Result};
use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

/// Request descriptor.
///
/// Cheap to clone so a retried request is re-sent byte-for-byte.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Request with no headers and no body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// GET request for an absolute URL
    pub fn get(url: &str) -> Result<Self> {
        Ok(Self::new(Method::GET, Url::parse(url)?))
    }

    /// POST with a JSON-encoded body and a matching content type
    pub fn post_json<B: Serialize + ?Sized>(url: &str, body: &B) -> Result<Self> {
        let payload = serde_json::to_vec(body)?;
        let mut request = Self::new(Method::POST, Url::parse(url)?).with_body(payload);
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(request)
    }

    /// Add or replace a header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            FanoutError::invalid_request(format!("Invalid header name '{}': {}", name, e))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            FanoutError::invalid_request(format!("Invalid header value for '{}': {}", name, e))
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Set the raw request body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }
}
