//! HTTP transport
//!
//! The batch engine only needs one primitive from the network layer: send a
//! request descriptor, get back a status code and a readable body stream.
//! [`Transport`] is that seam; [`ReqwestTransport`] is the production
//! implementation.

pub mod request;
pub mod reqwest_transport;
pub mod response;

pub use request::HttpRequest;
pub use reqwest_transport::{ReqwestTransport, TransportConfig};
pub use response::{BodyStream, HttpResponse};

use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A single request/response exchange.
///
/// An `Err` means no response was obtained at all (connection refused, DNS,
/// TLS, timeout). Any status code, including errors, is an `Ok` response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).exchange(request).await
    }
}
