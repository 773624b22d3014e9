//! Pluggable HTTP execution.
//!
//! The core never opens sockets itself: an [`HttpTransport`] executes the
//! `HttpRequest` built by [`crate::client::ObserverClient`] and hands back
//! the raw response. Any status code, 4xx and 5xx included, is a response;
//! only the absence of a response is an error.

use std::future::Future;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes requests asynchronously.
///
/// The returned future is `Send` so it can be polled on any executor thread.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

#[cfg(feature = "reqwest-client")]
pub use reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest-client")]
mod reqwest_transport {
    use crate::config::ClientConfig;
    use crate::error::TransportError;
    use crate::http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, PartContent};

    use super::HttpTransport;

    /// An [`HttpTransport`] backed by [`reqwest`].
    #[derive(Debug, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
            let client = reqwest::Client::builder()
                .timeout(config.timeout)
                .user_agent(config.user_agent.as_str())
                .build()
                .map_err(map_reqwest_error)?;
            Ok(Self { client })
        }

        pub fn from_client(client: reqwest::Client) -> Self {
            Self { client }
        }
    }

    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
            };
            let mut builder = self.client.request(method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            builder = match request.body {
                HttpBody::Empty => builder,
                HttpBody::Json(json) => builder.body(json),
                HttpBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
            };

            let response = builder.send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_string(), value.to_string()))
                })
                .collect();
            let body = response.bytes().await.map_err(map_reqwest_error)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    fn multipart_form(
        parts: Vec<crate::http::MultipartPart>,
    ) -> Result<reqwest::multipart::Form, TransportError> {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            form = match part.content {
                PartContent::Text(value) => form.text(part.name, value),
                PartContent::File {
                    file_name,
                    mime_type,
                    data,
                } => {
                    let file = reqwest::multipart::Part::bytes(data.to_vec())
                        .file_name(file_name)
                        .mime_str(&mime_type)
                        .map_err(map_reqwest_error)?;
                    form.part(part.name, file)
                }
            };
        }
        Ok(form)
    }

    fn map_reqwest_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}
