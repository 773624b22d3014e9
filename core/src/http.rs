//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! builder in [`crate::client`] produces `HttpRequest` values and the
//! interpreter consumes `HttpResponse` values without touching the network;
//! an [`crate::transport::HttpTransport`] implementation performs the I/O.
//!
//! Multipart bodies are kept as a list of named parts rather than encoded
//! bytes, so the transport picks the boundary and tests can inspect each part.

use std::fmt;

use bytes::Bytes;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a single multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartContent {
    /// A UTF-8 text field.
    Text(String),
    /// A binary attachment.
    File {
        file_name: String,
        mime_type: String,
        data: Bytes,
    },
}

/// A named part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    pub content: PartContent,
}

impl MultipartPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            content: PartContent::Text(value.into()),
        }
    }

    pub fn file(name: &str, file_name: &str, mime_type: &str, data: Bytes) -> Self {
        Self {
            name: name.to_string(),
            content: PartContent::File {
                file_name: file_name.to_string(),
                mime_type: mime_type.to_string(),
                data,
            },
        }
    }

    /// The text value of this part, if it is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            PartContent::Text(value) => Some(value),
            PartContent::File { .. } => None,
        }
    }
}

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpBody {
    Empty,
    /// Pre-encoded JSON document.
    Json(String),
    Multipart(Vec<MultipartPart>),
}

impl HttpBody {
    pub fn is_empty(&self) -> bool {
        matches!(self, HttpBody::Empty)
    }

    pub fn as_json(&self) -> Option<&str> {
        match self {
            HttpBody::Json(json) => Some(json),
            _ => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&[MultipartPart]> {
        match self {
            HttpBody::Multipart(parts) => Some(parts),
            _ => None,
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ObserverClient::build_*` methods. Header names are lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: HttpBody,
}

impl HttpRequest {
    /// Look up a header value by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Produced by the transport after executing an `HttpRequest`, then passed
/// to the interpreter. An empty `body` means the server sent no data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}
