//! Static descriptors for every observer API operation.

use crate::http::{HttpBody, HttpMethod};

/// Kind of body an endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    None,
    Json,
    Multipart,
}

impl BodyKind {
    pub fn of(body: &HttpBody) -> Self {
        match body {
            HttpBody::Empty => Self::None,
            HttpBody::Json(_) => Self::Json,
            HttpBody::Multipart(_) => Self::Multipart,
        }
    }
}

/// Method, path and auth requirements of one logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub path: &'static str,
    pub method: HttpMethod,
    pub requires_auth: bool,
    pub body_kind: BodyKind,
}

impl Endpoint {
    /// Absolute URL of this endpoint under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{base_url}{}", self.path)
    }

    /// Absolute URL with one trailing path segment, e.g. `/v1/form/7`.
    pub fn url_with_id(&self, base_url: &str, id: i64) -> String {
        format!("{base_url}{}/{id}", self.path)
    }
}

pub const LOGIN: Endpoint = Endpoint {
    path: "/v1/access/authorize",
    method: HttpMethod::Post,
    requires_auth: false,
    body_kind: BodyKind::Json,
};

pub const POLLING_STATIONS: Endpoint = Endpoint {
    path: "/v1/polling-station",
    method: HttpMethod::Get,
    requires_auth: true,
    body_kind: BodyKind::None,
};

pub const FORMS: Endpoint = Endpoint {
    path: "/v1/form",
    method: HttpMethod::Get,
    requires_auth: true,
    body_kind: BodyKind::None,
};

/// Path is completed with the form id.
pub const FORM_SECTIONS: Endpoint = Endpoint {
    path: "/v1/form",
    method: HttpMethod::Get,
    requires_auth: true,
    body_kind: BodyKind::None,
};

pub const UPDATE_POLLING_STATION: Endpoint = Endpoint {
    path: "/v1/polling-station",
    method: HttpMethod::Post,
    requires_auth: true,
    body_kind: BodyKind::Json,
};

pub const UPLOAD_NOTE: Endpoint = Endpoint {
    path: "/v1/note/upload",
    method: HttpMethod::Post,
    requires_auth: true,
    body_kind: BodyKind::Multipart,
};

pub const UPLOAD_ANSWERS: Endpoint = Endpoint {
    path: "/v1/answer",
    method: HttpMethod::Post,
    requires_auth: true,
    body_kind: BodyKind::Json,
};

/// Every endpoint, in declaration order.
pub const ALL: [Endpoint; 7] = [
    LOGIN,
    POLLING_STATIONS,
    FORMS,
    FORM_SECTIONS,
    UPDATE_POLLING_STATION,
    UPLOAD_NOTE,
    UPLOAD_ANSWERS,
];
