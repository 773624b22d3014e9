//! Classification of transport outcomes into typed results or [`ApiError`].
//!
//! Every function here applies the same five rules:
//! 1. no response at all: `Generic` with the transport message;
//! 2. 200 with a body of the expected shape: success;
//! 3. 200 with anything else, an empty body included: `MalformedResponse`;
//! 4. 401, whatever the body: `Unauthorized`;
//! 5. any other status: `MalformedResponse("unknown reason (code: N)")`.
//!
//! The expected shape is fixed per operation through [`Envelope`], never
//! guessed from the body.

use serde::de::DeserializeOwned;

use crate::error::{ApiError, TransportError};
use crate::http::HttpResponse;
use crate::types::{FormDefinition, FormList, LoginResponse};

/// Outcome of executing one request.
pub type Outcome = Result<HttpResponse, TransportError>;

/// Response shape that yields an ordered sequence of items.
pub trait Envelope: DeserializeOwned {
    type Item;

    fn into_items(self) -> Vec<Self::Item>;
}

/// A bare JSON array.
impl<T: DeserializeOwned> Envelope for Vec<T> {
    type Item = T;

    fn into_items(self) -> Vec<T> {
        self
    }
}

/// `{"forms": [...]}`.
impl Envelope for FormList {
    type Item = FormDefinition;

    fn into_items(self) -> Vec<FormDefinition> {
        self.forms
    }
}

/// Apply rules 1, 4 and 5, returning the body of a 200 response.
fn successful_body(outcome: Outcome) -> Result<HttpResponse, ApiError> {
    let response = outcome.map_err(|err| ApiError::generic(err.to_string()))?;
    match response.status {
        200 => Ok(response),
        401 => {
            tracing::warn!("server rejected credential");
            Err(ApiError::Unauthorized)
        }
        status => {
            tracing::warn!(status, "unexpected response status");
            Err(ApiError::unexpected_status(status))
        }
    }
}

/// Decode a 200 response body into `T`.
pub fn interpret_json<T: DeserializeOwned>(outcome: Outcome) -> Result<T, ApiError> {
    let response = successful_body(outcome)?;
    serde_json::from_slice(&response.body).map_err(|err| ApiError::malformed(err.to_string()))
}

/// Decode a 200 response in shape `E` and unwrap its items.
pub fn interpret_items<E: Envelope>(outcome: Outcome) -> Result<Vec<E::Item>, ApiError> {
    interpret_json::<E>(outcome).map(Envelope::into_items)
}

/// Upload variant: a 200 is success and the body is ignored.
pub fn interpret_ack(outcome: Outcome) -> Result<(), ApiError> {
    successful_body(outcome).map(|_| ())
}

/// Reason reported when a login answer carries neither a token nor an error.
pub(crate) const NO_ACCESS_TOKEN: &str = "no access token";

/// Login has its own rules because it runs before any credential exists.
///
/// The status code is not consulted: the body decides. An empty or
/// whitespace-only body is `LoginFailed("no data")`, an undecodable one is
/// `MalformedResponse`, and a decoded body without a non-empty token is
/// `LoginFailed` with the server's message. On success the token is returned.
pub fn interpret_login(outcome: Outcome) -> Result<String, ApiError> {
    let response = outcome.map_err(|err| ApiError::generic(err.to_string()))?;
    if response.body.trim_ascii().is_empty() {
        return Err(ApiError::login_failed("no data"));
    }
    let decoded: LoginResponse = serde_json::from_slice(&response.body)
        .map_err(|err| ApiError::malformed(err.to_string()))?;
    match decoded.access_token {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ApiError::login_failed(
            decoded.error.unwrap_or_else(|| NO_ACCESS_TOKEN.to_string()),
        )),
    }
}
