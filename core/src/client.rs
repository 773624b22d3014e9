//! Stateless HTTP request builder and response parser for the observer API.
//!
//! # Design
//! `ObserverClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes the
//! transport outcome. Credentials are passed in as a [`Credential`] snapshot,
//! so building a request never reads shared state.
//!
//! JSON bodies are encoded through the sealed [`JsonPayload`] trait. Only the
//! crate's own request records implement it, and their serializers cannot
//! fail, so building a request is infallible.

use crate::endpoint::{self, BodyKind, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpBody, HttpRequest, MultipartPart};
use crate::interpret::{self, Outcome};
use crate::session::Credential;
use crate::types::{
    AnswerBatch, FormDefinition, FormList, FormSection, LoginRequest, Note, PollingStation,
    PollingStationUpdate,
};

/// Filename attached to note photos.
pub const NOTE_IMAGE_FILE_NAME: &str = "newImage.jpg";
/// MIME type attached to note photos.
pub const NOTE_IMAGE_MIME_TYPE: &str = "image/jpeg";
/// Text sent for an absent optional id in multipart bodies.
pub const ABSENT_ID: &str = "-1";

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::types::LoginRequest {}
    impl Sealed for crate::types::PollingStationUpdate {}
    impl Sealed for crate::types::AnswerBatch {}
}

/// Outgoing record that always encodes to JSON.
///
/// Implemented only for derive-serialized records made of strings, numbers,
/// booleans, sequences and canonical timestamps.
pub trait JsonPayload: serde::Serialize + sealed::Sealed {
    /// # Panics
    /// Never in practice: every implementor has an infallible serializer,
    /// which each implementor's unit test checks.
    fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(err) => unreachable!("request payload failed to encode: {err}"),
        }
    }
}

impl JsonPayload for LoginRequest {}
impl JsonPayload for PollingStationUpdate {}
impl JsonPayload for AnswerBatch {}

/// Synchronous, stateless client for the observer API.
///
/// Builds `HttpRequest` values and parses transport outcomes without
/// touching the network.
#[derive(Debug, Clone)]
pub struct ObserverClient {
    base_url: String,
}

impl ObserverClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `body` must be of the kind `endpoint` declares; the content type
    /// header is chosen from the descriptor.
    fn request(
        &self,
        endpoint: &Endpoint,
        url: String,
        credential: Option<&Credential>,
        body: HttpBody,
    ) -> HttpRequest {
        debug_assert_eq!(
            BodyKind::of(&body),
            endpoint.body_kind,
            "body does not match endpoint {}",
            endpoint.path
        );
        let mut headers = Vec::new();
        if endpoint.requires_auth {
            if let Some(credential) = credential {
                headers.extend(credential.authorization_headers());
            }
        }
        if endpoint.body_kind == BodyKind::Json {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method: endpoint.method,
            url,
            headers,
            body,
        }
    }

    fn json_request<P: JsonPayload>(
        &self,
        endpoint: &Endpoint,
        credential: Option<&Credential>,
        payload: &P,
    ) -> HttpRequest {
        let url = endpoint.url(&self.base_url);
        self.request(endpoint, url, credential, HttpBody::Json(payload.to_json()))
    }

    /// Login never carries an Authorization header.
    pub fn build_login(&self, input: &LoginRequest) -> HttpRequest {
        self.json_request(&endpoint::LOGIN, None, input)
    }

    pub fn build_list_polling_stations(&self, credential: &Credential) -> HttpRequest {
        let endpoint = &endpoint::POLLING_STATIONS;
        self.request(endpoint, endpoint.url(&self.base_url), Some(credential), HttpBody::Empty)
    }

    pub fn build_list_forms(&self, credential: &Credential) -> HttpRequest {
        let endpoint = &endpoint::FORMS;
        self.request(endpoint, endpoint.url(&self.base_url), Some(credential), HttpBody::Empty)
    }

    pub fn build_form_sections(&self, credential: &Credential, form_id: i64) -> HttpRequest {
        let endpoint = &endpoint::FORM_SECTIONS;
        let url = endpoint.url_with_id(&self.base_url, form_id);
        self.request(endpoint, url, Some(credential), HttpBody::Empty)
    }

    pub fn build_update_polling_station(
        &self,
        credential: &Credential,
        input: &PollingStationUpdate,
    ) -> HttpRequest {
        self.json_request(&endpoint::UPDATE_POLLING_STATION, Some(credential), input)
    }

    /// Text parts come first, in a fixed order; the photo, if any, is last.
    pub fn build_upload_note(&self, credential: &Credential, note: &Note) -> HttpRequest {
        let optional_id =
            |id: Option<i64>| id.map_or_else(|| ABSENT_ID.to_string(), |id| id.to_string());

        let mut parts = vec![
            MultipartPart::text("CountyCode", note.county_code.clone()),
            MultipartPart::text("PollingStationNumber", optional_id(note.polling_station_id)),
            MultipartPart::text("QuestionId", optional_id(note.question_id)),
            MultipartPart::text("Text", note.text.clone()),
        ];
        if let Some(image) = &note.image {
            parts.push(MultipartPart::file(
                "file",
                NOTE_IMAGE_FILE_NAME,
                NOTE_IMAGE_MIME_TYPE,
                image.clone(),
            ));
        }

        let endpoint = &endpoint::UPLOAD_NOTE;
        let url = endpoint.url(&self.base_url);
        self.request(endpoint, url, Some(credential), HttpBody::Multipart(parts))
    }

    pub fn build_upload_answers(
        &self,
        credential: &Credential,
        input: &AnswerBatch,
    ) -> HttpRequest {
        self.json_request(&endpoint::UPLOAD_ANSWERS, Some(credential), input)
    }

    /// Returns the access token on success.
    pub fn parse_login(&self, outcome: Outcome) -> Result<String, ApiError> {
        interpret::interpret_login(outcome)
    }

    pub fn parse_list_polling_stations(
        &self,
        outcome: Outcome,
    ) -> Result<Vec<PollingStation>, ApiError> {
        interpret::interpret_items::<Vec<PollingStation>>(outcome)
    }

    pub fn parse_list_forms(&self, outcome: Outcome) -> Result<Vec<FormDefinition>, ApiError> {
        interpret::interpret_items::<FormList>(outcome)
    }

    pub fn parse_form_sections(&self, outcome: Outcome) -> Result<Vec<FormSection>, ApiError> {
        interpret::interpret_items::<Vec<FormSection>>(outcome)
    }

    pub fn parse_upload(&self, outcome: Outcome) -> Result<(), ApiError> {
        interpret::interpret_ack(outcome)
    }
}
