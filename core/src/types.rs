//! Domain DTOs for the observer API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates. Field
//! names follow Rust conventions and map onto the server's camelCase keys.
//! Timestamps use the canonical encoding in [`crate::timestamp`].

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Login request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Phone number of the observer.
    pub user: String,
    /// PIN received by SMS.
    pub password: String,
    /// Device identifier bound to the account.
    pub unique_id: String,
}

/// Login response body. A missing or empty `access_token` means the login
/// was rejected and `error` may explain why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, alias = "accessToken", skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A county-level polling-station group, as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingStation {
    pub id: i64,
    pub name: String,
    pub code: String,
    /// Highest polling-station number available in this group.
    #[serde(rename = "numberOfPollingStations")]
    pub limit: u32,
    #[serde(default)]
    pub diaspora: bool,
    #[serde(default)]
    pub order: i32,
}

/// Summary of an observation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: i64,
    pub code: String,
    #[serde(rename = "ver")]
    pub version: i32,
    pub description: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub diaspora: bool,
}

/// The `{"forms": [...]}` envelope returned by the form list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormList {
    pub forms: Vec<FormDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    pub unique_id: String,
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub code: String,
    pub text: String,
    /// Server-side answer kind (single choice, multiple choice, with text...).
    pub question_type: i32,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub is_free_text: bool,
}

/// Status report for the polling station the observer is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingStationUpdate {
    #[serde(rename = "idPollingStation")]
    pub polling_station_id: i64,
    #[serde(rename = "countyCode")]
    pub county_code: String,
    #[serde(rename = "urbanArea")]
    pub is_urban_area: bool,
    #[serde(rename = "observerArrivalTime", default)]
    pub arrival_time: Option<Timestamp>,
    #[serde(rename = "observerLeaveTime", default)]
    pub departure_time: Option<Timestamp>,
    #[serde(rename = "isPollingStationPresidentFemale")]
    pub is_president_female: bool,
}

/// Selected option of an answered question. `value` carries free text for
/// options that accept it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub option_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub polling_station_number: i64,
    pub county_code: String,
    pub question_id: i64,
    pub options: Vec<AnswerOption>,
}

/// Upload body for answers: `{"answers": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerBatch {
    pub answers: Vec<Answer>,
}

/// A free-text note with an optional JPEG photo. Sent as multipart, never
/// as JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub county_code: String,
    pub polling_station_id: Option<i64>,
    pub question_id: Option<i64>,
    pub text: String,
    pub image: Option<Bytes>,
}
