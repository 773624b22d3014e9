//! API communication layer for the election observer application.
//!
//! # Overview
//! Builds requests for the observer API (login, polling stations, forms,
//! form sections, and uploads of station updates, notes and answers),
//! injects the bearer credential, and classifies every outcome into a typed
//! result or one [`ApiError`] variant.
//!
//! # Design
//! - `ObserverClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes the transport outcome (host-does-IO pattern).
//! - `Session` is the caller-owned credential context; nothing is global.
//! - `HttpTransport` is the I/O seam; `ReqwestTransport` is the default.
//! - `ObserverApi` is the async surface, implemented by `ApiClient` and by
//!   `FakeApi` for tests.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod fake;
pub mod http;
pub mod interpret;
pub mod outbox;
pub mod session;
pub mod timestamp;
pub mod transport;
pub mod types;

pub use api::{ApiClient, ObserverApi};
pub use client::ObserverClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, TransportError};
pub use fake::FakeApi;
pub use http::{HttpBody, HttpMethod, HttpRequest, HttpResponse, MultipartPart, PartContent};
pub use outbox::{flush_pending, FlushReport, PendingUpload};
pub use session::{Credential, CredentialStore, MemoryCredentialStore, Session};
#[cfg(feature = "reqwest-client")]
pub use transport::ReqwestTransport;
pub use timestamp::Timestamp;
pub use transport::HttpTransport;
pub use types::{
    Answer, AnswerBatch, AnswerOption, FormDefinition, FormList, FormSection, LoginRequest,
    LoginResponse, Note, PollingStation, PollingStationUpdate, Question, QuestionOption,
};
