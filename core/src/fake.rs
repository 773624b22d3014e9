//! In-memory [`ObserverApi`] for tests of code that consumes the API.
//!
//! Each operation pops the next scripted result from its own queue; an empty
//! queue yields `Generic("no scripted response")`. Calls are recorded so tests
//! can assert what was uploaded. A scripted login success stores its token in
//! the fake's [`Session`], like the real client; an empty token is refused.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::api::ObserverApi;
use crate::error::ApiError;
use crate::interpret::NO_ACCESS_TOKEN;
use crate::session::{Credential, Session};
use crate::types::{
    AnswerBatch, FormDefinition, FormSection, Note, PollingStation, PollingStationUpdate,
};

/// One recorded call on a [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    Login { phone: String },
    FetchPollingStations,
    FetchForms,
    FetchFormSections { form_id: i64 },
    UploadPollingStation(PollingStationUpdate),
    UploadNote(Note),
    UploadAnswers(AnswerBatch),
}

#[derive(Default)]
struct Script {
    logins: VecDeque<Result<String, ApiError>>,
    polling_stations: VecDeque<Result<Vec<PollingStation>, ApiError>>,
    forms: VecDeque<Result<Vec<FormDefinition>, ApiError>>,
    form_sections: VecDeque<Result<Vec<FormSection>, ApiError>>,
    uploads: VecDeque<Result<(), ApiError>>,
}

pub struct FakeApi {
    session: Session,
    script: Mutex<Script>,
    calls: Mutex<Vec<FakeCall>>,
}

fn next<T>(queue: &mut VecDeque<Result<T, ApiError>>) -> Result<T, ApiError> {
    queue
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::generic("no scripted response")))
}

impl FakeApi {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            script: Mutex::new(Script::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Queue a login outcome; `Ok` carries the token to store.
    pub fn push_login(&self, result: Result<String, ApiError>) -> &Self {
        self.script.lock().logins.push_back(result);
        self
    }

    pub fn push_polling_stations(&self, result: Result<Vec<PollingStation>, ApiError>) -> &Self {
        self.script.lock().polling_stations.push_back(result);
        self
    }

    pub fn push_forms(&self, result: Result<Vec<FormDefinition>, ApiError>) -> &Self {
        self.script.lock().forms.push_back(result);
        self
    }

    pub fn push_form_sections(&self, result: Result<Vec<FormSection>, ApiError>) -> &Self {
        self.script.lock().form_sections.push_back(result);
        self
    }

    /// Queue an outcome shared by all three upload operations.
    pub fn push_upload(&self, result: Result<(), ApiError>) -> &Self {
        self.script.lock().uploads.push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: FakeCall) {
        self.calls.lock().push(call);
    }
}

impl ObserverApi for FakeApi {
    async fn login(&self, phone: &str, _pin: &str) -> Result<Credential, ApiError> {
        self.record(FakeCall::Login {
            phone: phone.to_string(),
        });
        let token = next(&mut self.script.lock().logins)?;
        if token.is_empty() {
            return Err(ApiError::login_failed(NO_ACCESS_TOKEN));
        }
        self.session.store_token(token);
        Ok(self.session.credential())
    }

    async fn fetch_polling_stations(&self) -> Result<Vec<PollingStation>, ApiError> {
        self.record(FakeCall::FetchPollingStations);
        next(&mut self.script.lock().polling_stations)
    }

    async fn fetch_forms(&self) -> Result<Vec<FormDefinition>, ApiError> {
        self.record(FakeCall::FetchForms);
        next(&mut self.script.lock().forms)
    }

    async fn fetch_form_sections(&self, form_id: i64) -> Result<Vec<FormSection>, ApiError> {
        self.record(FakeCall::FetchFormSections { form_id });
        next(&mut self.script.lock().form_sections)
    }

    async fn upload_polling_station(&self, update: &PollingStationUpdate) -> Result<(), ApiError> {
        self.record(FakeCall::UploadPollingStation(update.clone()));
        next(&mut self.script.lock().uploads)
    }

    async fn upload_note(&self, note: &Note) -> Result<(), ApiError> {
        self.record(FakeCall::UploadNote(note.clone()));
        next(&mut self.script.lock().uploads)
    }

    async fn upload_answers(&self, answers: &AnswerBatch) -> Result<(), ApiError> {
        self.record(FakeCall::UploadAnswers(answers.clone()));
        next(&mut self.script.lock().uploads)
    }
}
