//! Asynchronous observer API surface.
//!
//! # Design
//! [`ObserverApi`] is the capability set the rest of the application talks
//! to. [`ApiClient`] implements it over any [`HttpTransport`];
//! [`crate::fake::FakeApi`] implements it for tests.
//!
//! Every method returns a future that resolves exactly once, to either the
//! typed result or an [`ApiError`]. The futures are `Send` and make no
//! assumption about which thread polls them. Nothing is retried or
//! deduplicated here; uploads may be called again for the same record.

use std::future::Future;

use tracing::Instrument;

use crate::client::ObserverClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::interpret::Outcome;
use crate::session::{Credential, Session};
use crate::transport::HttpTransport;
use crate::types::{
    AnswerBatch, FormDefinition, FormSection, LoginRequest, Note, PollingStation,
    PollingStationUpdate,
};

pub trait ObserverApi: Send + Sync {
    /// Exchange phone number and PIN for an access token. On success the
    /// token is stored in the session and the new credential is returned.
    fn login(
        &self,
        phone: &str,
        pin: &str,
    ) -> impl Future<Output = Result<Credential, ApiError>> + Send;

    fn fetch_polling_stations(
        &self,
    ) -> impl Future<Output = Result<Vec<PollingStation>, ApiError>> + Send;

    fn fetch_forms(&self) -> impl Future<Output = Result<Vec<FormDefinition>, ApiError>> + Send;

    fn fetch_form_sections(
        &self,
        form_id: i64,
    ) -> impl Future<Output = Result<Vec<FormSection>, ApiError>> + Send;

    fn upload_polling_station(
        &self,
        update: &PollingStationUpdate,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn upload_note(&self, note: &Note) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn upload_answers(
        &self,
        answers: &AnswerBatch,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// [`ObserverApi`] over a real transport.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    client: ObserverClient,
    session: Session,
    transport: T,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(config: &ClientConfig, session: Session, transport: T) -> Self {
        Self {
            client: ObserverClient::new(&config.base_url),
            session,
            transport,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn execute(&self, request: HttpRequest) -> Outcome {
        let span = tracing::debug_span!(
            "observer_request",
            method = %request.method,
            url = %request.url
        );
        async {
            tracing::debug!("sending request");
            let outcome = self.transport.send(request).await;
            match &outcome {
                Ok(response) => tracing::debug!(status = response.status, "response received"),
                Err(err) => tracing::debug!(error = %err, "transport failed"),
            }
            outcome
        }
        .instrument(span)
        .await
    }
}

#[cfg(feature = "reqwest-client")]
impl ApiClient<crate::transport::ReqwestTransport> {
    /// Client with the default reqwest transport.
    pub fn with_reqwest(
        config: &ClientConfig,
        session: Session,
    ) -> Result<Self, crate::error::TransportError> {
        let transport = crate::transport::ReqwestTransport::new(config)?;
        Ok(Self::new(config, session, transport))
    }
}

impl<T: HttpTransport> ObserverApi for ApiClient<T> {
    async fn login(&self, phone: &str, pin: &str) -> Result<Credential, ApiError> {
        let input = LoginRequest {
            user: phone.to_string(),
            password: pin.to_string(),
            unique_id: self.session.device_id().to_string(),
        };
        let request = self.client.build_login(&input);
        let token = self.client.parse_login(self.execute(request).await)?;

        self.session.store_token(token);
        tracing::info!(device_id = self.session.device_id(), "login succeeded");
        Ok(self.session.credential())
    }

    async fn fetch_polling_stations(&self) -> Result<Vec<PollingStation>, ApiError> {
        let request = self
            .client
            .build_list_polling_stations(&self.session.credential());
        self.client
            .parse_list_polling_stations(self.execute(request).await)
    }

    async fn fetch_forms(&self) -> Result<Vec<FormDefinition>, ApiError> {
        let request = self.client.build_list_forms(&self.session.credential());
        self.client.parse_list_forms(self.execute(request).await)
    }

    async fn fetch_form_sections(&self, form_id: i64) -> Result<Vec<FormSection>, ApiError> {
        let request = self
            .client
            .build_form_sections(&self.session.credential(), form_id);
        self.client.parse_form_sections(self.execute(request).await)
    }

    async fn upload_polling_station(&self, update: &PollingStationUpdate) -> Result<(), ApiError> {
        let request = self
            .client
            .build_update_polling_station(&self.session.credential(), update);
        self.client.parse_upload(self.execute(request).await)
    }

    async fn upload_note(&self, note: &Note) -> Result<(), ApiError> {
        let request = self.client.build_upload_note(&self.session.credential(), note);
        self.client.parse_upload(self.execute(request).await)
    }

    async fn upload_answers(&self, answers: &AnswerBatch) -> Result<(), ApiError> {
        let request = self
            .client
            .build_upload_answers(&self.session.credential(), answers);
        self.client.parse_upload(self.execute(request).await)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::error::TransportError;
    use crate::http::HttpResponse;
    use crate::session::MemoryCredentialStore;

    /// Transport that replays canned outcomes and records requests.
    #[derive(Default)]
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Outcome>>,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn replying(outcomes: Vec<Outcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpTransport for Arc<ScriptedTransport> {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.lock().push(request);
            self.outcomes
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Other("no scripted outcome".into())))
        }
    }

    type ScriptedApi = ApiClient<Arc<ScriptedTransport>>;

    fn api(outcomes: Vec<Outcome>) -> (ScriptedApi, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport::replying(outcomes));
        let session = Session::new("device-1", Arc::new(MemoryCredentialStore::new()));
        let config = ClientConfig::new("http://api.test");
        (ApiClient::new(&config, session, transport.clone()), transport)
    }

    #[tokio::test]
    async fn login_stores_token_and_later_calls_send_it() {
        let (api, transport) = api(vec![
            Ok(HttpResponse::new(200, r#"{"access_token":"fresh"}"#)),
            Ok(HttpResponse::new(200, "[]")),
        ]);

        let credential = api.login("0722", "1234").await.unwrap();
        assert_eq!(credential.access_token.as_deref(), Some("fresh"));
        assert!(api.fetch_polling_stations().await.unwrap().is_empty());

        let sent = transport.sent.lock();
        assert_eq!(sent[0].header("authorization"), None);
        let login_body: serde_json::Value =
            serde_json::from_str(sent[0].body.as_json().unwrap()).unwrap();
        assert_eq!(login_body["uniqueId"], "device-1");
        assert_eq!(sent[1].header("authorization"), Some("Bearer fresh"));
    }

    #[tokio::test]
    async fn rejected_login_keeps_previous_credential() {
        let (api, _) = api(vec![Ok(HttpResponse::new(200, r#"{"error":"wrong pin"}"#))]);
        api.session().store_token("old".to_string());

        let err = api.login("0722", "0000").await.unwrap_err();
        assert_eq!(err, ApiError::login_failed("wrong pin"));
        assert_eq!(api.session().credential().access_token.as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn fetch_without_token_sends_no_authorization() {
        let (api, transport) = api(vec![Ok(HttpResponse::new(401, ""))]);
        assert_eq!(api.fetch_forms().await.unwrap_err(), ApiError::Unauthorized);
        assert!(transport.sent.lock()[0].headers.is_empty());
    }

    #[tokio::test]
    async fn upload_with_server_error_is_malformed() {
        let (api, _) = api(vec![Ok(HttpResponse::new(500, "oops"))]);
        let err = api
            .upload_answers(&AnswerBatch { answers: Vec::new() })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::malformed("unknown reason (code: 500)"));
    }

    #[tokio::test]
    async fn offline_transport_is_generic() {
        let (api, _) = api(vec![Err(TransportError::Connection("network down".into()))]);
        let err = api.fetch_form_sections(1).await.unwrap_err();
        assert_eq!(err, ApiError::generic("connection failed: network down"));
    }

    #[tokio::test]
    async fn futures_can_run_on_spawned_tasks() {
        let (api, _) = api(vec![Ok(HttpResponse::new(200, "[]"))]);
        let api = Arc::new(api);
        let task = tokio::spawn({
            let api = api.clone();
            async move { api.fetch_form_sections(3).await }
        });
        assert_eq!(task.await.unwrap().unwrap(), Vec::new());
    }
}
