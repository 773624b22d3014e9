//! Credential holding and authorization-header injection.
//!
//! # Design
//! A [`Session`] is created by the application's composition root and passed
//! to whatever needs it; there is no process-wide singleton. The token lives
//! behind a [`CredentialStore`] so a platform keychain can back it. The
//! device id is fixed when the session is built.
//!
//! Reads during an in-flight login may observe either the old or the new
//! token.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

/// Durable storage for the bearer token.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: String);
    fn clear(&self);
}

/// In-process [`CredentialStore`].
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: String) {
        *self.token.write() = Some(token);
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}

/// Snapshot of the credential used to build one request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: Option<String>,
    pub device_id: String,
}

impl Credential {
    pub fn anonymous(device_id: impl Into<String>) -> Self {
        Self {
            access_token: None,
            device_id: device_id.into(),
        }
    }

    /// `authorization: Bearer <token>` when a token is held, otherwise empty.
    ///
    /// An empty set is not an error; the server decides whether the request
    /// is authorized.
    pub fn authorization_headers(&self) -> Vec<(String, String)> {
        match self.access_token.as_deref() {
            Some(token) => vec![("authorization".to_string(), format!("Bearer {token}"))],
            None => Vec::new(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("device_id", &self.device_id)
            .finish()
    }
}

/// Caller-owned authentication context shared by all operations.
#[derive(Clone)]
pub struct Session {
    device_id: Arc<str>,
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(device_id: impl Into<String>, store: Arc<dyn CredentialStore>) -> Self {
        let device_id: String = device_id.into();
        Self {
            device_id: Arc::from(device_id),
            store,
        }
    }

    /// Session with a freshly generated device id and an in-memory store.
    pub fn with_random_device_id() -> Self {
        Self::new(
            Uuid::new_v4().to_string(),
            Arc::new(MemoryCredentialStore::new()),
        )
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn credential(&self) -> Credential {
        Credential {
            access_token: self.store.get(),
            device_id: self.device_id.to_string(),
        }
    }

    pub fn authorization_headers(&self) -> Vec<(String, String)> {
        self.credential().authorization_headers()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some()
    }

    pub(crate) fn store_token(&self, token: String) {
        self.store.set(token);
    }

    pub fn logout(&self) {
        self.store.clear();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("device_id", &self.device_id)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
