//! Session state: the API key and the echo operation.
//!
//! A session is built once at startup, receives its key during setup, and is
//! then shared read-only with every request handler.

use serde::{Deserialize, Serialize};

use crate::config::{HEALTH_STATUS_OK, NOT_INITIALIZED_ERROR, SERVER_MODE};
use crate::credentials::{acquire_api_key, ApiKey, CredentialError, CredentialProvider};

/// Body of `POST /query`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

/// Result of a query, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Echo {
        success: bool,
        response: String,
        provider: String,
        api_key_set: bool,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl QueryResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        QueryResponse::Failure {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            QueryResponse::Echo { success, .. } | QueryResponse::Failure { success, .. } => {
                *success
            }
        }
    }

    /// The echoed text, if any. Used for response logging.
    pub fn response_text(&self) -> &str {
        match self {
            QueryResponse::Echo { response, .. } => response,
            QueryResponse::Failure { .. } => "",
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub initialized: bool,
    pub provider: String,
    pub mode: String,
}

/// The server's single API key record.
#[derive(Debug, Clone)]
pub struct Session {
    provider: String,
    api_key: Option<ApiKey>,
}

impl Session {
    /// Creates an uninitialized session for the given provider.
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key: None,
        }
    }

    /// Creates a session that already holds a key.
    pub fn with_key(provider: impl Into<String>, key: ApiKey) -> Self {
        Self {
            provider: provider.into(),
            api_key: Some(key),
        }
    }

    /// Obtain a key from the first provider that has one and mark the session
    /// initialized. Returns the label of the source that supplied the key.
    pub fn setup_key(
        &mut self,
        providers: &mut [Box<dyn CredentialProvider>],
    ) -> Result<&'static str, CredentialError> {
        let (key, source) = acquire_api_key(providers)?;
        tracing::info!(
            provider = %self.provider,
            source,
            key = %key.preview(),
            "API key set for this session"
        );
        self.api_key = Some(key);
        Ok(source)
    }

    pub fn is_initialized(&self) -> bool {
        self.api_key.is_some()
    }

    /// Return the query unchanged inside a success envelope, or the
    /// not-initialized failure if no key has been set up.
    pub fn echo(&self, query: String) -> QueryResponse {
        match &self.api_key {
            Some(key) => QueryResponse::Echo {
                success: true,
                response: query,
                provider: self.provider.clone(),
                api_key_set: !key.is_empty(),
            },
            None => QueryResponse::failure(NOT_INITIALIZED_ERROR),
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: HEALTH_STATUS_OK.to_string(),
            initialized: self.is_initialized(),
            provider: self.provider.clone(),
            mode: SERVER_MODE.to_string(),
        }
    }
}
