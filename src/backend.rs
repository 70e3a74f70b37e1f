//! Backend query service client.
//!
//! Defines the contact record shape, the typed fetch failure, the
//! [`ContactFetcher`] capability the controller's host runs fetches through,
//! and the HTTP implementation against the CRM API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

/// Fallback shown to the user when a failure carries no message of its own.
pub const GENERIC_FETCH_ERROR: &str = "An unexpected error occurred.";

/// One contact as returned by the backend. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Name of the contact's primary account.
    #[serde(default)]
    pub account_name: String,
}

/// Why a contact fetch failed.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The backend answered with a structured error body.
    #[error("backend error: {message}")]
    Backend { message: String },
    /// The request never produced a usable response (connection, timeout,
    /// malformed body).
    #[error("request failed: {0}")]
    Transport(String),
}

impl FetchError {
    /// The message to surface to the user: the structured backend message
    /// when present, else the failure's own text, else a generic fallback.
    pub fn user_message(&self) -> String {
        let message = match self {
            FetchError::Backend { message } => message,
            FetchError::Transport(message) => message,
        };
        if message.trim().is_empty() {
            GENERIC_FETCH_ERROR.to_string()
        } else {
            message.clone()
        }
    }
}

/// Capability for fetching the contacts attached to one account.
///
/// An empty search term means "no filter". Implementations must preserve the
/// backend's record order.
#[async_trait]
pub trait ContactFetcher: Send + Sync {
    async fn fetch_contacts(
        &self,
        account_id: &str,
        search_term: &str,
    ) -> Result<Vec<ContactRecord>, FetchError>;
}

/// Structured error body the CRM API returns on failed requests.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for the CRM contacts API.
pub struct HttpContactFetcher {
    http_client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpContactFetcher {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into(),
            token,
        }
    }

    fn contacts_url(&self, account_id: &str) -> String {
        format!(
            "{}/accounts/{}/contacts",
            self.base_url.trim_end_matches('/'),
            account_id
        )
    }
}

#[async_trait]
impl ContactFetcher for HttpContactFetcher {
    async fn fetch_contacts(
        &self,
        account_id: &str,
        search_term: &str,
    ) -> Result<Vec<ContactRecord>, FetchError> {
        let url = self.contacts_url(account_id);
        info!("GET {} (search: {:?})", url, search_term);

        let mut request = self
            .http_client
            .get(&url)
            .header("User-Agent", "rolodex")
            .header("Accept", "application/json");
        if !search_term.is_empty() {
            request = request.query(&[("search", search_term)]);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!("Contact request failed to send: {}", e);
            FetchError::Transport(e.to_string())
        })?;

        let status = response.status();
        debug!("Contact response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Contact fetch error ({}): {}", status, body);
            // Prefer the structured message when the backend sent one.
            let message = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => parsed.message,
                Err(_) => format!("Contact service returned {}", status),
            };
            return Err(FetchError::Backend { message });
        }

        let records: Vec<ContactRecord> = response.json().await.map_err(|e| {
            error!("Failed to parse contact response: {}", e);
            FetchError::Transport(e.to_string())
        })?;

        debug!("Fetched {} contacts for account {}", records.len(), account_id);
        Ok(records)
    }
}
