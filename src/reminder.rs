//! Reminder-service client.
//!
//! Posts the assembled submission as JSON. The service schedules one
//! SMS per dose; its acknowledgment body is kept opaque because the
//! flow only needs success or failure.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::submission::ReminderSubmission;

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Reminder service is unreachable at {0}")]
    Connection(String),

    #[error("Reminder request timed out after {0}s")]
    Timeout(u64),

    #[error("Reminder service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

/// Seam for the reminder submission call.
pub trait ReminderApi {
    /// Register reminders for every scheduled medication.
    fn set_reminders(&self, submission: &ReminderSubmission)
        -> Result<ReminderAck, ReminderError>;
}

/// Opaque acknowledgment from the reminder service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderAck {
    pub raw: serde_json::Value,
}

// ──────────────────────────────────────────────
// ReminderClient
// ──────────────────────────────────────────────

/// HTTP client for the reminder service.
pub struct ReminderClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl ReminderClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client for the configured service endpoint.
    pub fn default_remote() -> Self {
        Self::new(&config::api_base_url(), config::DEFAULT_TIMEOUT_SECS)
    }
}

impl ReminderApi for ReminderClient {
    fn set_reminders(
        &self,
        submission: &ReminderSubmission,
    ) -> Result<ReminderAck, ReminderError> {
        let _span = tracing::info_span!(
            "set_reminders",
            medications = submission.medications.len(),
        )
        .entered();
        let start = std::time::Instant::now();

        let url = format!("{}/set_reminder", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ReminderError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ReminderError::Timeout(self.timeout_secs)
                } else {
                    ReminderError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ReminderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        // The body is informational only; an unreadable one is not a failure.
        let raw = response.json().unwrap_or(serde_json::Value::Null);

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            "Reminders registered"
        );

        Ok(ReminderAck { raw })
    }
}

// ──────────────────────────────────────────────
// MockReminderApi (testing)
// ──────────────────────────────────────────────

/// Mock reminder API. Records every accepted submission so tests can
/// assert what would have gone over the wire; can be set up to fail
/// with a service error instead.
#[derive(Default)]
pub struct MockReminderApi {
    accepted: Mutex<Vec<ReminderSubmission>>,
    failure: Option<(u16, String)>,
}

impl MockReminderApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that rejects every submission with the given service error.
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            accepted: Mutex::new(Vec::new()),
            failure: Some((status, body.to_string())),
        }
    }

    /// Submissions accepted so far, in call order.
    pub fn accepted(&self) -> Vec<ReminderSubmission> {
        self.accepted
            .lock()
            .map(|submissions| submissions.clone())
            .unwrap_or_default()
    }
}

impl ReminderApi for MockReminderApi {
    fn set_reminders(
        &self,
        submission: &ReminderSubmission,
    ) -> Result<ReminderAck, ReminderError> {
        if let Some((status, body)) = &self.failure {
            return Err(ReminderError::Api {
                status: *status,
                body: body.clone(),
            });
        }
        if let Ok(mut accepted) = self.accepted.lock() {
            accepted.push(submission.clone());
        }
        Ok(ReminderAck {
            raw: serde_json::json!({ "message": "Reminders set successfully" }),
        })
    }
}
