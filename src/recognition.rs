//! Recognition-service client.
//!
//! The service reads a prescription image with a structured-output
//! vision model and returns the extracted medication list. This crate
//! only sees the HTTP contract: POST the raw image bytes with their
//! declared content type, decode the nested medication envelope.

use serde::Deserialize;
use thiserror::Error;

use crate::config;
use crate::models::Medication;

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("Recognition service is unreachable at {0}")]
    Connection(String),

    #[error("Recognition request timed out after {0}s")]
    Timeout(u64),

    #[error("Recognition service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed recognition response: {0}")]
    MalformedResponse(String),
}

/// Seam for the prescription recognition call.
pub trait RecognitionApi {
    /// Extract medications from a prescription image.
    fn extract_medications(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<PrescriptionScan, RecognitionError>;
}

/// Decoded result of one prescription upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PrescriptionScan {
    pub medications: Vec<Medication>,
    /// Filename echoed by the service, when it knows one.
    pub filename: Option<String>,
}

/// Response body from the service's /upload route. The medication list
/// arrives double-nested: the outer key wraps the structured-output
/// document, which holds the list under the same name again.
#[derive(Deserialize)]
struct UploadResponse {
    medications: MedicationDocument,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Deserialize)]
struct MedicationDocument {
    medications: Vec<Medication>,
}

// ──────────────────────────────────────────────
// RecognitionClient
// ──────────────────────────────────────────────

/// HTTP client for the recognition service.
pub struct RecognitionClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl RecognitionClient {
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

impl RecognitionApi for RecognitionClient {
    fn extract_medications(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<PrescriptionScan, RecognitionError> {
        let _span = tracing::info_span!(
            "recognize_prescription",
            image_size = image.len(),
            content_type,
        )
        .entered();
        let start = std::time::Instant::now();

        let url = format!("{}/upload", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image.to_vec())
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    RecognitionError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    RecognitionError::Timeout(self.timeout_secs)
                } else {
                    RecognitionError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RecognitionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: UploadResponse = response
            .json()
            .map_err(|e| RecognitionError::MalformedResponse(e.to_string()))?;

        let scan = PrescriptionScan {
            medications: parsed.medications.medications,
            filename: parsed.filename,
        };

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            medications = scan.medications.len(),
            "Prescription recognized"
        );

        Ok(scan)
    }
}

// ──────────────────────────────────────────────
// MockRecognitionApi (testing)
// ──────────────────────────────────────────────

/// Mock recognition API. Returns a configurable medication list or a
/// configurable service failure.
pub struct MockRecognitionApi {
    medications: Vec<Medication>,
    filename: Option<String>,
    failure: Option<(u16, String)>,
}

impl MockRecognitionApi {
    pub fn new(medications: Vec<Medication>) -> Self {
        Self {
            medications,
            filename: None,
            failure: None,
        }
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = Some(filename.to_string());
        self
    }

    /// Mock that fails every call with the given service error.
    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            medications: Vec::new(),
            filename: None,
            failure: Some((status, body.to_string())),
        }
    }
}

impl RecognitionApi for MockRecognitionApi {
    fn extract_medications(
        &self,
        _image: &[u8],
        _content_type: &str,
    ) -> Result<PrescriptionScan, RecognitionError> {
        if let Some((status, body)) = &self.failure {
            return Err(RecognitionError::Api {
                status: *status,
                body: body.clone(),
            });
        }
        Ok(PrescriptionScan {
            medications: self.medications.clone(),
            filename: self.filename.clone(),
        })
    }
}
