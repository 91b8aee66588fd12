//! HTTP submission of finalized routes
//!
//! The sync collaborator: POSTs a transfer representation to the backend.
//! On failure the result carries the serialized payload so a persistence
//! layer can keep it for a later retry; this module itself never retries
//! and never stores anything.

use std::time::Duration;

use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, Result};
use crate::transfer::RouteTransfer;

/// Request timeout for a single submission
const SUBMIT_TIMEOUT_SECS: u64 = 30;

/// Outcome of one submission attempt.
///
/// Never panics the caller: transport and server failures are reported in
/// the fields, and `payload` holds the JSON body to persist for retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct SubmitResult {
    /// Id of the submitted route
    pub route_id: String,
    /// Whether the backend accepted the route (2xx)
    pub success: bool,
    /// HTTP status code when a response was received
    pub status: Option<u16>,
    /// Error description when `success` is false
    pub error: Option<String>,
    /// JSON body to hand to a persistence layer for retry; present only on
    /// failure
    pub payload: Option<String>,
}

/// Route submission client
pub struct RouteSubmitter {
    client: Client,
    endpoint: String,
    auth_header: Option<String>,
}

impl RouteSubmitter {
    /// Create a submitter for `endpoint` without authentication
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::build(endpoint.into(), None)
    }

    /// Create a submitter sending `Authorization: Bearer <token>`
    pub fn with_bearer_token(endpoint: impl Into<String>, token: &str) -> Result<Self> {
        Self::build(endpoint.into(), Some(format!("Bearer {}", token)))
    }

    fn build(endpoint: String, auth_header: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SUBMIT_TIMEOUT_SECS))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| RecorderError::Http {
                message: format!("failed to create HTTP client: {}", e),
                status: None,
            })?;
        Ok(Self {
            client,
            endpoint,
            auth_header,
        })
    }

    /// Submit one finalized route.
    ///
    /// The caller inspects the result and decides what to do with the
    /// returned payload; a failed submission is not an `Err`.
    pub async fn submit(&self, transfer: &RouteTransfer) -> SubmitResult {
        let payload = match transfer.to_json() {
            Ok(json) => json,
            Err(e) => {
                return SubmitResult {
                    route_id: transfer.id.clone(),
                    success: false,
                    status: None,
                    error: Some(e.to_string()),
                    payload: None,
                };
            }
        };

        info!(
            "[RouteSubmitter] Submitting route {} ({} bytes) to {}",
            transfer.id,
            payload.len(),
            self.endpoint
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(payload.clone());
        if let Some(auth) = &self.auth_header {
            request = request.header("Authorization", auth);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!(
                        "[RouteSubmitter] Route {} accepted ({})",
                        transfer.id,
                        status.as_u16()
                    );
                    SubmitResult {
                        route_id: transfer.id.clone(),
                        success: true,
                        status: Some(status.as_u16()),
                        error: None,
                        payload: None,
                    }
                } else {
                    warn!(
                        "[RouteSubmitter] Route {} rejected with status {}",
                        transfer.id,
                        status.as_u16()
                    );
                    SubmitResult {
                        route_id: transfer.id.clone(),
                        success: false,
                        status: Some(status.as_u16()),
                        error: Some(format!("server returned status {}", status.as_u16())),
                        payload: Some(payload),
                    }
                }
            }
            Err(e) => {
                warn!(
                    "[RouteSubmitter] Route {} transport failure: {}",
                    transfer.id, e
                );
                SubmitResult {
                    route_id: transfer.id.clone(),
                    success: false,
                    status: e.status().map(|s| s.as_u16()),
                    error: Some(e.to_string()),
                    payload: Some(payload),
                }
            }
        }
    }

    /// Blocking wrapper for callers without an async context (the FFI layer)
    pub fn submit_blocking(&self, transfer: &RouteTransfer) -> SubmitResult {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(self.submit(transfer)),
            Err(e) => SubmitResult {
                route_id: transfer.id.clone(),
                success: false,
                status: None,
                error: Some(format!("failed to create runtime: {}", e)),
                payload: None,
            },
        }
    }
}
