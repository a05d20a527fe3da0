// src/api/client.rs
// =============================================================================
// This module is the client for the PhishShield classification service.
//
// Endpoints (relative to the configured base URL):
// - POST /predict_url       body {"url": ...} -> classification verdict
// - GET  /history           -> recent scan records
// - GET  /extension_stats   -> service-side daily totals
// - DELETE /history         -> clears the service-side history
//
// Failure handling:
// - No response at all (timeout, refused, DNS) -> CheckError::Network
// - A failure status -> CheckError::Service with the body's "detail" text,
//   or a generic fallback when the body carries no usable message
// - A success status with an unreadable body -> CheckError::Unexpected
//
// Exactly one attempt per call: no retries, and no client-imposed timeout
// beyond what the transport itself does.
//
// Rust concepts:
// - async-trait: The ClassifierApi trait lets tests script responses
//   without a network
// - serde flatten: Extra verdict fields pass through untouched
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CheckError;
use crate::scan::history::ScanRecord;

// The classification outcome for one URL.
//
// isPhishing is the only field we interpret; message and anything else the
// service includes (model features, trust notes, ...) ride along opaquely
// for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_phishing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Service-side daily totals, shown as a baseline next to the session
/// counters. These keys are snake_case on the wire, unlike scan records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ServiceStats {
    pub urls_scanned_today: u64,
    pub threats_blocked_today: u64,
    pub avg_response_time: f64,
}

// Everything the scan controller needs from the service.
//
// The controller owns a Box<dyn ClassifierApi>; production wires in
// HttpApi, tests wire in a scripted fake.
#[async_trait]
pub trait ClassifierApi: Send + Sync {
    async fn classify(&self, url: &str) -> Result<Verdict, CheckError>;
    async fn fetch_history(&self) -> Result<Vec<ScanRecord>, CheckError>;
    async fn fetch_service_stats(&self) -> Result<ServiceStats, CheckError>;
    async fn clear_history(&self) -> Result<(), CheckError>;
}

/// The real HTTP client.
pub struct HttpApi {
    client: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(base: Url) -> Result<Self> {
        // One client for all requests (connection pooling)
        let client = Client::builder().build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CheckError> {
        self.base
            .join(path)
            .map_err(|e| CheckError::Unexpected(format!("bad endpoint {}: {}", path, e)))
    }
}

#[async_trait]
impl ClassifierApi for HttpApi {
    async fn classify(&self, url: &str) -> Result<Verdict, CheckError> {
        let response = self
            .client
            .post(self.endpoint("predict_url")?)
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(categorize_transport_error)?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response
            .json::<Verdict>()
            .await
            .map_err(|e| CheckError::Unexpected(format!("malformed verdict response: {}", e)))
    }

    async fn fetch_history(&self) -> Result<Vec<ScanRecord>, CheckError> {
        let response = self
            .client
            .get(self.endpoint("history")?)
            .send()
            .await
            .map_err(categorize_transport_error)?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response
            .json::<Vec<ScanRecord>>()
            .await
            .map_err(|e| CheckError::Unexpected(format!("malformed history response: {}", e)))
    }

    async fn fetch_service_stats(&self) -> Result<ServiceStats, CheckError> {
        let response = self
            .client
            .get(self.endpoint("extension_stats")?)
            .send()
            .await
            .map_err(categorize_transport_error)?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        response
            .json::<ServiceStats>()
            .await
            .map_err(|e| CheckError::Unexpected(format!("malformed stats response: {}", e)))
    }

    async fn clear_history(&self) -> Result<(), CheckError> {
        let response = self
            .client
            .delete(self.endpoint("history")?)
            .send()
            .await
            .map_err(categorize_transport_error)?;

        if !response.status().is_success() {
            return Err(service_error(response).await);
        }

        Ok(())
    }
}

// Categorizes a transport failure for the log hint.
//
// The user always sees the same generic "could not reach the service"
// message; the hint distinguishes timeout / DNS / connection in the log.
fn categorize_transport_error(error: reqwest::Error) -> CheckError {
    let error_string = error.to_string();

    let hint = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        // Connection errors often mean DNS issues or host unreachable
        if error_string.contains("dns") {
            "could not resolve the service host".to_string()
        } else {
            "connection failed".to_string()
        }
    } else {
        error_string
    };

    CheckError::Network(hint)
}

// Turns a failure response into a Service error carrying the best
// available message.
async fn service_error(response: reqwest::Response) -> CheckError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    CheckError::Service(extract_detail(status.as_u16(), &body))
}

// Pulls the textual error out of a failure body.
//
// The service reports errors as {"detail": "..."} ; validation failures
// come as {"detail": [{"msg": "..."}, ...]}. Anything else falls back to
// a generic message with the status code.
fn extract_detail(status: u16, body: &str) -> String {
    let fallback = format!("The scanning service returned HTTP {}.", status);

    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return fallback,
    };

    match parsed.get("detail") {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(serde_json::Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(|msg| msg.to_string())
            .unwrap_or(fallback),
        _ => fallback,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for the client?
//    - The controller only cares about "give me a verdict for this URL"
//    - With ClassifierApi as a trait, tests hand the controller a scripted
//      fake and never open a socket
//
// 2. What is #[serde(flatten)]?
//    - Collects every JSON field we didn't name into the extra map
//    - The service can add fields tomorrow and nothing here breaks
//
// 3. Why keep extract_detail as a plain function?
//    - It takes a status and a string and returns a string - no I/O
//    - That makes the error-message rules testable without HTTP at all
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_detail() {
        assert_eq!(
            extract_detail(429, r#"{"detail":"rate limited"}"#),
            "rate limited"
        );
    }

    #[test]
    fn test_extract_validation_detail() {
        let body = r#"{"detail":[{"loc":["body","url"],"msg":"field required"}]}"#;
        assert_eq!(extract_detail(422, body), "field required");
    }

    #[test]
    fn test_fallback_on_missing_detail() {
        assert_eq!(
            extract_detail(500, r#"{"error":"boom"}"#),
            "The scanning service returned HTTP 500."
        );
    }

    #[test]
    fn test_fallback_on_unparsable_body() {
        assert_eq!(
            extract_detail(502, "<html>Bad Gateway</html>"),
            "The scanning service returned HTTP 502."
        );
    }

    #[test]
    fn test_fallback_on_empty_detail() {
        assert_eq!(
            extract_detail(500, r#"{"detail":""}"#),
            "The scanning service returned HTTP 500."
        );
    }

    #[test]
    fn test_verdict_passes_extra_fields_through() {
        let body = r#"{
            "url": "https://example.com",
            "isPhishing": false,
            "timestamp": "2026-08-04T10:00:00Z",
            "message": "URL is from a trusted domain",
            "features": {"length": 19}
        }"#;

        let verdict: Verdict = serde_json::from_str(body).unwrap();
        assert!(!verdict.is_phishing);
        assert_eq!(verdict.message.as_deref(), Some("URL is from a trusted domain"));
        // url, timestamp and features ride along untouched
        assert_eq!(verdict.extra["url"], "https://example.com");
        assert_eq!(verdict.extra["features"]["length"], 19);
    }

    #[test]
    fn test_endpoint_join() {
        let api = HttpApi::new(Url::parse("http://127.0.0.1:8000").unwrap()).unwrap();
        assert_eq!(
            api.endpoint("predict_url").unwrap().as_str(),
            "http://127.0.0.1:8000/predict_url"
        );
        assert_eq!(
            api.endpoint("history").unwrap().as_str(),
            "http://127.0.0.1:8000/history"
        );
    }
}
