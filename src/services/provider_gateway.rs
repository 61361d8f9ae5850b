// src/services/provider_gateway.rs
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::time::Duration;
use tracing;

use crate::{
    config::{ProviderConfig, ProviderCredentials},
    errors::{SparrowError as AppError, SparrowResult},
    models::payload::{ProviderAcknowledgement, ProviderPayload},
};

/// The third-party push provider, as seen by the dispatcher.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Create a notification. Returns the provider's body untouched.
    async fn submit(&self, payload: ProviderPayload) -> SparrowResult<ProviderAcknowledgement>;
    /// Delivery stats for a previously created notification.
    async fn notification_stats(&self, notification_id: &str) -> SparrowResult<Value>;
    /// Provider-side app and platform configuration.
    async fn app_info(&self) -> SparrowResult<Value>;
}

/// OneSignal-compatible REST gateway.
pub struct OneSignalGateway {
    client: reqwest::Client,
    api_url: String,
    // Kept as the error text so every call can report it again
    credentials: Result<ProviderCredentials, String>,
}

impl OneSignalGateway {
    pub fn new(config: &ProviderConfig) -> SparrowResult<Self> {
        Self::with_timeout(config, config.timeout())
    }

    pub fn with_timeout(config: &ProviderConfig, timeout: Duration) -> SparrowResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let credentials = config.credentials().map_err(|e| match e {
            AppError::ConfigurationError(msg) => msg,
            other => other.to_string(),
        });

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_ok()
    }

    fn credentials(&self) -> SparrowResult<&ProviderCredentials> {
        self.credentials
            .as_ref()
            .map_err(|msg| AppError::ConfigurationError(msg.clone()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn auth_header(credentials: &ProviderCredentials) -> String {
        format!("Basic {}", credentials.rest_api_key)
    }

    async fn read_response(response: reqwest::Response) -> SparrowResult<Value> {
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body, "Provider request failed");
            return Err(AppError::GatewayError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

/// Provider ids are opaque tokens, but they end up in a URL path.
fn validate_notification_id(id: &str) -> SparrowResult<()> {
    let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::validation_error("id", "notification id is malformed"))
    }
}

#[async_trait]
impl ProviderGateway for OneSignalGateway {
    async fn submit(&self, mut payload: ProviderPayload) -> SparrowResult<ProviderAcknowledgement> {
        let credentials = self.credentials()?;
        payload.set_app_id(&credentials.app_id);

        tracing::debug!(payload = %payload.as_json(), "Submitting notification to provider");

        let response = self
            .client
            .post(self.endpoint("notifications"))
            .header("Authorization", Self::auth_header(credentials))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let ack = Self::read_response(response).await?;
        let notification_id = ack.get("id").and_then(Value::as_str).unwrap_or("-");
        tracing::info!(notification_id, "Provider accepted notification");
        Ok(ack)
    }

    async fn notification_stats(&self, notification_id: &str) -> SparrowResult<Value> {
        validate_notification_id(notification_id)?;
        let credentials = self.credentials()?;

        let response = self
            .client
            .get(self.endpoint(&format!("notifications/{}", notification_id)))
            .query(&[("app_id", credentials.app_id.as_str())])
            .header("Authorization", Self::auth_header(credentials))
            .send()
            .await?;

        Self::read_response(response).await
    }

    async fn app_info(&self) -> SparrowResult<Value> {
        let credentials = self.credentials()?;

        let response = self
            .client
            .get(self.endpoint(&format!("apps/{}", credentials.app_id)))
            .header("Authorization", Self::auth_header(credentials))
            .send()
            .await?;

        Self::read_response(response).await
    }
}

/// How the mock answers.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Accept,
    Reject { status: u16, body: Value },
    Timeout,
    Unconfigured,
}

// Mock gateway for development and testing: records instead of sending
#[derive(Debug)]
pub struct MockProviderGateway {
    behavior: MockBehavior,
    submitted: Mutex<Vec<ProviderPayload>>,
}

impl Default for MockProviderGateway {
    fn default() -> Self {
        Self::new(MockBehavior::Accept)
    }
}

impl MockProviderGateway {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Payloads that reached the gateway, in order.
    pub fn submitted(&self) -> Vec<ProviderPayload> {
        self.submitted.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn submission_count(&self) -> usize {
        self.submitted.lock().map(|v| v.len()).unwrap_or(0)
    }

    fn outcome(&self) -> SparrowResult<()> {
        match &self.behavior {
            MockBehavior::Accept => Ok(()),
            MockBehavior::Reject { status, body } => Err(AppError::GatewayError {
                status: *status,
                body: body.clone(),
            }),
            MockBehavior::Timeout => Err(AppError::NetworkError(
                "provider did not respond in time".to_string(),
            )),
            MockBehavior::Unconfigured => Err(AppError::configuration(
                "ONESIGNAL_APP_ID and ONESIGNAL_REST_API_KEY are not set",
            )),
        }
    }
}

#[async_trait]
impl ProviderGateway for MockProviderGateway {
    async fn submit(&self, payload: ProviderPayload) -> SparrowResult<ProviderAcknowledgement> {
        if let MockBehavior::Unconfigured = self.behavior {
            return self.outcome().map(|_| Value::Null);
        }

        tracing::info!("[MOCK] Would send notification: {}", payload.as_json());
        let recipients = match payload.targeting() {
            Some(crate::models::Targeting::Recipients(ids)) => ids.len(),
            _ => 0,
        };

        let count = {
            let mut submitted = self
                .submitted
                .lock()
                .map_err(|_| AppError::internal_error("mock gateway lock poisoned"))?;
            submitted.push(payload);
            submitted.len()
        };

        self.outcome()?;
        Ok(json!({ "id": format!("mock-{}", count), "recipients": recipients }))
    }

    async fn notification_stats(&self, notification_id: &str) -> SparrowResult<Value> {
        self.outcome()?;
        Ok(json!({ "id": notification_id, "successful": 0, "failed": 0, "remaining": 0 }))
    }

    async fn app_info(&self) -> SparrowResult<Value> {
        self.outcome()?;
        Ok(json!({ "id": "mock-app", "name": "Sparrow (mock)" }))
    }
}
