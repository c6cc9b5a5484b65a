//! Outbound webhook delivery for completed intakes.

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::flow::Program;

/// The JSON body POSTed to the webhook endpoint when an intake completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakePayload {
    pub beneficiary_name: String,
    pub beneficiary_age: u32,
    pub assistance_request: String,
    pub program: Program,
}

/// Receiver of completed-intake notifications.
///
/// Fire-and-forget from the engine's perspective: a failure is logged by
/// the caller and never aborts the turn.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, payload: &IntakePayload) -> Result<(), WebhookError>;
}

/// HTTP webhook client.
///
/// When no URL is configured the client is disabled: delivery is skipped
/// and the would-be payload is logged instead.
pub struct WebhookClient {
    url: Option<String>,
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(config: WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            url: config.url,
            client,
        }
    }

    /// Whether a target URL is configured.
    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl NotificationSink for WebhookClient {
    async fn notify(&self, payload: &IntakePayload) -> Result<(), WebhookError> {
        let Some(url) = &self.url else {
            info!(
                beneficiary = %payload.beneficiary_name,
                program = %payload.program,
                "Webhook disabled, skipping delivery"
            );
            return Ok(());
        };

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| WebhookError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!(beneficiary = %payload.beneficiary_name, "Webhook delivered");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
