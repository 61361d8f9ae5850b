// src/services/dispatcher.rs
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{self, Instrument};
use uuid::Uuid;

use crate::{
    config::DecorationConfig,
    errors::{SparrowError as AppError, SparrowResult},
    models::{
        notification::{NotificationRequest, Platforms, RecipientIds},
        payload::{ProviderAcknowledgement, ProviderPayload, Targeting},
    },
    services::{audience::resolve_audience, decoration::decorate, provider_gateway::ProviderGateway},
};

/// Which sender a request goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryRoute {
    Segments,
    Recipients,
}

/// Trimmed recipient ids with blanks dropped. Errors when nothing is left.
pub fn clean_recipients(recipient_ids: impl Into<RecipientIds>) -> SparrowResult<Vec<String>> {
    let ids: Vec<String> = recipient_ids
        .into()
        .into_vec()
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    if ids.is_empty() {
        return Err(AppError::validation_error("recipient_ids", "no recipient ids provided"));
    }
    Ok(ids)
}

/// Supplied recipient ids win over the audience tag, even when the list is empty;
/// an empty list is then rejected by the targeted sender rather than broadcast.
pub fn route(request: &NotificationRequest) -> DeliveryRoute {
    if request.recipient_ids.is_some() {
        DeliveryRoute::Recipients
    } else {
        DeliveryRoute::Segments
    }
}

#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub route: DeliveryRoute,
    /// Segment names or recipient ids the payload was addressed to
    pub targets: Vec<String>,
    pub acknowledgement: ProviderAcknowledgement,
}

impl DispatchOutcome {
    pub fn summary(&self) -> String {
        match self.route {
            DeliveryRoute::Segments => format!("Notification sent to segment(s): {}", self.targets.join(", ")),
            DeliveryRoute::Recipients => format!("Notification sent to {} recipient(s)", self.targets.len()),
        }
    }
}

pub struct NotificationDispatcher {
    gateway: Arc<dyn ProviderGateway>,
    decoration: DecorationConfig,
}

impl NotificationDispatcher {
    pub fn new(gateway: Arc<dyn ProviderGateway>, decoration: DecorationConfig) -> Self {
        Self { gateway, decoration }
    }

    pub fn gateway(&self) -> &Arc<dyn ProviderGateway> {
        &self.gateway
    }

    /// Assemble the provider payload for a title/body, targeting and platform set.
    pub fn build_payload(
        &self,
        title: &str,
        body: &str,
        targeting: &Targeting,
        data: &Map<String, Value>,
        platforms: &Platforms,
    ) -> ProviderPayload {
        let mut payload = ProviderPayload::new(title, body, targeting, data);
        payload.merge(decorate(platforms, data, &self.decoration, targeting.priority()));
        payload
    }

    /// Broadcast to the provider segment behind `audience`.
    pub async fn send_by_segments(
        &self,
        title: &str,
        body: &str,
        audience: Option<&str>,
        data: &Map<String, Value>,
        platforms: &Platforms,
    ) -> SparrowResult<ProviderAcknowledgement> {
        let targeting = Targeting::Segments(resolve_audience(audience));
        tracing::info!(audience = ?audience, targeting = ?targeting, "Sending notification to segments");

        let payload = self.build_payload(title, body, &targeting, data, platforms);
        self.gateway.submit(payload).await
    }

    /// Deliver to explicit recipients. A single id is accepted as well as a list.
    pub async fn send_to_recipients(
        &self,
        title: &str,
        body: &str,
        recipient_ids: impl Into<RecipientIds>,
        data: &Map<String, Value>,
        platforms: &Platforms,
    ) -> SparrowResult<ProviderAcknowledgement> {
        let ids = clean_recipients(recipient_ids)?;
        tracing::info!(recipients = ids.len(), "Sending notification to recipients");

        let targeting = Targeting::Recipients(ids);
        let payload = self.build_payload(title, body, &targeting, data, platforms);
        self.gateway.submit(payload).await
    }

    /// Validate, pick a sender and relay the provider's answer.
    pub async fn dispatch(&self, request: NotificationRequest) -> SparrowResult<DispatchOutcome> {
        request.validate()?;

        let dispatch_id = Uuid::new_v4();
        let route = route(&request);
        let span = tracing::info_span!("dispatch", %dispatch_id, route = ?route);

        self.dispatch_routed(route, request).instrument(span).await
    }

    async fn dispatch_routed(
        &self,
        route: DeliveryRoute,
        request: NotificationRequest,
    ) -> SparrowResult<DispatchOutcome> {
        match route {
            DeliveryRoute::Recipients => {
                let ids = clean_recipients(request.recipient_ids.unwrap_or_default())?;
                let acknowledgement = self
                    .send_to_recipients(
                        &request.title,
                        &request.body,
                        ids.clone(),
                        &request.payload_data,
                        &request.platforms,
                    )
                    .await?;
                Ok(DispatchOutcome { route, targets: ids, acknowledgement })
            }
            DeliveryRoute::Segments => {
                let audience = request.audience.as_deref();
                let acknowledgement = self
                    .send_by_segments(
                        &request.title,
                        &request.body,
                        audience,
                        &request.payload_data,
                        &request.platforms,
                    )
                    .await?;
                Ok(DispatchOutcome {
                    route,
                    targets: resolve_audience(audience),
                    acknowledgement,
                })
            }
        }
    }
}
