// src/handlers/notification_handler.rs
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing;

use crate::{
    errors::{SparrowError as AppError, SparrowResult},
    models::notification::{NotificationRequest, PayloadData, Platforms, RecipientIds},
    services::dispatcher::{DeliveryRoute, DispatchOutcome},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub success: bool,
    pub message: String,
    pub route: DeliveryRoute,
    pub data: Value,
}

impl From<DispatchOutcome> for SendResponse {
    fn from(outcome: DispatchOutcome) -> Self {
        Self {
            success: true,
            message: outcome.summary(),
            route: outcome.route,
            data: outcome.acknowledgement,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationBody {
    pub title: Option<String>,
    pub message: Option<String>,
    pub target: Option<String>,
    pub data: Option<PayloadData>,
    pub platforms: Option<Platforms>,
    pub specific_user_ids: Option<RecipientIds>,
}

impl From<SendNotificationBody> for NotificationRequest {
    fn from(body: SendNotificationBody) -> Self {
        NotificationRequest {
            title: body.title.unwrap_or_default(),
            body: body.message.unwrap_or_default(),
            audience: body.target,
            recipient_ids: body.specific_user_ids.map(RecipientIds::into_vec),
            platforms: body.platforms.unwrap_or_default(),
            payload_data: body.data.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendToUserBody {
    #[serde(alias = "userIds")]
    pub user_id: Option<RecipientIds>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub data: Option<PayloadData>,
    pub platforms: Option<Platforms>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverApprovalBody {
    pub driver_id: Option<String>,
    #[serde(default)]
    pub approved: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideNotificationBody {
    #[serde(alias = "userIds")]
    pub user_id: Option<RecipientIds>,
    pub ride_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotificationBody {
    pub user_id: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportNotificationBody {
    pub user_id: Option<String>,
    pub ticket_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TestNotificationBody {
    pub target: Option<String>,
}

fn parse_body<T: DeserializeOwned>(payload: Result<Json<T>, JsonRejection>) -> SparrowResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

fn required(field: &str, value: Option<String>) -> SparrowResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::validation_error(field, format!("{} is required", field)))
}

fn required_recipients(field: &str, value: Option<RecipientIds>) -> SparrowResult<RecipientIds> {
    value.ok_or_else(|| AppError::validation_error(field, format!("{} is required", field)))
}

async fn relay(state: &AppState, request: NotificationRequest) -> SparrowResult<Json<SendResponse>> {
    let outcome = state.dispatcher.dispatch(request).await?;
    tracing::info!("{}", outcome.summary());
    Ok(Json(outcome.into()))
}

pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendNotificationBody>, JsonRejection>,
) -> SparrowResult<Json<SendResponse>> {
    let body = parse_body(payload)?;
    relay(&state, body.into()).await
}

pub async fn send_web_only(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendNotificationBody>, JsonRejection>,
) -> SparrowResult<Json<SendResponse>> {
    let request = NotificationRequest::from(parse_body(payload)?).web_only();
    relay(&state, request).await
}

pub async fn send_android_only(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendNotificationBody>, JsonRejection>,
) -> SparrowResult<Json<SendResponse>> {
    let request = NotificationRequest::from(parse_body(payload)?).android_only();
    relay(&state, request).await
}

pub async fn send_to_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SendToUserBody>, JsonRejection>,
) -> SparrowResult<Json<SendResponse>> {
    let body = parse_body(payload)?;
    let user_ids = required_recipients("userId", body.user_id)?;

    let request = NotificationRequest::to_user(
        user_ids,
        body.title.unwrap_or_default(),
        body.message.unwrap_or_default(),
        body.data.unwrap_or_default(),
        body.platforms.unwrap_or_default(),
    );
    relay(&state, request).await
}

pub async fn send_driver_approval(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DriverApprovalBody>, JsonRejection>,
) -> SparrowResult<Json<SendResponse>> {
    let body = parse_body(payload)?;
    let driver_id = required("driverId", body.driver_id)?;

    let request = NotificationRequest::driver_approval(
        state.site_url(),
        &driver_id,
        body.approved,
        body.reason.as_deref(),
    );
    relay(&state, request).await
}

pub async fn send_ride_notification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RideNotificationBody>, JsonRejection>,
) -> SparrowResult<Json<SendResponse>> {
    let body = parse_body(payload)?;
    let user_ids = required_recipients("userId", body.user_id)?;
    let ride_id = required("rideId", body.ride_id)?;
    let status = required("status", body.status)?;

    let request = NotificationRequest::ride_update(state.site_url(), user_ids, &ride_id, &status);
    relay(&state, request).await
}

pub async fn send_payment_notification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PaymentNotificationBody>, JsonRejection>,
) -> SparrowResult<Json<SendResponse>> {
    let body = parse_body(payload)?;
    let user_id = required("userId", body.user_id)?;
    let amount = body
        .amount
        .filter(|a| a.is_finite())
        .ok_or_else(|| AppError::validation_error("amount", "amount is required"))?;
    let status = required("status", body.status)?;
    let currency = body
        .currency
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| "GHS".to_string());

    let request = NotificationRequest::payment(state.site_url(), &user_id, amount, &currency, &status);
    relay(&state, request).await
}

pub async fn send_support_notification(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SupportNotificationBody>, JsonRejection>,
) -> SparrowResult<Json<SendResponse>> {
    let body = parse_body(payload)?;
    let user_id = required("userId", body.user_id)?;
    let ticket_id = required("ticketId", body.ticket_id)?;
    let message = required("message", body.message)?;

    let request = NotificationRequest::support(state.site_url(), &user_id, &ticket_id, &message);
    relay(&state, request).await
}

// An empty body means "no target"; a body that is present must parse
pub async fn send_test_notification(
    State(state): State<Arc<AppState>>,
    payload: Bytes,
) -> SparrowResult<Json<SendResponse>> {
    let body: TestNotificationBody = if payload.iter().all(u8::is_ascii_whitespace) {
        TestNotificationBody::default()
    } else {
        serde_json::from_slice(&payload)
            .map_err(|e| AppError::bad_request(format!("Failed to parse the request body as JSON: {}", e)))?
    };
    tracing::info!(target_audience = ?body.target, "Sending test notification");

    let request = NotificationRequest::test_broadcast(body.target.as_deref());
    relay(&state, request).await
}
