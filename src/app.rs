// src/app.rs
use std::any::Any;
use std::sync::Arc;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    errors::SparrowError,
    handlers::{notification_handler, provider_handler},
    state::AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/send-notification", post(notification_handler::send_notification))
        .route("/send-to-user", post(notification_handler::send_to_user))
        .route("/send-driver-approval", post(notification_handler::send_driver_approval))
        .route("/send-ride-notification", post(notification_handler::send_ride_notification))
        .route("/send-payment-notification", post(notification_handler::send_payment_notification))
        .route("/send-support-notification", post(notification_handler::send_support_notification))
        .route("/send-web-only", post(notification_handler::send_web_only))
        .route("/send-android-only", post(notification_handler::send_android_only))
        .route("/test-notification", post(notification_handler::send_test_notification))
        .route("/notifications/:id", get(provider_handler::notification_stats))
        .route("/app-info", get(provider_handler::app_info))
        .route("/debug/config", get(provider_handler::debug_config));

    let router = Router::new()
        .route("/health", get(provider_handler::health))
        .nest("/api", api)
        .with_state(state);

    with_middleware(router)
}

/// CORS, request tracing and panic containment shared by every route.
pub fn with_middleware(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    SparrowError::internal_error("unexpected failure while handling the request").into_response()
}
