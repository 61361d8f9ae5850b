// src/services/mod.rs
pub mod audience;
pub mod decoration;
pub mod dispatcher;
pub mod provider_gateway;

pub use dispatcher::{DeliveryRoute, DispatchOutcome, NotificationDispatcher};
pub use provider_gateway::{MockBehavior, MockProviderGateway, OneSignalGateway, ProviderGateway};
