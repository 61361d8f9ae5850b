// src/state.rs
use std::sync::Arc;

use crate::{
    config::Settings,
    errors::SparrowResult,
    services::{
        dispatcher::NotificationDispatcher,
        provider_gateway::{OneSignalGateway, ProviderGateway},
    },
};

pub struct AppState {
    pub dispatcher: Arc<NotificationDispatcher>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings) -> SparrowResult<Self> {
        let gateway = OneSignalGateway::new(&settings.provider)?;

        // Keep serving: every dispatch reports the same configuration error
        if let Err(e) = settings.provider.credentials() {
            tracing::error!("Provider credentials missing, notifications will fail: {}", e);
        }

        Ok(Self::with_gateway(settings, Arc::new(gateway)))
    }

    pub fn with_gateway(settings: Settings, gateway: Arc<dyn ProviderGateway>) -> Self {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            gateway,
            settings.decoration.clone(),
        ));

        Self { dispatcher, settings }
    }

    pub fn site_url(&self) -> &str {
        &self.settings.decoration.site_url
    }
}
