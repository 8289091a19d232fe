use std::sync::Arc;
use wavswap_core::{Config, ConversionService, Janitor};

/// Shared application state
pub struct AppState {
    config: Config,
    service: Arc<ConversionService>,
    janitor: Arc<Janitor>,
}

impl AppState {
    pub fn new(config: Config, service: Arc<ConversionService>, janitor: Arc<Janitor>) -> Self {
        Self {
            config,
            service,
            janitor,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> &ConversionService {
        self.service.as_ref()
    }

    pub fn janitor(&self) -> &Janitor {
        self.janitor.as_ref()
    }
}
