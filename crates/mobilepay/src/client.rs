use std::sync::Arc;

use crate::backend::{Backend, HttpBackend};
use crate::config::{BackendConfig, PaymentsConfig};
use crate::error::Result;
use crate::payments::Payments;
use crate::refunds::Refunds;
use crate::webhook::Webhooks;

/// Payments, refunds and webhook subscriptions over one shared backend.
#[derive(Debug)]
pub struct MobilePay<B = HttpBackend> {
    pub payments: Payments<Arc<B>>,
    pub refunds: Refunds<Arc<B>>,
    pub webhooks: Webhooks<Arc<B>>,
}

impl MobilePay<HttpBackend> {
    pub fn new(config: &PaymentsConfig, backend: BackendConfig) -> Result<Self> {
        Ok(Self::with_backend(HttpBackend::payments(config, backend)?))
    }
}

impl<B: Backend> MobilePay<B> {
    pub fn with_backend(backend: B) -> Self {
        let backend = Arc::new(backend);
        Self {
            payments: Payments::new(Arc::clone(&backend)),
            refunds: Refunds::new(Arc::clone(&backend)),
            webhooks: Webhooks::new(backend),
        }
    }
}
