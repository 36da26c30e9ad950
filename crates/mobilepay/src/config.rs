use std::fmt;
use std::time::Duration;

use crate::signing::SigningKeyPair;

pub const APP_SWITCH_API_URL: &str = "https://api.mobeco.dk/appswitch/api/v1";
pub const DEFAULT_BASE_URL: &str = "https://api.mobilepay.dk";
pub const SANDBOX_BASE_URL: &str = "https://api.sandbox.mobilepay.dk";

pub const APP_SWITCH_TIMEOUT: Duration = Duration::from_secs(5);
pub const PAYMENTS_TIMEOUT: Duration = Duration::from_secs(10);

/// Merchant credentials for the AppSwitch API. Immutable once built.
#[derive(Clone)]
pub struct AppSwitchConfig {
    merchant_id: String,
    subscription_key: String,
    key_pair: Option<SigningKeyPair>,
}

impl AppSwitchConfig {
    pub fn builder(
        merchant_id: impl Into<String>,
        subscription_key: impl Into<String>,
    ) -> AppSwitchConfigBuilder {
        AppSwitchConfigBuilder {
            merchant_id: merchant_id.into(),
            subscription_key: subscription_key.into(),
            key_pair: None,
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn subscription_key(&self) -> &str {
        &self.subscription_key
    }

    pub fn key_pair(&self) -> Option<&SigningKeyPair> {
        self.key_pair.as_ref()
    }
}

impl fmt::Debug for AppSwitchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSwitchConfig")
            .field("merchant_id", &self.merchant_id)
            .field("key_pair", &self.key_pair)
            .finish_non_exhaustive()
    }
}

pub struct AppSwitchConfigBuilder {
    merchant_id: String,
    subscription_key: String,
    key_pair: Option<SigningKeyPair>,
}

impl AppSwitchConfigBuilder {
    pub fn key_pair(mut self, key_pair: SigningKeyPair) -> Self {
        self.key_pair = Some(key_pair);
        self
    }

    pub fn build(self) -> AppSwitchConfig {
        AppSwitchConfig {
            merchant_id: self.merchant_id,
            subscription_key: self.subscription_key,
            key_pair: self.key_pair,
        }
    }
}

/// Credentials for the payments, refunds and webhooks APIs.
#[derive(Clone)]
pub struct PaymentsConfig {
    client_id: String,
    api_key: String,
}

impl PaymentsConfig {
    pub fn new(client_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            api_key: api_key.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for PaymentsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentsConfig")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Transport settings. `None` picks the default for the backend kind.
#[derive(Debug, Clone, Default)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub timeout: Option<Duration>,
    /// Sends `Test-mode: true` and logs request and response bodies.
    pub test_mode: bool,
}

impl BackendConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_without_keys() {
        let config = AppSwitchConfig::builder("APPDK0000000000", "sub-key").build();
        assert_eq!(config.merchant_id(), "APPDK0000000000");
        assert_eq!(config.subscription_key(), "sub-key");
        assert!(config.key_pair().is_none());
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = AppSwitchConfig::builder("merchant", "sub-key").build();
        assert!(!format!("{config:?}").contains("sub-key"));

        let config = PaymentsConfig::new("client", "api-key");
        assert!(!format!("{config:?}").contains("api-key"));
    }

    #[test]
    fn backend_config_defaults() {
        let config = BackendConfig::default();
        assert!(config.url.is_none());
        assert!(config.timeout.is_none());
        assert!(!config.test_mode);

        let config = config
            .with_url(SANDBOX_BASE_URL)
            .with_timeout(Duration::from_secs(1))
            .with_test_mode(true);
        assert_eq!(config.url.as_deref(), Some(SANDBOX_BASE_URL));
        assert_eq!(config.timeout, Some(Duration::from_secs(1)));
        assert!(config.test_mode);
    }
}
