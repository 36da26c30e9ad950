//! Client for the MobilePay AppSwitch and payments APIs.
//!
//! Outbound AppSwitch requests are signed with [`signing::RequestSigner`].
//! Inbound webhook calls are authenticated with [`webhook::WebhookVerifier`].

pub mod appswitch;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod payments;
pub mod refunds;
pub mod response;
pub mod signing;
pub mod webhook;

pub use appswitch::AppSwitch;
pub use backend::{ApiRequest, Backend, BackendKind, HttpBackend};
pub use client::MobilePay;
pub use config::{AppSwitchConfig, BackendConfig, PaymentsConfig};
pub use error::{ApiError, ConfigurationError, Error, IntegrityError, Result};
pub use signing::{RequestSigner, SigningKeyPair};
pub use webhook::WebhookVerifier;
