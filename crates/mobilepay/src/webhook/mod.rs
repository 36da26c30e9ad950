mod notification;
mod subscriptions;
mod verifier;

pub use notification::{NotificationData, WebhookNotification};
pub use subscriptions::{
    Webhook, WebhookCreateParams, WebhookEvent, WebhookUpdateParams, Webhooks, WebhooksPage,
};
pub use verifier::{SIGNATURE_HEADER, WebhookVerifier};
