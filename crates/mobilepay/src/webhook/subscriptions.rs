use serde::{Deserialize, Serialize};

use crate::backend::{ApiRequest, Backend, decode};
use crate::error::{Error, Result};

const WEBHOOKS_PATH: &str = "v1/webhooks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "payment.reserved")]
    PaymentReserved,
    #[serde(rename = "payment.expired")]
    PaymentExpired,
    #[serde(rename = "paymentpoint.activated")]
    PaymentPointActivated,
    #[serde(other, rename = "Unknown")]
    Unknown,
}

impl WebhookEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WebhookEvent::PaymentReserved => "payment.reserved",
            WebhookEvent::PaymentExpired => "payment.expired",
            WebhookEvent::PaymentPointActivated => "paymentpoint.activated",
            WebhookEvent::Unknown => "Unknown",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "payment.reserved" => WebhookEvent::PaymentReserved,
            "payment.expired" => WebhookEvent::PaymentExpired,
            "paymentpoint.activated" => WebhookEvent::PaymentPointActivated,
            _ => WebhookEvent::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub webhook_id: String,
    #[serde(default)]
    pub signature_key: String,
    pub url: String,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// `url` must be HTTPS. MobilePay lower-cases its scheme and host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookCreateParams {
    pub events: Vec<WebhookEvent>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookUpdateParams {
    pub url: String,
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WebhooksPage {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

/// Manages webhook subscriptions on the payments API.
#[derive(Debug, Clone)]
pub struct Webhooks<B> {
    backend: B,
}

impl<B: Backend> Webhooks<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn list(&self) -> Result<WebhooksPage> {
        let body = self.backend.call(ApiRequest::get(WEBHOOKS_PATH)).await?;
        decode(&body)
    }

    pub async fn create(&self, params: &WebhookCreateParams) -> Result<Webhook> {
        let request = ApiRequest::post(WEBHOOKS_PATH).json(params)?;
        let body = self.backend.call(request).await?;
        decode(&body)
    }

    pub async fn get(&self, webhook_id: &str) -> Result<Webhook> {
        let request = ApiRequest::get(webhook_path(webhook_id)?);
        let body = self.backend.call(request).await?;
        decode(&body)
    }

    pub async fn update(&self, webhook_id: &str, params: &WebhookUpdateParams) -> Result<Webhook> {
        let request = ApiRequest::put(webhook_path(webhook_id)?).json(params)?;
        let body = self.backend.call(request).await?;
        decode(&body)
    }

    pub async fn delete(&self, webhook_id: &str) -> Result<()> {
        self.backend
            .call(ApiRequest::delete(webhook_path(webhook_id)?))
            .await?;
        Ok(())
    }
}

fn webhook_path(webhook_id: &str) -> Result<String> {
    if webhook_id.is_empty() {
        tracing::error!("webhookId cannot be empty");
        return Err(Error::invalid_argument("webhookId", "cannot be empty"));
    }
    Ok(format!("{WEBHOOKS_PATH}/{webhook_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingBackend;
    use http::Method;

    #[test]
    fn event_names() {
        assert_eq!(WebhookEvent::PaymentReserved.name(), "payment.reserved");
        assert_eq!(
            serde_json::to_string(&WebhookEvent::PaymentPointActivated).unwrap(),
            r#""paymentpoint.activated""#
        );
        let decoded: Vec<WebhookEvent> =
            serde_json::from_str(r#"["payment.expired","refund.created"]"#).unwrap();
        assert_eq!(decoded, vec![WebhookEvent::PaymentExpired, WebhookEvent::Unknown]);
    }

    #[tokio::test]
    async fn create_posts_params() {
        let backend = RecordingBackend::with_responses([Ok(r#"{"webhookId":"w1","signatureKey":"secret","url":"https://shop.example/hook","events":["payment.reserved"]}"#)]);
        let webhooks = Webhooks::new(backend.clone());

        let created = webhooks
            .create(&WebhookCreateParams {
                events: vec![WebhookEvent::PaymentReserved],
                url: "https://shop.example/hook".into(),
            })
            .await
            .unwrap();

        assert_eq!(created.signature_key, "secret");
        let request = backend.single_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "v1/webhooks");
        assert_eq!(
            request.body.as_deref(),
            Some(&br#"{"events":["payment.reserved"],"url":"https://shop.example/hook"}"#[..])
        );
    }

    #[tokio::test]
    async fn list_decodes_page() {
        let backend = RecordingBackend::with_responses([Ok(
            r#"{"webhooks":[{"webhookId":"w1","url":"https://a","events":[]}]}"#,
        )]);
        let page = Webhooks::new(backend).list().await.unwrap();
        assert_eq!(page.webhooks.len(), 1);
        assert_eq!(page.webhooks[0].webhook_id, "w1");
    }

    #[tokio::test]
    async fn delete_targets_webhook() {
        let backend = RecordingBackend::with_responses([Ok("")]);
        Webhooks::new(backend.clone()).delete("w1").await.unwrap();
        let request = backend.single_request();
        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.path, "v1/webhooks/w1");
    }

    #[tokio::test]
    async fn empty_id_is_rejected_before_io() {
        let backend = RecordingBackend::default();
        let err = Webhooks::new(backend.clone()).get("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { field: "webhookId", .. }));
        assert!(backend.requests().is_empty());
    }
}
