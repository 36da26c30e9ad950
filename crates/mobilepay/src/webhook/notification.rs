use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::subscriptions::WebhookEvent;
use crate::error::Result;

/// Body of an inbound webhook call. Decode only after the signature has been
/// verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookNotification {
    pub notification_id: String,
    pub event_type: String,
    pub event_date: DateTime<Utc>,
    pub data: NotificationData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl WebhookNotification {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    pub fn event(&self) -> WebhookEvent {
        WebhookEvent::from_name(&self.event_type)
    }
}
