use serde::{Deserialize, Serialize};

use crate::backend::{ApiRequest, Backend, decode};
use crate::error::Result;

const REFUNDS_PATH: &str = "v1/refunds";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundsListOptions {
    pub page_size: u32,
    pub page_number: u32,
    pub payment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_point_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundParams {
    pub idempotency_key: String,
    pub payment_id: String,
    pub amount: i64,
    pub reference: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Refund {
    pub refund_id: String,
    pub payment_id: String,
    pub amount: i64,
    pub remaining_amount: i64,
    pub description: String,
    pub reference: String,
    pub created_on: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefundsPage {
    pub refunds: Vec<Refund>,
    pub page_size: u32,
    pub next_page_number: u32,
}

#[derive(Debug, Clone)]
pub struct Refunds<B> {
    backend: B,
}

impl<B: Backend> Refunds<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn list(&self, options: &RefundsListOptions) -> Result<RefundsPage> {
        let request = ApiRequest::get(REFUNDS_PATH).query(options)?;
        let body = self.backend.call(request).await?;
        decode(&body)
    }

    pub async fn create(&self, params: &RefundParams) -> Result<Refund> {
        let request = ApiRequest::post(REFUNDS_PATH).json(params)?;
        let body = self.backend.call(request).await?;
        decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingBackend;

    #[tokio::test]
    async fn list_skips_unset_filters() {
        let backend = RecordingBackend::with_responses([Ok(
            r#"{"refunds":[{"refundId":"r1","paymentId":"p1","amount":100,"createdOn":"2022-02-20T16:35:28Z"}],"pageSize":10,"nextPageNumber":0}"#,
        )]);
        let page = Refunds::new(backend.clone())
            .list(&RefundsListOptions {
                page_size: 10,
                page_number: 1,
                payment_id: "p1".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.refunds[0].refund_id, "r1");
        assert_eq!(page.refunds[0].remaining_amount, 0);
        assert_eq!(
            backend.single_request().query.as_deref(),
            Some("pageSize=10&pageNumber=1&paymentId=p1")
        );
    }

    #[tokio::test]
    async fn create_posts_params() {
        let backend = RecordingBackend::with_responses([Ok(
            r#"{"refundId":"r1","paymentId":"p1","amount":100,"remainingAmount":50,"description":"","reference":"","createdOn":""}"#,
        )]);
        let refund = Refunds::new(backend.clone())
            .create(&RefundParams {
                idempotency_key: "key-1".into(),
                payment_id: "p1".into(),
                amount: 100,
                reference: "ref".into(),
                description: "Refund".into(),
            })
            .await
            .unwrap();
        assert_eq!(refund.remaining_amount, 50);

        let request = backend.single_request();
        assert_eq!(request.path, "v1/refunds");
        let body: serde_json::Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["paymentId"], "p1");
        assert_eq!(body["amount"], 100);
    }
}
