use serde::{Deserialize, Serialize};

use crate::backend::{ApiRequest, Backend, decode};
use crate::error::{Error, Result};

const PAYMENTS_PATH: &str = "v1/payments";

/// Paging for list endpoints. Zero values are sent as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    pub page_size: u32,
    pub page_number: u32,
}

/// Amounts are in minor units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Payment {
    pub payment_id: String,
    pub amount: i64,
    pub description: String,
    pub payment_point_id: String,
    pub reference: String,
    pub mobile_pay_app_redirect_uri: String,
    pub state: String,
    pub initiated_on: String,
    pub last_updated_on: String,
    pub merchant_id: String,
    pub iso_currency_code: String,
    pub payment_point_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentsPage {
    pub payments: Vec<Payment>,
    pub page_size: u32,
    pub next_page_number: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentParams {
    pub amount: i64,
    /// Makes retried creations safe.
    pub idempotency_key: String,
    pub payment_point_id: String,
    pub redirect_uri: String,
    pub reference: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPayment {
    pub payment_id: String,
    pub mobile_pay_app_redirect_uri: String,
}

#[derive(Serialize)]
struct CaptureRequest {
    amount: i64,
}

#[derive(Debug, Clone)]
pub struct Payments<B> {
    backend: B,
}

impl<B: Backend> Payments<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn list(&self, options: ListOptions) -> Result<PaymentsPage> {
        let request = ApiRequest::get(PAYMENTS_PATH).query(&options)?;
        let body = self.backend.call(request).await?;
        decode(&body)
    }

    pub async fn find(&self, payment_id: &str) -> Result<Payment> {
        let path = format!("{PAYMENTS_PATH}/{}", payment(payment_id)?);
        let body = self.backend.call(ApiRequest::get(path)).await?;
        decode(&body)
    }

    pub async fn create(&self, params: &PaymentParams) -> Result<CreatedPayment> {
        let request = ApiRequest::post(PAYMENTS_PATH).json(params)?;
        let body = self.backend.call(request).await?;
        decode(&body)
    }

    pub async fn cancel(&self, payment_id: &str) -> Result<()> {
        let path = format!("{PAYMENTS_PATH}/{}/cancel", payment(payment_id)?);
        self.backend.call(ApiRequest::post(path)).await?;
        Ok(())
    }

    pub async fn capture(&self, payment_id: &str, amount: i64) -> Result<()> {
        let path = format!("{PAYMENTS_PATH}/{}/capture", payment(payment_id)?);
        let request = ApiRequest::post(path).json(&CaptureRequest { amount })?;
        self.backend.call(request).await?;
        Ok(())
    }
}

fn payment(payment_id: &str) -> Result<&str> {
    if payment_id.is_empty() {
        tracing::error!("paymentId cannot be empty");
        return Err(Error::invalid_argument("paymentId", "cannot be empty"));
    }
    Ok(payment_id)
}
