use super::types::{
    CanceledReservation, CaptureParams, CapturedReservation, PATH_TIMESTAMP_FORMAT, PaymentStatus,
    PaymentTransaction, RefundParams, RefundedReservation, Reservation, ReservationsQuery,
};
use crate::backend::{ApiRequest, Backend, HttpBackend, decode};
use crate::config::{AppSwitchConfig, BackendConfig};
use crate::error::{Error, Result};

/// Merchant-scoped client for the AppSwitch v1 API.
#[derive(Debug, Clone)]
pub struct AppSwitch<B = HttpBackend> {
    backend: B,
    merchant_id: String,
}

impl AppSwitch<HttpBackend> {
    pub fn new(config: &AppSwitchConfig, backend: BackendConfig) -> Result<Self> {
        let backend = HttpBackend::app_switch(config, backend)?;
        Ok(Self::with_backend(backend, config.merchant_id()))
    }
}

impl<B: Backend> AppSwitch<B> {
    pub fn with_backend(backend: B, merchant_id: impl Into<String>) -> Self {
        Self {
            backend,
            merchant_id: merchant_id.into(),
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub async fn payment_status(&self, order_id: &str) -> Result<PaymentStatus> {
        let path = format!("/merchants/{}/orders/{}", self.merchant_id, order(order_id)?);
        let body = self.backend.call(ApiRequest::get(path)).await?;
        decode(&body)
    }

    pub async fn transactions(&self, order_id: &str) -> Result<Vec<PaymentTransaction>> {
        let path = format!(
            "/merchants/{}/orders/{}/transactions",
            self.merchant_id,
            order(order_id)?
        );
        let body = self.backend.call(ApiRequest::get(path)).await?;
        decode(&body)
    }

    /// Reservations created by the merchant within `query.from..query.to`.
    pub async fn reservations(&self, query: &ReservationsQuery) -> Result<Vec<Reservation>> {
        let path = format!(
            "/reservations/merchants/{}/{}/{}",
            self.merchant_id,
            query.from.format(PATH_TIMESTAMP_FORMAT),
            query.to.format(PATH_TIMESTAMP_FORMAT)
        );
        let request = ApiRequest::get(path).query(query)?;
        let body = self.backend.call(request).await?;
        decode(&body)
    }

    pub async fn cancel_reservation(&self, order_id: &str) -> Result<CanceledReservation> {
        let path = format!(
            "/reservations/merchants/{}/orders/{}",
            self.merchant_id,
            order(order_id)?
        );
        let body = self.backend.call(ApiRequest::delete(path)).await?;
        decode(&body)
    }

    pub async fn refund(&self, order_id: &str, params: &RefundParams) -> Result<RefundedReservation> {
        let path = format!("/merchants/{}/orders/{}", self.merchant_id, order(order_id)?);
        let body = self.backend.call(ApiRequest::put(path).json(params)?).await?;
        decode(&body)
    }

    /// The capture type must match the one the reservation was made with.
    pub async fn capture(
        &self,
        order_id: &str,
        params: &CaptureParams,
    ) -> Result<CapturedReservation> {
        let path = format!(
            "/reservations/merchants/{}/orders/{}",
            self.merchant_id,
            order(order_id)?
        );
        let body = self.backend.call(ApiRequest::put(path).json(params)?).await?;
        decode(&body)
    }
}

fn order(order_id: &str) -> Result<&str> {
    if order_id.is_empty() {
        tracing::error!("orderId cannot be empty");
        return Err(Error::invalid_argument("orderId", "cannot be empty"));
    }
    // Anything here would change the signed path or spill into the query.
    if order_id
        .chars()
        .any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        tracing::error!(order_id, "orderId contains URL delimiters");
        return Err(Error::invalid_argument(
            "orderId",
            "cannot contain '/', '?', '#', '%' or whitespace",
        ));
    }
    Ok(order_id)
}
