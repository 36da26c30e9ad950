use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Timestamp layout of AppSwitch responses. Values are UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Layout of the `from`/`to` path segments of the reservations endpoint.
pub const PATH_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H_%M";

/// AppSwitch timestamps carry no zone suffix, so they do not parse as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MobilePayTimestamp(pub NaiveDateTime);

impl fmt::Display for MobilePayTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Serialize for MobilePayTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MobilePayTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_PARSE_FORMAT)
            .map(MobilePayTimestamp)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatusType {
    Reserved,
    Cancelled,
    Captured,
    TotalRefund,
    PartialRefund,
    /// The reservation, capture, refund or cancellation was rejected.
    Rejected,
    /// Any status the API adds later.
    #[serde(other)]
    Unknown,
}

/// `Full` captures only the reserved amount. `Partial` allows less and
/// releases the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureType {
    Full,
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    #[serde(rename = "LatestPaymentStatus")]
    pub latest_payment_status: PaymentStatusType,
    #[serde(rename = "TransactionId")]
    pub transaction_id: String,
    #[serde(rename = "OriginalAmount")]
    pub original_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    #[serde(rename = "TimeStamp")]
    pub timestamp: MobilePayTimestamp,
    #[serde(rename = "PaymentStatus")]
    pub payment_status: PaymentStatusType,
    #[serde(rename = "TransactionId")]
    pub transaction_id: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
    #[serde(rename = "OrderId")]
    pub order_id: String,
    #[serde(rename = "TransactionId")]
    pub transaction_id: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "CaptureType")]
    pub capture_type: CaptureType,
}

/// Window for listing reservations. `from` and `to` go into the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationsQuery {
    #[serde(skip)]
    pub from: NaiveDateTime,
    #[serde(skip)]
    pub to: NaiveDateTime,
    #[serde(rename = "customerId", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl ReservationsQuery {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self {
            from,
            to,
            customer_id: None,
        }
    }

    pub fn customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureParams {
    #[serde(rename = "Amount")]
    pub amount: f64,
    /// Groups payments on the merchant's account statement.
    #[serde(rename = "BulkRef")]
    pub bulk_ref: String,
}

/// Refunds are possible up to a year after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundParams {
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "BulkRef")]
    pub bulk_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanceledReservation {
    #[serde(rename = "TransactionId")]
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedReservation {
    #[serde(rename = "TransactionId")]
    pub transaction_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundedReservation {
    /// Id of the new refund transaction.
    #[serde(rename = "TransactionId")]
    pub transaction_id: String,
    #[serde(rename = "OriginalTransactionId")]
    pub original_transaction_id: String,
    /// 0.00 once fully refunded.
    #[serde(rename = "Remainder")]
    pub remainder: f64,
}
