//! AppSwitch v1: merchant-scoped order status, reservations, captures and
//! refunds. Every request is signed with the merchant's RSA key.

mod client;
mod types;

pub use client::AppSwitch;
pub use types::{
    CanceledReservation, CaptureParams, CaptureType, CapturedReservation, MobilePayTimestamp,
    PATH_TIMESTAMP_FORMAT, PaymentStatus, PaymentStatusType, PaymentTransaction, RefundParams,
    RefundedReservation, Reservation, ReservationsQuery, TIMESTAMP_FORMAT,
};
