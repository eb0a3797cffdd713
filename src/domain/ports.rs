use super::booking::BookingRecord;
use super::card::CardDetails;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn store(&self, booking: BookingRecord) -> Result<()>;
    async fn get(&self, booking_id: &str) -> Result<Option<BookingRecord>>;
    async fn get_all(&self) -> Result<Vec<BookingRecord>>;
}

/// Charges a card. A refused charge is reported as `PaymentError::CardDeclined`.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn charge(&self, card: &CardDetails, amount: Decimal) -> Result<()>;
}

pub type BookingStoreBox = Box<dyn BookingStore>;
pub type PaymentProcessorBox = Box<dyn PaymentProcessor>;
