use crate::config::PaymentConfig;
use crate::domain::card::CardDetails;
use crate::domain::ports::PaymentProcessor;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;

/// Stand-in for a card network: after a fixed processing delay it approves
/// the configured test card and declines every other card.
#[derive(Debug, Clone)]
pub struct SimulatedCardProcessor {
    approved_card: String,
    delay: Duration,
}

impl SimulatedCardProcessor {
    pub fn new(approved_card: impl Into<String>, delay: Duration) -> Self {
        Self {
            approved_card: approved_card.into(),
            delay,
        }
    }

    pub fn from_config(config: &PaymentConfig) -> Self {
        Self::new(config.approved_test_card.clone(), config.processing_delay)
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedCardProcessor {
    async fn charge(&self, card: &CardDetails, amount: Decimal) -> Result<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if card.number() == self.approved_card {
            tracing::info!(last_four = card.last_four(), %amount, "Card charge approved");
            Ok(())
        } else {
            tracing::warn!(last_four = card.last_four(), %amount, "Card charge declined");
            Err(PaymentError::CardDeclined)
        }
    }
}
