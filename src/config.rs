use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

/// Total price assumed when a booking's listing carries no `price_min`.
pub const DEFAULT_FALLBACK_PRICE: Decimal = dec!(1000);

/// The only card number the simulated processor approves.
pub const TEST_CARD_NUMBER: &str = "4242424242424242";

/// Runtime knobs for the payment flow.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentConfig {
    pub fallback_total_price: Decimal,
    pub processing_delay: Duration,
    pub approved_test_card: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            fallback_total_price: DEFAULT_FALLBACK_PRICE,
            processing_delay: Duration::from_secs(2),
            approved_test_card: TEST_CARD_NUMBER.to_string(),
        }
    }
}

impl PaymentConfig {
    pub fn with_fallback_price(mut self, price: Decimal) -> Self {
        self.fallback_total_price = price;
        self
    }

    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }
}
