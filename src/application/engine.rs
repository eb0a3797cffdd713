use crate::config::PaymentConfig;
use crate::domain::booking::{BookingRecord, BookingUpdate};
use crate::domain::card::CardDetails;
use crate::domain::countdown::TripCountdown;
use crate::domain::milestone::{
    MilestoneKind, PaymentSchedule, ScheduleSummary, calculate_milestones,
};
use crate::domain::ports::{BookingStoreBox, PaymentProcessorBox};
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything the booking detail view shows about a booking's payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingOverview {
    pub booking_id: String,
    pub schedule: PaymentSchedule,
    pub summary: ScheduleSummary,
    pub countdown: Option<TripCountdown>,
}

/// Outcome of a successful milestone payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub booking_id: String,
    pub milestone_id: u8,
    pub amount: Decimal,
    pub message: String,
    pub schedule: PaymentSchedule,
}

/// Computes payment schedules for stored bookings and collects milestone
/// payments through the configured processor.
///
/// The schedule is never stored: it is recalculated from the booking record
/// on every call, and after a payment the booking is re-read before the new
/// schedule is built.
pub struct PaymentEngine {
    booking_store: BookingStoreBox,
    processor: PaymentProcessorBox,
    config: PaymentConfig,
}

impl PaymentEngine {
    /// Creates a new `PaymentEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `booking_store` - Where booking records are read from and written to.
    /// * `processor` - The card processor payments are charged through.
    /// * `config` - Fallback price and processor settings.
    pub fn new(
        booking_store: BookingStoreBox,
        processor: PaymentProcessorBox,
        config: PaymentConfig,
    ) -> Self {
        Self {
            booking_store,
            processor,
            config,
        }
    }

    /// Inserts `booking` unless a record with the same id is already stored.
    ///
    /// Returns whether the booking was inserted.
    pub async fn seed_booking(&self, booking: BookingRecord) -> Result<bool> {
        if self.booking_store.get(&booking.id).await?.is_some() {
            tracing::debug!(
                booking_id = %booking.id,
                "Booking already stored, keeping stored copy"
            );
            return Ok(false);
        }
        self.booking_store.store(booking).await?;
        Ok(true)
    }

    pub fn schedule_for(&self, booking: &BookingRecord, now: DateTime<Utc>) -> PaymentSchedule {
        let inputs = booking.payment_inputs(self.config.fallback_total_price);
        calculate_milestones(inputs.total_price, inputs.trip_start, inputs.progress, now)
    }

    pub async fn overview(&self, booking_id: &str, now: DateTime<Utc>) -> Result<BookingOverview> {
        let booking = self.load(booking_id).await?;
        Ok(self.build_overview(&booking, now))
    }

    /// Overviews of every stored booking, ordered by booking id.
    pub async fn overviews(&self, now: DateTime<Utc>) -> Result<Vec<BookingOverview>> {
        let mut bookings = self.booking_store.get_all().await?;
        bookings.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(bookings
            .iter()
            .map(|booking| self.build_overview(booking, now))
            .collect())
    }

    /// Charges one milestone of a booking and records the payment.
    ///
    /// Only a `current` or `overdue` milestone of a booking that accepts
    /// payments can be charged. If the charge fails the booking is left as it
    /// was.
    pub async fn pay_milestone(
        &self,
        booking_id: &str,
        milestone_id: u8,
        card: &CardDetails,
        now: DateTime<Utc>,
    ) -> Result<PaymentReceipt> {
        let mut booking = self.load(booking_id).await?;
        let kind = MilestoneKind::from_id(milestone_id)
            .ok_or(PaymentError::UnknownMilestone(milestone_id))?;
        let schedule = self.schedule_for(&booking, now);
        let milestone = schedule.milestone_of(kind);

        if !booking.accepts_payments() {
            return Err(PaymentError::MilestoneNotPayable {
                booking_id: booking.id.clone(),
                milestone: milestone_id,
                reason: format!("booking is {}", booking.status),
            });
        }
        if !milestone.status.is_payable() {
            return Err(PaymentError::MilestoneNotPayable {
                booking_id: booking.id.clone(),
                milestone: milestone_id,
                reason: format!("milestone is {:?}", milestone.status).to_lowercase(),
            });
        }

        let amount = milestone.amount;
        self.processor.charge(card, amount).await?;

        booking.apply(BookingUpdate::for_milestone(kind, now));
        self.booking_store.store(booking).await?;
        tracing::info!(booking_id, milestone_id, %amount, "Milestone payment recorded");

        let refreshed = self.load(booking_id).await?;
        Ok(PaymentReceipt {
            booking_id: refreshed.id.clone(),
            milestone_id,
            amount,
            message: confirmation_message(kind).to_string(),
            schedule: self.schedule_for(&refreshed, now),
        })
    }

    async fn load(&self, booking_id: &str) -> Result<BookingRecord> {
        self.booking_store
            .get(booking_id)
            .await?
            .ok_or_else(|| PaymentError::BookingNotFound(booking_id.to_string()))
    }

    fn build_overview(&self, booking: &BookingRecord, now: DateTime<Utc>) -> BookingOverview {
        let schedule = self.schedule_for(booking, now);
        BookingOverview {
            booking_id: booking.id.clone(),
            summary: schedule.summary(),
            countdown: booking
                .trip_start()
                .map(|start| TripCountdown::until(start, now)),
            schedule,
        }
    }
}

fn confirmation_message(kind: MilestoneKind) -> &'static str {
    match kind {
        MilestoneKind::Deposit => "Your deposit has been processed successfully.",
        MilestoneKind::SecondInstallment => {
            "Your second payment has been processed successfully."
        }
        MilestoneKind::FinalPayment => {
            "Your final payment has been processed successfully. Your booking is now confirmed!"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TEST_CARD_NUMBER;
    use crate::domain::booking::ListingSummary;
    use crate::domain::milestone::MilestoneStatus;
    use crate::domain::ports::BookingStore;
    use crate::infrastructure::in_memory::InMemoryBookingStore;
    use crate::infrastructure::simulated_processor::SimulatedCardProcessor;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 10, 0, 0).unwrap()
    }

    fn booking(id: &str, status: &str, start_in_days: Option<i64>) -> BookingRecord {
        BookingRecord {
            id: id.to_string(),
            listing_id: "l-1".to_string(),
            traveler_id: "t-1".to_string(),
            agent_id: "a-1".to_string(),
            status: status.to_string(),
            traveler_notes: None,
            requested_at: None,
            confirmed_at: None,
            payment_status: None,
            deposit_paid: None,
            listing: Some(ListingSummary {
                id: "l-1".to_string(),
                title: "Cameron Highlands Getaway".to_string(),
                price_min: Some(dec!(1000)),
                currency: "MYR".to_string(),
                start_date: start_in_days
                    .map(|days| (now() + Duration::days(days)).to_rfc3339()),
                ..Default::default()
            }),
        }
    }

    fn engine_with(store: InMemoryBookingStore) -> PaymentEngine {
        let config = PaymentConfig::default().with_processing_delay(std::time::Duration::ZERO);
        let processor = SimulatedCardProcessor::from_config(&config);
        PaymentEngine::new(Box::new(store), Box::new(processor), config)
    }

    fn test_card() -> CardDetails {
        CardDetails::new("Test Traveler", TEST_CARD_NUMBER, "12/30", "123").unwrap()
    }

    #[tokio::test]
    async fn test_overview_of_unknown_booking() {
        let engine = engine_with(InMemoryBookingStore::new());
        let result = engine.overview("missing", now()).await;
        assert!(matches!(result, Err(PaymentError::BookingNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_overview_includes_summary_and_countdown() {
        let store = InMemoryBookingStore::new();
        store.store(booking("b-1", "accepted", Some(100))).await.unwrap();
        let engine = engine_with(store);

        let overview = engine.overview("b-1", now()).await.unwrap();
        assert_eq!(overview.summary.total_amount, dec!(1000));
        assert_eq!(overview.summary.total_paid, Decimal::ZERO);
        assert_eq!(
            overview.countdown,
            Some(TripCountdown::Upcoming {
                days: 100,
                weeks: 14,
                remaining_days: 2
            })
        );
    }

    #[tokio::test]
    async fn test_full_payment_flow() {
        let store = InMemoryBookingStore::new();
        // Second installment due in 5 days, final payment in 35.
        store.store(booking("b-1", "accepted", Some(65))).await.unwrap();
        let engine = engine_with(store.clone());
        let card = test_card();

        let receipt = engine.pay_milestone("b-1", 1, &card, now()).await.unwrap();
        assert_eq!(receipt.amount, dec!(200));
        assert_eq!(receipt.message, "Your deposit has been processed successfully.");
        let statuses: Vec<_> = receipt.schedule.milestones().iter().map(|m| m.status).collect();
        assert_eq!(
            statuses,
            vec![
                MilestoneStatus::Paid,
                MilestoneStatus::Current,
                MilestoneStatus::Upcoming
            ]
        );

        let receipt = engine.pay_milestone("b-1", 2, &card, now()).await.unwrap();
        assert_eq!(receipt.amount, dec!(300));
        assert_eq!(receipt.schedule.milestones()[1].status, MilestoneStatus::Paid);
        // Final payment due in 35 days, outside the seven day window.
        assert_eq!(receipt.schedule.milestones()[2].status, MilestoneStatus::Upcoming);

        let later = now() + Duration::days(30);
        let receipt = engine.pay_milestone("b-1", 3, &card, later).await.unwrap();
        assert_eq!(receipt.amount, dec!(500));
        assert!(receipt.schedule.is_fully_paid());

        let stored = store.get("b-1").await.unwrap().unwrap();
        assert_eq!(stored.status, "confirmed");
        assert_eq!(stored.payment_status.as_deref(), Some("completed"));
        assert_eq!(stored.deposit_paid, Some(true));
        assert_eq!(stored.confirmed_at, Some(later));
    }

    #[tokio::test]
    async fn test_declined_card_leaves_booking_untouched() {
        let store = InMemoryBookingStore::new();
        let original = booking("b-1", "accepted", None);
        store.store(original.clone()).await.unwrap();
        let engine = engine_with(store.clone());

        let card = CardDetails::new("Test Traveler", "4000000000000002", "12/30", "123").unwrap();
        let result = engine.pay_milestone("b-1", 1, &card, now()).await;
        assert!(matches!(result, Err(PaymentError::CardDeclined)));
        assert_eq!(store.get("b-1").await.unwrap().unwrap(), original);
    }

    #[tokio::test]
    async fn test_milestones_must_be_paid_in_order() {
        let store = InMemoryBookingStore::new();
        store.store(booking("b-1", "accepted", Some(65))).await.unwrap();
        let engine = engine_with(store);

        let result = engine.pay_milestone("b-1", 3, &test_card(), now()).await;
        assert!(matches!(
            result,
            Err(PaymentError::MilestoneNotPayable { milestone: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_pending_booking_cannot_be_paid() {
        let store = InMemoryBookingStore::new();
        store.store(booking("b-1", "pending", None)).await.unwrap();
        let engine = engine_with(store);

        let result = engine.pay_milestone("b-1", 1, &test_card(), now()).await;
        match result {
            Err(PaymentError::MilestoneNotPayable { reason, .. }) => {
                assert_eq!(reason, "booking is pending")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_milestone() {
        let store = InMemoryBookingStore::new();
        store.store(booking("b-1", "accepted", None)).await.unwrap();
        let engine = engine_with(store);

        let result = engine.pay_milestone("b-1", 4, &test_card(), now()).await;
        assert!(matches!(result, Err(PaymentError::UnknownMilestone(4))));
    }

    #[tokio::test]
    async fn test_missing_booking_reported_before_milestone() {
        let engine = engine_with(InMemoryBookingStore::new());

        let result = engine.pay_milestone("missing", 4, &test_card(), now()).await;
        assert!(matches!(result, Err(PaymentError::BookingNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_seed_keeps_existing_booking() {
        let store = InMemoryBookingStore::new();
        let engine = engine_with(store.clone());

        assert!(engine.seed_booking(booking("b-1", "accepted", None)).await.unwrap());
        engine.pay_milestone("b-1", 1, &test_card(), now()).await.unwrap();
        assert!(!engine.seed_booking(booking("b-1", "accepted", None)).await.unwrap());

        let stored = store.get("b-1").await.unwrap().unwrap();
        assert_eq!(stored.payment_status.as_deref(), Some("deposit_paid"));
    }

    #[tokio::test]
    async fn test_overviews_are_ordered() {
        let store = InMemoryBookingStore::new();
        store.store(booking("b-2", "pending", None)).await.unwrap();
        store.store(booking("b-1", "pending", None)).await.unwrap();
        let engine = engine_with(store);

        let ids: Vec<String> = engine
            .overviews(now())
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.booking_id)
            .collect();
        assert_eq!(ids, vec!["b-1", "b-2"]);
    }
}
