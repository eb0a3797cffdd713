use super::milestone::MilestoneKind;
use super::progress::{
    PAYMENT_COMPLETED, PAYMENT_DEPOSIT_PAID, PAYMENT_PARTIAL_PAID, PaymentProgress,
    STATUS_CONFIRMED,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_PENDING_PAYMENT: &str = "pending_payment";
pub const STATUS_PENDING: &str = "pending";

/// Listing columns joined onto a booking row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub destination: String,
    #[serde(default)]
    pub price_min: Option<Decimal>,
    #[serde(default)]
    pub price_max: Option<Decimal>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// A traveler's booking of a travel group, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: String,
    #[serde(default)]
    pub listing_id: String,
    #[serde(default)]
    pub traveler_id: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default = "pending_status", deserialize_with = "status_or_pending")]
    pub status: String,
    #[serde(default)]
    pub traveler_notes: Option<String>,
    #[serde(default)]
    pub requested_at: Option<String>,
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub deposit_paid: Option<bool>,
    #[serde(default)]
    pub listing: Option<ListingSummary>,
}

fn pending_status() -> String {
    STATUS_PENDING.to_string()
}

/// A null status is read the same as a missing one.
fn status_or_pending<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let status = Option::<String>::deserialize(deserializer)?;
    Ok(status.unwrap_or_else(pending_status))
}

/// Calculator inputs extracted from a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentInputs {
    pub total_price: Decimal,
    pub trip_start: Option<DateTime<Utc>>,
    pub progress: PaymentProgress,
}

/// Payment fields written back to a booking after a successful payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingUpdate {
    pub payment_status: String,
    pub status: String,
    pub deposit_paid: bool,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl BookingUpdate {
    pub fn for_milestone(kind: MilestoneKind, paid_at: DateTime<Utc>) -> Self {
        match kind {
            MilestoneKind::Deposit => Self {
                payment_status: PAYMENT_DEPOSIT_PAID.to_string(),
                status: STATUS_ACCEPTED.to_string(),
                deposit_paid: true,
                confirmed_at: None,
            },
            MilestoneKind::SecondInstallment => Self {
                payment_status: PAYMENT_PARTIAL_PAID.to_string(),
                status: STATUS_ACCEPTED.to_string(),
                deposit_paid: true,
                confirmed_at: None,
            },
            MilestoneKind::FinalPayment => Self {
                payment_status: PAYMENT_COMPLETED.to_string(),
                status: STATUS_CONFIRMED.to_string(),
                deposit_paid: true,
                confirmed_at: Some(paid_at),
            },
        }
    }
}

impl BookingRecord {
    pub fn payment_inputs(&self, fallback_price: Decimal) -> PaymentInputs {
        let listing = self.listing.as_ref();
        let total_price = listing
            .and_then(|l| l.price_min)
            .filter(|price| *price > Decimal::ZERO)
            .unwrap_or(fallback_price);
        let trip_start = listing
            .and_then(|l| l.start_date.as_deref())
            .and_then(|raw| {
                let parsed = parse_trip_date(raw);
                if parsed.is_none() {
                    tracing::warn!(
                        booking_id = %self.id,
                        start_date = raw,
                        "Ignoring unparsable trip start date"
                    );
                }
                parsed
            });
        let progress = PaymentProgress::from_booking_fields(
            &self.status,
            self.payment_status.as_deref(),
            self.deposit_paid,
        );

        PaymentInputs {
            total_price,
            trip_start,
            progress,
        }
    }

    pub fn trip_start(&self) -> Option<DateTime<Utc>> {
        self.listing
            .as_ref()
            .and_then(|l| l.start_date.as_deref())
            .and_then(parse_trip_date)
    }

    /// Only accepted bookings, or those explicitly awaiting payment, take payments.
    pub fn accepts_payments(&self) -> bool {
        matches!(self.status.as_str(), STATUS_PENDING_PAYMENT | STATUS_ACCEPTED)
    }

    pub fn apply(&mut self, update: BookingUpdate) {
        self.payment_status = Some(update.payment_status);
        self.status = update.status;
        self.deposit_paid = Some(update.deposit_paid);
        if let Some(confirmed_at) = update.confirmed_at {
            self.confirmed_at = Some(confirmed_at);
        }
    }
}

/// Parses a `YYYY-MM-DD` date (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_trip_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
