use super::milestone::MilestoneKind;
use serde::{Deserialize, Serialize};

pub const STATUS_CONFIRMED: &str = "confirmed";
pub const PAYMENT_PAID: &str = "paid";
pub const PAYMENT_DEPOSIT_PAID: &str = "deposit_paid";
pub const PAYMENT_PARTIAL_PAID: &str = "partial_paid";
pub const PAYMENT_COMPLETED: &str = "completed";

/// How far a booking has progressed through its payment plan.
///
/// Bookings carry three loosely related fields (`status`, `payment_status`
/// and `deposit_paid`). They are folded into this single value once, at the
/// boundary, and every milestone decision is taken from it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProgress {
    #[default]
    NotStarted,
    DepositPaid,
    PartiallyPaid,
    FullyPaid,
}

impl PaymentProgress {
    /// Derives the progress from the raw booking fields, keeping the furthest
    /// stage any of them implies.
    pub fn from_booking_fields(
        booking_status: &str,
        payment_status: Option<&str>,
        deposit_paid: Option<bool>,
    ) -> Self {
        let from_payment = match payment_status.map(str::trim) {
            Some(PAYMENT_COMPLETED) => Self::FullyPaid,
            Some(PAYMENT_PARTIAL_PAID) => Self::PartiallyPaid,
            Some(PAYMENT_PAID) | Some(PAYMENT_DEPOSIT_PAID) => Self::DepositPaid,
            Some(other) => {
                if !other.is_empty() {
                    tracing::debug!(payment_status = other, "Unrecognized payment status");
                }
                Self::NotStarted
            }
            None => Self::NotStarted,
        };

        let from_booking = if booking_status.trim() == STATUS_CONFIRMED {
            Self::DepositPaid
        } else {
            Self::NotStarted
        };

        let from_flag = if deposit_paid.unwrap_or(false) {
            Self::DepositPaid
        } else {
            Self::NotStarted
        };

        from_payment.max(from_booking).max(from_flag)
    }

    /// Number of installments settled, 0 through 3.
    pub fn paid_installments(self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::DepositPaid => 1,
            Self::PartiallyPaid => 2,
            Self::FullyPaid => 3,
        }
    }

    pub fn covers(self, kind: MilestoneKind) -> bool {
        self.paid_installments() >= kind.id()
    }
}
