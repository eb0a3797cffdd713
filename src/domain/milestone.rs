use super::progress::PaymentProgress;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A milestone becomes `current` once its due date is closer than this.
pub const CURRENT_WINDOW_DAYS: i64 = 7;

const DEPOSIT_DUE_IN_DAYS: i64 = 3;
const SECOND_DUE_BEFORE_TRIP_DAYS: i64 = 60;
const SECOND_DUE_IN_DAYS: i64 = 30;
const FINAL_DUE_BEFORE_TRIP_DAYS: i64 = 30;
const FINAL_DUE_IN_DAYS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneStatus {
    Paid,
    Current,
    Upcoming,
    Overdue,
}

impl MilestoneStatus {
    /// Whether the milestone can be collected right now.
    pub fn is_payable(self) -> bool {
        matches!(self, Self::Current | Self::Overdue)
    }
}

/// The three fixed stages of every payment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneKind {
    Deposit,
    SecondInstallment,
    FinalPayment,
}

impl MilestoneKind {
    pub const ALL: [MilestoneKind; 3] = [
        MilestoneKind::Deposit,
        MilestoneKind::SecondInstallment,
        MilestoneKind::FinalPayment,
    ];

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Deposit),
            2 => Some(Self::SecondInstallment),
            3 => Some(Self::FinalPayment),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Self::Deposit => 1,
            Self::SecondInstallment => 2,
            Self::FinalPayment => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Deposit => "Deposit Payment",
            Self::SecondInstallment => "Second Installment",
            Self::FinalPayment => "Final Payment",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Deposit => "Secure your spot with a deposit",
            Self::SecondInstallment => "Pay 30% of the total amount",
            Self::FinalPayment => "Complete your payment before the trip",
        }
    }

    pub fn percentage(self) -> u8 {
        match self {
            Self::Deposit => 20,
            Self::SecondInstallment => 30,
            Self::FinalPayment => 50,
        }
    }

    fn due_date(self, trip_start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
        match (self, trip_start) {
            (Self::Deposit, _) => now + Duration::days(DEPOSIT_DUE_IN_DAYS),
            (Self::SecondInstallment, Some(start)) => {
                start - Duration::days(SECOND_DUE_BEFORE_TRIP_DAYS)
            }
            (Self::SecondInstallment, None) => now + Duration::days(SECOND_DUE_IN_DAYS),
            (Self::FinalPayment, Some(start)) => {
                start - Duration::days(FINAL_DUE_BEFORE_TRIP_DAYS)
            }
            (Self::FinalPayment, None) => now + Duration::days(FINAL_DUE_IN_DAYS),
        }
    }
}

/// One scheduled partial payment. Recomputed on every calculation, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMilestone {
    pub id: u8,
    pub name: String,
    pub description: String,
    pub amount: Decimal,
    pub percentage: u8,
    pub due_date: DateTime<Utc>,
    pub status: MilestoneStatus,
}

impl PaymentMilestone {
    fn new(
        kind: MilestoneKind,
        amount: Decimal,
        due_date: DateTime<Utc>,
        status: MilestoneStatus,
    ) -> Self {
        Self {
            id: kind.id(),
            name: kind.name().to_string(),
            description: kind.description().to_string(),
            amount,
            percentage: kind.percentage(),
            due_date,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub total_paid: Decimal,
    pub total_amount: Decimal,
    pub progress_percentage: Decimal,
}

/// The ordered deposit, second and final milestones of one booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSchedule {
    milestones: [PaymentMilestone; 3],
}

impl PaymentSchedule {
    pub fn milestones(&self) -> &[PaymentMilestone] {
        &self.milestones
    }

    pub fn milestone(&self, id: u8) -> Option<&PaymentMilestone> {
        self.milestones.iter().find(|m| m.id == id)
    }

    /// Milestones are stored in plan order, so every kind has a slot.
    pub fn milestone_of(&self, kind: MilestoneKind) -> &PaymentMilestone {
        &self.milestones[usize::from(kind.id() - 1)]
    }

    /// The first milestone that can be collected, if any.
    pub fn next_payable(&self) -> Option<&PaymentMilestone> {
        self.milestones.iter().find(|m| m.status.is_payable())
    }

    pub fn is_fully_paid(&self) -> bool {
        self.milestones
            .iter()
            .all(|m| m.status == MilestoneStatus::Paid)
    }

    pub fn summary(&self) -> ScheduleSummary {
        let total_paid: Decimal = self
            .milestones
            .iter()
            .filter(|m| m.status == MilestoneStatus::Paid)
            .map(|m| m.amount)
            .sum();
        let total_amount: Decimal = self.milestones.iter().map(|m| m.amount).sum();
        let progress_percentage = if total_amount > Decimal::ZERO {
            total_paid / total_amount * dec!(100)
        } else {
            Decimal::ZERO
        };

        ScheduleSummary {
            total_paid,
            total_amount,
            progress_percentage,
        }
    }
}

/// Rounds half up to a whole currency unit, the way `Math.round` does.
fn round_half_up(value: Decimal) -> Decimal {
    (value + dec!(0.5)).floor()
}

fn share_of(total: Decimal, kind: MilestoneKind) -> Decimal {
    round_half_up(total * Decimal::new(i64::from(kind.percentage()), 2))
}

fn gated_status(
    kind: MilestoneKind,
    progress: PaymentProgress,
    previous: MilestoneStatus,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> MilestoneStatus {
    if progress.covers(kind) {
        MilestoneStatus::Paid
    } else if previous != MilestoneStatus::Paid {
        MilestoneStatus::Upcoming
    } else if due_date < now {
        MilestoneStatus::Overdue
    } else if due_date - now < Duration::days(CURRENT_WINDOW_DAYS) {
        MilestoneStatus::Current
    } else {
        MilestoneStatus::Upcoming
    }
}

/// Builds the three-stage payment plan for a booking.
///
/// Deposit and second installment are rounded shares of `total_price`; the
/// final payment takes the remainder so the amounts always add up to the
/// total. A milestone only becomes `current` or `overdue` once the one before
/// it is `paid`.
///
/// Without a `trip_start` the second and final due dates are offsets from
/// `now` instead of from departure.
pub fn calculate_milestones(
    total_price: Decimal,
    trip_start: Option<DateTime<Utc>>,
    progress: PaymentProgress,
    now: DateTime<Utc>,
) -> PaymentSchedule {
    let deposit_due = MilestoneKind::Deposit.due_date(trip_start, now);
    let deposit_status = if progress.covers(MilestoneKind::Deposit) {
        MilestoneStatus::Paid
    } else if deposit_due < now {
        MilestoneStatus::Overdue
    } else {
        MilestoneStatus::Current
    };
    let deposit_amount = share_of(total_price, MilestoneKind::Deposit);

    let second_due = MilestoneKind::SecondInstallment.due_date(trip_start, now);
    let second_status = gated_status(
        MilestoneKind::SecondInstallment,
        progress,
        deposit_status,
        second_due,
        now,
    );
    let second_amount = share_of(total_price, MilestoneKind::SecondInstallment);

    let final_due = MilestoneKind::FinalPayment.due_date(trip_start, now);
    let final_status = gated_status(
        MilestoneKind::FinalPayment,
        progress,
        second_status,
        final_due,
        now,
    );
    let final_amount = total_price - deposit_amount - second_amount;

    tracing::debug!(
        %total_price,
        ?progress,
        has_trip_start = trip_start.is_some(),
        "Calculated payment milestones"
    );

    PaymentSchedule {
        milestones: [
            PaymentMilestone::new(
                MilestoneKind::Deposit,
                deposit_amount,
                deposit_due,
                deposit_status,
            ),
            PaymentMilestone::new(
                MilestoneKind::SecondInstallment,
                second_amount,
                second_due,
                second_status,
            ),
            PaymentMilestone::new(
                MilestoneKind::FinalPayment,
                final_amount,
                final_due,
                final_status,
            ),
        ],
    }
}

/// Same as [`calculate_milestones`], starting from the raw booking fields.
pub fn calculate_payment_milestones(
    total_price: Decimal,
    trip_start: Option<DateTime<Utc>>,
    booking_status: &str,
    payment_status: Option<&str>,
    deposit_paid: Option<bool>,
    now: DateTime<Utc>,
) -> PaymentSchedule {
    let progress =
        PaymentProgress::from_booking_fields(booking_status, payment_status, deposit_paid);
    calculate_milestones(total_price, trip_start, progress, now)
}
