use crate::domain::milestone::{MilestoneStatus, PaymentMilestone, PaymentSchedule};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    booking_id: &'a str,
    milestone: u8,
    name: &'a str,
    amount: Decimal,
    percentage: u8,
    due_date: String,
    status: MilestoneStatus,
}

impl<'a> ScheduleRow<'a> {
    fn new(booking_id: &'a str, milestone: &'a PaymentMilestone) -> Self {
        Self {
            booking_id,
            milestone: milestone.id,
            name: &milestone.name,
            amount: milestone.amount,
            percentage: milestone.percentage,
            due_date: milestone.due_date.format("%Y-%m-%d").to_string(),
            status: milestone.status,
        }
    }
}

/// Writes payment schedules as CSV, one row per milestone.
///
/// Columns: `booking_id,milestone,name,amount,percentage,due_date,status`.
pub struct ScheduleWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ScheduleWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_schedule(&mut self, booking_id: &str, schedule: &PaymentSchedule) -> Result<()> {
        for milestone in schedule.milestones() {
            self.writer.serialize(ScheduleRow::new(booking_id, milestone))?;
        }
        Ok(())
    }

    /// Flushes buffered rows and hands back the underlying sink.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::PaymentError::IoError(e.into_error()))
    }
}
