use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Booking not found: {0}")]
    BookingNotFound(String),
    #[error("Unknown milestone: {0}")]
    UnknownMilestone(u8),
    #[error("Milestone {milestone} of booking {booking_id} cannot be paid: {reason}")]
    MilestoneNotPayable {
        booking_id: String,
        milestone: u8,
        reason: String,
    },
    #[error("Invalid card details: {0}")]
    InvalidCard(String),
    #[error("The card was declined")]
    CardDeclined,
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

#[cfg(feature = "storage-rocksdb")]
impl From<rocksdb::Error> for PaymentError {
    fn from(e: rocksdb::Error) -> Self {
        PaymentError::StorageError(e.to_string())
    }
}
