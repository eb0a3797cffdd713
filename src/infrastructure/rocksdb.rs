use crate::domain::booking::BookingRecord;
use crate::domain::ports::BookingStore;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing booking records.
pub const CF_BOOKINGS: &str = "bookings";

/// A persistent booking store backed by RocksDB.
///
/// Bookings live in their own column family, keyed by booking id and stored
/// as JSON so the record shape matches what the backend returns.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_bookings = ColumnFamilyDescriptor::new(CF_BOOKINGS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_bookings])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn missing_cf() -> PaymentError {
        PaymentError::InternalError(Box::new(std::io::Error::other(
            "Bookings column family not found",
        )))
    }
}

#[async_trait]
impl BookingStore for RocksDBStore {
    async fn store(&self, booking: BookingRecord) -> Result<()> {
        let cf = self.db.cf_handle(CF_BOOKINGS).ok_or_else(Self::missing_cf)?;
        let value = serde_json::to_vec(&booking)?;
        self.db.put_cf(&cf, booking.id.as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, booking_id: &str) -> Result<Option<BookingRecord>> {
        let cf = self.db.cf_handle(CF_BOOKINGS).ok_or_else(Self::missing_cf)?;
        match self.db.get_cf(&cf, booking_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<BookingRecord>> {
        let cf = self.db.cf_handle(CF_BOOKINGS).ok_or_else(Self::missing_cf)?;

        let mut bookings = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item?;
            bookings.push(serde_json::from_slice(&value)?);
        }

        Ok(bookings)
    }
}
