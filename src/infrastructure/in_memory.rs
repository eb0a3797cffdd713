use crate::domain::booking::BookingRecord;
use crate::domain::ports::BookingStore;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for bookings.
///
/// Uses `Arc<RwLock<HashMap<String, BookingRecord>>>` so clones share the same
/// records. Used when no persistent database is configured, and in tests.
#[derive(Default, Clone)]
pub struct InMemoryBookingStore {
    bookings: Arc<RwLock<HashMap<String, BookingRecord>>>,
}

impl InMemoryBookingStore {
    /// Creates a new, empty in-memory booking store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn store(&self, booking: BookingRecord) -> Result<()> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn get(&self, booking_id: &str) -> Result<Option<BookingRecord>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(booking_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<BookingRecord>> {
        let bookings = self.bookings.read().await;
        let mut all: Vec<BookingRecord> = bookings.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }
}
