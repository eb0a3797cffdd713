use rust_decimal_macros::dec;
use std::time::Duration;
use trippay::config::TEST_CARD_NUMBER;
use trippay::domain::booking::BookingRecord;
use trippay::domain::card::CardDetails;
use trippay::domain::ports::{BookingStoreBox, PaymentProcessorBox};
use trippay::infrastructure::in_memory::InMemoryBookingStore;
use trippay::infrastructure::simulated_processor::SimulatedCardProcessor;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let booking_store: BookingStoreBox = Box::new(InMemoryBookingStore::new());
    let processor: PaymentProcessorBox =
        Box::new(SimulatedCardProcessor::new(TEST_CARD_NUMBER, Duration::ZERO));

    let booking: BookingRecord =
        serde_json::from_str(r#"{"id": "b-1", "status": "accepted"}"#).unwrap();
    let card = CardDetails::new("Test Traveler", TEST_CARD_NUMBER, "12/30", "123").unwrap();

    // Verify Send + Sync by spawning tasks
    let store_handle = tokio::spawn(async move {
        booking_store.store(booking).await.unwrap();
        booking_store.get("b-1").await.unwrap().unwrap()
    });

    let processor_handle =
        tokio::spawn(async move { processor.charge(&card, dec!(200)).await.is_ok() });

    let retrieved = store_handle.await.unwrap();
    assert_eq!(retrieved.id, "b-1");
    assert!(processor_handle.await.unwrap());
}
