#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

pub const NOW: &str = "2026-03-01T12:00:00Z";
pub const TEST_CARD: &str = "4242 4242 4242 4242";
pub const DECLINED_CARD: &str = "4000 0000 0000 0002";

/// A booking row as the backend returns it, with its joined listing.
pub fn booking_json(
    id: &str,
    status: &str,
    price: Option<u32>,
    start_date: Option<&str>,
) -> String {
    let price = price.map_or("null".to_string(), |p| p.to_string());
    let start_date = start_date.map_or("null".to_string(), |d| format!("\"{d}\""));
    format!(
        r#"{{
            "id": "{id}",
            "listing_id": "l-{id}",
            "traveler_id": "t-1",
            "agent_id": "a-1",
            "status": "{status}",
            "traveler_notes": "Vegetarian meals please",
            "requested_at": "2026-02-20T09:00:00Z",
            "payment_status": null,
            "deposit_paid": false,
            "listing": {{
                "id": "l-{id}",
                "title": "Sabah Island Hopping",
                "destination": "Semporna",
                "price_min": {price},
                "price_max": null,
                "currency": "MYR",
                "start_date": {start_date},
                "end_date": null
            }}
        }}"#
    )
}

pub fn bookings_file(bookings: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[{}]", bookings.join(",")).unwrap();
    file.flush().unwrap();
    file
}
