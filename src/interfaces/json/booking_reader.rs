use crate::domain::booking::BookingRecord;
use crate::error::Result;
use serde::Deserialize;
use std::io::Read;

#[derive(Deserialize)]
#[serde(untagged)]
enum BookingDocument {
    Many(Vec<BookingRecord>),
    One(Box<BookingRecord>),
}

/// Reads booking records from JSON, as exported from the bookings table.
///
/// The document may hold a single booking object or an array of them.
pub struct BookingReader<R: Read> {
    source: R,
}

impl<R: Read> BookingReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn bookings(self) -> Result<Vec<BookingRecord>> {
        let document: BookingDocument = serde_json::from_reader(self.source)?;
        Ok(match document {
            BookingDocument::Many(bookings) => bookings,
            BookingDocument::One(booking) => vec![*booking],
        })
    }
}
