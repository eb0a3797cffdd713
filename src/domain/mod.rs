//! Domain layer: the payment plan calculator and the booking-side types it
//! reads from, plus the ports the application layer talks through.

pub mod booking;
pub mod card;
pub mod countdown;
pub mod milestone;
pub mod ports;
pub mod progress;
