//! Application layer orchestrating bookings, schedules and payments.
//!
//! This module defines the `PaymentEngine`, the entry point that loads
//! bookings through the store port, derives their payment schedules and
//! pushes milestone payments through the processor port.

pub mod engine;
