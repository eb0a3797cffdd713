//! Adapters for the domain ports: booking storage and payment processing.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod simulated_processor;
