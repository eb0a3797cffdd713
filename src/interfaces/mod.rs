//! Input and output formats: booking JSON in, schedule CSV out.

pub mod csv;
pub mod json;
