pub mod booking_reader;
