pub mod capture_source;
pub mod delegate;
pub mod sample_tap;
pub mod transport;
