pub mod envelope;
pub mod error;
pub mod types;
