pub mod error;
pub mod persistence;
