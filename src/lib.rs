// src/lib.rs

pub mod api;
pub mod common;
pub mod config;
pub mod models;
pub mod services;

pub use common::error::AppError;
pub use services::InventoryStore;
