pub mod filtering;
pub mod store_state;
pub use store_state::{Scope, ScopeStatus};
pub mod inventory_store;
pub use inventory_store::{FilterChips, InventoryStore, StoreSettings};
pub mod favorites;
pub mod alerts;
pub mod catalog;
pub mod selection;
