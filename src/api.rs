pub mod backend;
pub use backend::InventoryApi;
pub mod auth;
pub use auth::{StaticToken, StoredToken, TokenSource};
pub mod rest_client;
pub use rest_client::RestClient;
