pub mod inventory;
pub mod alerts;
pub mod projects;
pub mod filters;
pub mod forms;
