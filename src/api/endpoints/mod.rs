//! API endpoint handlers, one module per feature area.

pub mod drugs;
pub mod health;
pub mod pdf;
pub mod prescriptions;
pub mod stores;
pub mod upload;
