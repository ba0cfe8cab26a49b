pub mod core_api;
pub mod location;
pub mod records;
