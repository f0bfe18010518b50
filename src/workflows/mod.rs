pub mod discovery;
pub mod listings;
pub mod tracking;
