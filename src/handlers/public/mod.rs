pub mod auth;
pub mod careers;
pub mod jobs;
