pub mod admin;
pub mod auth;
pub mod catalog;
pub mod country_steps;
pub mod plan;
pub mod progress;
pub mod wizard;
