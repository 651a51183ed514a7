pub mod catalog;
pub mod error;
pub mod form;
pub mod ordering;
pub mod paging;
pub mod plan;
pub mod progress;
pub mod return_action;
pub mod roles;
pub mod session;
pub mod types;
pub mod wizard;
