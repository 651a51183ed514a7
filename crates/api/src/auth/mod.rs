//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`oauth`] -- The external identity provider boundary.
//! - [`oauth_state`] -- Signed `state` values binding a callback to its browser.
//! - [`session_events`] -- In-process sign-in / sign-out notifications.

pub mod jwt;
pub mod oauth;
pub mod oauth_state;
pub mod session_events;
