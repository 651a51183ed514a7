//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod community;
pub mod country;
pub mod country_step;
pub mod identity;
pub mod mentor;
pub mod progress;
pub mod provider;
pub mod session;
