//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod community_repo;
pub mod country_repo;
pub mod country_step_repo;
pub mod identity_repo;
pub mod mentor_repo;
pub mod progress_repo;
pub mod provider_repo;
pub mod session_repo;

pub use community_repo::CommunityRepo;
pub use country_repo::CountryRepo;
pub use country_step_repo::CountryStepRepo;
pub use identity_repo::IdentityRepo;
pub use mentor_repo::MentorRepo;
pub use progress_repo::ProgressRepo;
pub use provider_repo::ProviderRepo;
pub use session_repo::SessionRepo;
