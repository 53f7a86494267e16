pub mod error;
pub mod service_repo;
pub mod user_repo;

pub use error::RepoError;
pub use service_repo::{NewService, PgServiceRepo, ServicePatch, ServiceRepo, ServiceRow};
pub use user_repo::{NewUser, PgUserRepo, UserRepo, UserRow};
