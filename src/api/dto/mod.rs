pub mod services;
pub mod users;
