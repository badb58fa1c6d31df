mod auth_service;
mod token_service;

pub use auth_service::{insert_user, AuthService};
pub use token_service::TokenService;
