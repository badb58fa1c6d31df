pub mod analytics;
pub mod auth;
pub mod employees;
pub mod maintenance_teams;
pub mod reports;
pub mod utility_providers;
