pub mod provider_handler;

pub use provider_handler::*;
