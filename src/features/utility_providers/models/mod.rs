mod utility_provider;

pub use utility_provider::{CreateUtilityProvider, UtilityProvider};
