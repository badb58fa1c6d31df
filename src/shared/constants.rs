/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum length of a report title
pub const MAX_TITLE_LENGTH: u64 = 200;

/// Maximum length of a report description
pub const MAX_DESCRIPTION_LENGTH: u64 = 5000;

/// Maximum length of a report's place name
pub const MAX_LOCATION_NAME_LENGTH: u64 = 300;
