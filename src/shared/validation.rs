use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::shared::geo::GeoPoint;

lazy_static! {
    /// Regex for validating phone numbers
    /// Optional leading "+", then 9 to 15 digits; single spaces or hyphens may separate groups
    /// - Valid: "+34 600 123 456", "600123456", "+1-202-555-0143"
    /// - Invalid: "12345", "600-123-45a", "++34600123456", "600  123 456"
    pub static ref PHONE_REGEX: Regex =
        Regex::new(r"^\+?[0-9](?:[ -]?[0-9]){8,14}$").unwrap();
}

/// `validator` custom hook for `"lat,lng"` location fields
pub fn validate_location(location: &str) -> Result<(), ValidationError> {
    location.parse::<GeoPoint>().map(|_| ()).map_err(|e| {
        let mut err = ValidationError::new("location");
        err.message = Some(e.to_string().into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("+34 600 123 456"));
        assert!(PHONE_REGEX.is_match("600123456"));
        assert!(PHONE_REGEX.is_match("+1-202-555-0143"));
        assert!(PHONE_REGEX.is_match("912345678"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("12345")); // too short
        assert!(!PHONE_REGEX.is_match("600-123-45a")); // letter
        assert!(!PHONE_REGEX.is_match("++34600123456")); // double plus
        assert!(!PHONE_REGEX.is_match("600  123 456")); // double space
        assert!(!PHONE_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_validate_location() {
        assert!(validate_location("40.4168,-3.7038").is_ok());

        let err = validate_location("somewhere").unwrap_err();
        assert_eq!(err.code, "location");
        assert!(err.message.is_some());
    }
}
