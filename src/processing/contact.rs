//! Contact details found in a resume

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("Invalid email regex")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("Invalid phone regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

/// First email address and first phone number in `text`
pub fn extract_contact_info(text: &str) -> ContactInfo {
    ContactInfo {
        email: extract_email(text),
        phone: extract_phone(text),
    }
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE.find_iter(text).find_map(|m| {
        // Must not start in the middle of a longer number
        let preceded_by_digit = text[..m.start()].chars().next_back().is_some_and(|c| c.is_ascii_digit());
        (!preceded_by_digit).then(|| m.as_str().trim().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_email() {
        let text = "Jane Doe | jane.doe+jobs@example.co.uk | Berlin";
        assert_eq!(extract_email(text).as_deref(), Some("jane.doe+jobs@example.co.uk"));
    }

    #[test]
    fn test_extracts_common_phone_formats() {
        assert_eq!(extract_phone("Call 555-123-4567 today").as_deref(), Some("555-123-4567"));
        assert_eq!(extract_phone("Phone: (555) 123 4567").as_deref(), Some("(555) 123 4567"));
        assert_eq!(extract_phone("Mobile +91 9876543210").as_deref(), Some("+91 9876543210"));
    }

    #[test]
    fn test_year_ranges_are_not_phones() {
        assert_eq!(extract_phone("Worked 2019 - 2023 at Acme"), None);
    }

    #[test]
    fn test_missing_contact_info() {
        let info = extract_contact_info("No contact details here");
        assert!(info.is_empty());
    }

    #[test]
    fn test_extract_contact_info() {
        let info = extract_contact_info("john@example.com\n555.867.5309");
        assert_eq!(info.email.as_deref(), Some("john@example.com"));
        assert_eq!(info.phone.as_deref(), Some("555.867.5309"));
    }
}
