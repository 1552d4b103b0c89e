//! Human-readable date stamps stored on entities.
//!
//! Dates are display strings, not timestamps; they are written once at
//! creation (or edit) time and never parsed back.

use chrono::Local;

/// Calendar date, e.g. `3/14/2025`.
pub fn date_stamp() -> String {
    Local::now().format("%-m/%-d/%Y").to_string()
}

/// Date and time, e.g. `3/14/2025, 9:26:53 PM`.
pub fn datetime_stamp() -> String {
    Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_are_not_empty() {
        assert_eq!(date_stamp().matches('/').count(), 2);
        assert!(datetime_stamp().contains(", "));
    }
}
