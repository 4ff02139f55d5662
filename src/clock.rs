//! Live clock display formatting
//!
//! The host reads wall-clock time from the browser `Date`; only the
//! zero-padded `HH:MM:SS` rendering lives here.

/// Format hours/minutes/seconds as `HH:MM:SS`
pub fn format_clock(hours: u32, minutes: u32, seconds: u32) -> String {
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Text shown in place of the time when the host clock is unreadable
pub const CLOCK_ERROR_TEXT: &str = "Clock Error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_single_digits() {
        assert_eq!(format_clock(9, 5, 7), "09:05:07");
    }

    #[test]
    fn test_midnight() {
        assert_eq!(format_clock(0, 0, 0), "00:00:00");
    }

    #[test]
    fn test_end_of_day() {
        assert_eq!(format_clock(23, 59, 59), "23:59:59");
    }
}
