//! Countdown timer widget state
//!
//! One `Countdown` per `.timer` element on the page. The host drives
//! `tick` once per second while the countdown is running and renders
//! `display()` into the widget; all borrow/finish logic is pure.

use thiserror::Error;

/// Hours/minutes/seconds with the valid display ranges enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimePartsError {
    #[error("hours {0} outside 0-23")]
    Hours(i64),
    #[error("minutes {0} outside 0-59")]
    Minutes(i64),
    #[error("seconds {0} outside 0-59")]
    Seconds(i64),
}

impl TimeParts {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Result<Self, TimePartsError> {
        if hours > 23 {
            return Err(TimePartsError::Hours(hours.into()));
        }
        if minutes > 59 {
            return Err(TimePartsError::Minutes(minutes.into()));
        }
        if seconds > 59 {
            return Err(TimePartsError::Seconds(seconds.into()));
        }
        Ok(Self {
            hours,
            minutes,
            seconds,
        })
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

/// Fallback initial time when a widget's configuration is invalid
pub const FALLBACK_TIME: TimeParts = TimeParts {
    hours: 0,
    minutes: 1,
    seconds: 0,
};

/// A single countdown timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    initial: TimeParts,
    current: TimeParts,
    running: bool,
    finished: bool,
}

impl Countdown {
    pub fn new(initial: TimeParts) -> Self {
        Self {
            initial,
            current: initial,
            running: false,
            finished: false,
        }
    }

    /// Build from the widget's `data-hours`/`data-minutes`/`data-seconds`
    /// attributes. A missing or non-numeric attribute counts as 0; an
    /// out-of-range value, negative included, is a configuration error
    /// the caller handles by falling back to [`FALLBACK_TIME`].
    pub fn from_attrs(
        hours: Option<String>,
        minutes: Option<String>,
        seconds: Option<String>,
    ) -> Result<Self, TimePartsError> {
        let hours = parse_attr(hours.as_deref());
        let minutes = parse_attr(minutes.as_deref());
        let seconds = parse_attr(seconds.as_deref());
        if !(0..=23).contains(&hours) {
            return Err(TimePartsError::Hours(hours));
        }
        if !(0..=59).contains(&minutes) {
            return Err(TimePartsError::Minutes(minutes));
        }
        if !(0..=59).contains(&seconds) {
            return Err(TimePartsError::Seconds(seconds));
        }
        // Range checks above make the casts lossless
        let parts = TimeParts::new(hours as u32, minutes as u32, seconds as u32)?;
        Ok(Self::new(parts))
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current time as `HH:MM:SS`
    pub fn display(&self) -> String {
        crate::clock::format_clock(
            self.current.hours,
            self.current.minutes,
            self.current.seconds,
        )
    }

    /// Decrement by one second, borrowing from the next larger unit.
    /// A tick at 00:00:00 finishes the countdown instead of wrapping.
    /// No-ops unless running.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        let t = &mut self.current;
        if t.seconds > 0 {
            t.seconds -= 1;
        } else if t.minutes > 0 {
            t.minutes -= 1;
            t.seconds = 59;
        } else if t.hours > 0 {
            t.hours -= 1;
            t.minutes = 59;
            t.seconds = 59;
        } else {
            self.running = false;
            self.finished = true;
        }
    }

    /// Start ticking; restarting a running countdown is a no-op
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.finished = false;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and restore the configured initial time
    pub fn reset(&mut self) {
        self.running = false;
        self.finished = false;
        self.current = self.initial;
    }
}

/// Lenient attribute parse: absent or unparseable values become 0,
/// matching how the widget treats a missing `data-*` attribute. The
/// sign is preserved so negative configuration is rejected, not
/// silently zeroed.
fn parse_attr(value: Option<&str>) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(h: u32, m: u32, s: u32) -> Countdown {
        let mut c = Countdown::new(TimeParts::new(h, m, s).unwrap());
        c.start();
        c
    }

    #[test]
    fn test_simple_decrement() {
        let mut c = running(0, 0, 10);
        c.tick();
        assert_eq!(c.display(), "00:00:09");
    }

    #[test]
    fn test_borrows_from_minutes() {
        let mut c = running(0, 1, 0);
        c.tick();
        assert_eq!(c.display(), "00:00:59");
    }

    #[test]
    fn test_borrows_from_hours() {
        let mut c = running(1, 0, 0);
        c.tick();
        assert_eq!(c.display(), "00:59:59");
    }

    #[test]
    fn test_finishes_one_tick_after_reaching_zero() {
        let mut c = running(0, 0, 1);
        c.tick();
        assert_eq!(c.display(), "00:00:00");
        assert!(!c.is_finished());
        c.tick();
        assert!(c.is_finished());
        assert!(!c.is_running());
        assert_eq!(c.display(), "00:00:00");
    }

    #[test]
    fn test_stop_halts_ticks() {
        let mut c = running(0, 0, 10);
        c.tick();
        c.stop();
        c.tick();
        c.tick();
        assert_eq!(c.display(), "00:00:09");
    }

    #[test]
    fn test_reset_restores_initial_time() {
        let mut c = running(0, 2, 30);
        for _ in 0..10 {
            c.tick();
        }
        c.reset();
        assert_eq!(c.display(), "00:02:30");
        assert!(!c.is_running());
        assert!(!c.is_finished());
    }

    #[test]
    fn test_start_clears_finished_flag() {
        let mut c = running(0, 0, 0);
        c.tick();
        assert!(c.is_finished());
        c.start();
        assert!(!c.is_finished());
    }

    #[test]
    fn test_from_attrs_defaults_missing_values_to_zero() {
        let c = Countdown::from_attrs(None, Some("5".into()), Some("garbage".into())).unwrap();
        assert_eq!(c.display(), "00:05:00");
    }

    #[test]
    fn test_from_attrs_rejects_out_of_range() {
        assert_eq!(
            Countdown::from_attrs(Some("24".into()), None, None).unwrap_err(),
            TimePartsError::Hours(24)
        );
        assert_eq!(
            Countdown::from_attrs(None, Some("60".into()), None).unwrap_err(),
            TimePartsError::Minutes(60)
        );
    }

    #[test]
    fn test_from_attrs_rejects_negative_values() {
        assert_eq!(
            Countdown::from_attrs(Some("-5".into()), None, None).unwrap_err(),
            TimePartsError::Hours(-5)
        );
        assert_eq!(
            Countdown::from_attrs(None, Some("-1".into()), None).unwrap_err(),
            TimePartsError::Minutes(-1)
        );
        assert_eq!(
            Countdown::from_attrs(None, None, Some("-30".into())).unwrap_err(),
            TimePartsError::Seconds(-30)
        );
    }

    #[test]
    fn test_from_attrs_rejects_values_past_u32() {
        // A value too big for u32 must not truncate into the valid range
        assert_eq!(
            Countdown::from_attrs(Some("4294967296".into()), None, None).unwrap_err(),
            TimePartsError::Hours(4294967296)
        );
    }

    #[test]
    fn test_fallback_time_is_one_minute() {
        assert_eq!(Countdown::new(FALLBACK_TIME).display(), "00:01:00");
    }
}
