//! Widget settings
//!
//! Defaults match the page's stock behavior; a page can override them
//! with an inline JSON block:
//!
//! ```html
//! <script type="application/json" id="widget-settings">
//!   { "speed": 3, "initial_blocks": 8 }
//! </script>
//! ```
//!
//! Settings are read once at startup and never persisted.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Page-level widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bouncing block speed level (1-5, step in pixels per frame)
    pub speed: u32,
    /// Blocks spawned at startup
    pub initial_blocks: usize,
    /// Lower bound enforced by the remove control
    pub min_blocks: usize,
    /// Upper bound enforced by the add control
    pub max_blocks: usize,
    /// Block edge length in CSS pixels
    pub block_size: f32,
    /// Block colors, cycled through at spawn time
    pub palette: Vec<String>,

    /// Clock refresh interval
    pub clock_interval_ms: i32,
    /// Countdown tick interval
    pub countdown_interval_ms: i32,
    /// Slideshow rotation interval
    pub slide_interval_ms: i32,

    /// Show the FPS read-out
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            initial_blocks: INITIAL_BLOCKS,
            min_blocks: MIN_BLOCKS,
            max_blocks: MAX_BLOCKS,
            block_size: BLOCK_SIZE,
            palette: PALETTE.iter().map(|c| c.to_string()).collect(),
            clock_interval_ms: CLOCK_INTERVAL_MS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,
            slide_interval_ms: SLIDE_INTERVAL_MS,
            show_fps: true,
        }
    }
}

impl Settings {
    /// Id of the optional inline JSON override element
    pub const CONFIG_ELEMENT_ID: &'static str = "widget-settings";

    /// Step magnitude in pixels per frame for the current speed level
    pub fn step(&self) -> f32 {
        self.speed as f32 * BASE_STEP
    }

    /// Cycle the speed level: 1 → 2 → ... → 5 → 1
    pub fn cycle_speed(&mut self) {
        self.speed = if self.speed >= MAX_SPEED {
            MIN_SPEED
        } else {
            self.speed + 1
        };
    }

    /// Clamp nonsense overrides back into usable ranges, warning about
    /// each correction
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        if self.speed < MIN_SPEED || self.speed > MAX_SPEED {
            log::warn!(
                "settings: speed {} outside {}-{}, using {}",
                self.speed,
                MIN_SPEED,
                MAX_SPEED,
                defaults.speed
            );
            self.speed = defaults.speed;
        }
        if self.min_blocks == 0 || self.min_blocks > self.max_blocks {
            log::warn!(
                "settings: block bounds {}..{} invalid, using {}..{}",
                self.min_blocks,
                self.max_blocks,
                defaults.min_blocks,
                defaults.max_blocks
            );
            self.min_blocks = defaults.min_blocks;
            self.max_blocks = defaults.max_blocks;
        }
        if !(self.initial_blocks >= self.min_blocks && self.initial_blocks <= self.max_blocks) {
            log::warn!(
                "settings: initial_blocks {} outside {}..{}, using {}",
                self.initial_blocks,
                self.min_blocks,
                self.max_blocks,
                defaults.initial_blocks
            );
            self.initial_blocks = defaults.initial_blocks.clamp(self.min_blocks, self.max_blocks);
        }
        if !(self.block_size.is_finite() && self.block_size > 0.0) {
            log::warn!(
                "settings: block_size {} unusable, using {}",
                self.block_size,
                defaults.block_size
            );
            self.block_size = defaults.block_size;
        }
        if self.palette.is_empty() {
            log::warn!("settings: empty palette, using default colors");
            self.palette = defaults.palette;
        }
        if self.clock_interval_ms <= 0
            || self.countdown_interval_ms <= 0
            || self.slide_interval_ms <= 0
        {
            log::warn!("settings: non-positive interval, using defaults");
            self.clock_interval_ms = defaults.clock_interval_ms;
            self.countdown_interval_ms = defaults.countdown_interval_ms;
            self.slide_interval_ms = defaults.slide_interval_ms;
        }
        self
    }

    /// Load settings from the inline JSON element, if present (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(document: &web_sys::Document) -> Self {
        let Some(element) = document.get_element_by_id(Self::CONFIG_ELEMENT_ID) else {
            log::info!("Using default settings");
            return Self::default();
        };
        let json = element.text_content().unwrap_or_default();
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from #{}", Self::CONFIG_ELEMENT_ID);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed #{}: {e}", Self::CONFIG_ELEMENT_ID);
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_behavior() {
        let s = Settings::default();
        assert_eq!(s.speed, 2);
        assert_eq!(s.initial_blocks, 5);
        assert_eq!(s.min_blocks, 1);
        assert_eq!(s.max_blocks, 20);
        assert_eq!(s.block_size, 50.0);
        assert_eq!(s.palette.len(), 8);
        assert_eq!(s.slide_interval_ms, 3000);
    }

    #[test]
    fn test_speed_cycles_one_through_five() {
        let mut s = Settings::default();
        s.speed = 4;
        s.cycle_speed();
        assert_eq!(s.speed, 5);
        s.cycle_speed();
        assert_eq!(s.speed, 1);
    }

    #[test]
    fn test_partial_json_override_keeps_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "speed": 3 }"#).unwrap();
        assert_eq!(s.speed, 3);
        assert_eq!(s.max_blocks, 20);
    }

    #[test]
    fn test_normalized_rejects_bad_overrides() {
        let s: Settings =
            serde_json::from_str(r#"{ "speed": 99, "min_blocks": 10, "max_blocks": 2 }"#).unwrap();
        let s = s.normalized();
        assert_eq!(s.speed, 2);
        assert_eq!(s.min_blocks, 1);
        assert_eq!(s.max_blocks, 20);
    }

    #[test]
    fn test_step_scales_with_speed() {
        let mut s = Settings::default();
        assert_eq!(s.step(), 2.0);
        s.speed = 5;
        assert_eq!(s.step(), 5.0);
    }
}
