//! Page Widgets - four self-contained browser page widgets
//!
//! Core modules:
//! - `sim`: Deterministic motion simulation for the bouncing blocks
//! - `clock`: Live clock display formatting
//! - `countdown`: Countdown timer widget state
//! - `slideshow`: Image rotator state
//! - `dom`: Browser host plumbing (viewport, elements, scheduling)
//! - `settings`: Data-driven widget configuration

pub mod clock;
pub mod countdown;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod error;
pub mod settings;
pub mod sim;
pub mod slideshow;

pub use error::HostError;
pub use settings::Settings;

/// Widget configuration constants
pub mod consts {
    /// Block edge length in CSS pixels
    pub const BLOCK_SIZE: f32 = 50.0;
    /// Per-frame step magnitude at speed level 1
    pub const BASE_STEP: f32 = 1.0;
    /// Default speed level (step = level * BASE_STEP)
    pub const DEFAULT_SPEED: u32 = 2;
    /// Speed level bounds for the cycle button
    pub const MIN_SPEED: u32 = 1;
    pub const MAX_SPEED: u32 = 5;

    /// Block count bounds
    pub const MIN_BLOCKS: usize = 1;
    pub const MAX_BLOCKS: usize = 20;
    /// Blocks spawned at startup
    pub const INITIAL_BLOCKS: usize = 5;

    /// Block color palette
    pub const PALETTE: [&str; 8] = [
        "#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c", "#e67e22", "#34495e",
    ];

    /// Clock refresh interval
    pub const CLOCK_INTERVAL_MS: i32 = 1000;
    /// Countdown tick interval
    pub const COUNTDOWN_INTERVAL_MS: i32 = 1000;
    /// Slideshow rotation interval
    pub const SLIDE_INTERVAL_MS: i32 = 3000;

    /// Delay before resuming after a transient frame failure
    pub const TICK_RETRY_DELAY_MS: i32 = 1000;
    /// Lifetime of the page-level error banner
    pub const BANNER_TTL_MS: i32 = 5000;
    /// Lifetime of a widget-local error message
    pub const WIDGET_ERROR_TTL_MS: i32 = 3000;
}
