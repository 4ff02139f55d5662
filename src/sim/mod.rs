//! Deterministic motion simulation
//!
//! All bouncing-block logic lives here. This module must be pure and
//! deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by block ID)
//! - No rendering or platform dependencies

pub mod state;
pub mod tick;

pub use state::{Block, BlockField, FieldConfig, LimitError, Viewport};
pub use tick::{TickError, tick};
