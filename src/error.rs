//! Host environment failures detected at widget setup or during a frame.
//!
//! These are the non-fatal configuration errors of the page: a missing
//! element or an unusable viewport disables one widget and surfaces a
//! banner, never the whole page.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("browser window is not available")]
    NoWindow,

    #[error("document is not available")]
    NoDocument,

    #[error("document body is not available")]
    NoBody,

    #[error("element `{0}` not found")]
    MissingElement(String),

    #[error("viewport dimensions {width}x{height} are unusable")]
    BadViewport { width: f32, height: f32 },

    #[error("viewport {width}x{height} is too small for {size}px blocks")]
    ViewportTooSmall { width: f32, height: f32, size: f32 },

    #[error("failed to register {0} callback")]
    Schedule(&'static str),

    #[error("failed to create element `{0}`")]
    CreateElement(&'static str),
}
