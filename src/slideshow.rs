//! Image slideshow rotator state
//!
//! Tracks which slide carries the `active` class; the host applies the
//! returned class change to the actual image elements.

/// Indices of the class change produced by one rotation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChange {
    pub deactivate: usize,
    pub activate: usize,
}

/// Rotation over a fixed number of slides, wrapping at the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slideshow {
    current: usize,
    total: usize,
}

impl Slideshow {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Advance to the next slide. `None` when there are no slides to
    /// rotate; a single slide re-activates itself, which is harmless.
    pub fn advance(&mut self) -> Option<SlideChange> {
        if self.total == 0 {
            return None;
        }
        let deactivate = self.current;
        self.current = (self.current + 1) % self.total;
        Some(SlideChange {
            deactivate,
            activate: self.current,
        })
    }
}
