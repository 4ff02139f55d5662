//! Block field state and core simulation types
//!
//! A `BlockField` owns every moving block for its whole lifetime. Blocks
//! are self-contained records; there are no parallel position/direction
//! arrays to keep in sync.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::consts::*;

/// Current size of the display area the blocks are confined to.
///
/// Read fresh from the host on every tick; a resize between ticks is
/// corrected by the next clamp, never by cached state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both extents must be finite and strictly positive
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0
    }

    /// Whether a block of the given edge length fits at all
    pub fn fits(&self, size: f32) -> bool {
        self.is_usable() && self.width >= size && self.height >= size
    }
}

/// A moving block entity
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: u32,
    /// Top-left corner in viewport coordinates
    pub pos: Vec2,
    /// Per-axis direction, each component exactly -1.0 or +1.0
    pub dir: Vec2,
    /// Edge length
    pub size: f32,
    /// Index into the host's color palette
    pub color_index: usize,
}

impl Block {
    /// True when the block sits fully inside the viewport
    pub fn in_bounds(&self, viewport: Viewport) -> bool {
        self.pos.x >= 0.0
            && self.pos.y >= 0.0
            && self.pos.x <= viewport.width - self.size
            && self.pos.y <= viewport.height - self.size
    }
}

/// Rejected add/remove requests at the configured block count bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("maximum number of blocks ({0}) reached")]
    AtMax(usize),
    #[error("minimum number of blocks ({0}) reached")]
    AtMin(usize),
}

/// Static field parameters, normally sourced from [`crate::Settings`]
#[derive(Debug, Clone, Copy)]
pub struct FieldConfig {
    pub block_size: f32,
    pub min_blocks: usize,
    pub max_blocks: usize,
    pub palette_len: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
            min_blocks: MIN_BLOCKS,
            max_blocks: MAX_BLOCKS,
            palette_len: PALETTE.len(),
        }
    }
}

/// The motion controller state: every moving block plus the pause flag
#[derive(Debug, Clone)]
pub struct BlockField {
    /// Active blocks (sorted by id; ids only ever grow)
    blocks: Vec<Block>,
    config: FieldConfig,
    /// Skip position updates while set; scheduling continues outside
    paused: bool,
    /// Motion ticks actually applied (paused calls do not count)
    time_ticks: u64,
    rng: Pcg32,
    next_id: u32,
}

impl BlockField {
    /// Create an empty field with the given seed
    pub fn new(seed: u64, config: FieldConfig) -> Self {
        Self {
            blocks: Vec::new(),
            config,
            paused: false,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn config(&self) -> FieldConfig {
        self.config
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub(crate) fn advance_time(&mut self) {
        self.time_ticks += 1;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Spawn a block at a random in-bounds position with a random
    /// direction and palette color. Rejected at the configured maximum.
    pub fn spawn_block(&mut self, viewport: Viewport) -> Result<&Block, LimitError> {
        if self.blocks.len() >= self.config.max_blocks {
            return Err(LimitError::AtMax(self.config.max_blocks));
        }

        let size = self.config.block_size;
        let max_x = (viewport.width - size).max(0.0);
        let max_y = (viewport.height - size).max(0.0);

        let id = self.next_id;
        self.next_id += 1;

        let block = Block {
            id,
            pos: Vec2::new(
                self.rng.random_range(0.0..=max_x),
                self.rng.random_range(0.0..=max_y),
            ),
            dir: Vec2::new(random_sign(&mut self.rng), random_sign(&mut self.rng)),
            size,
            color_index: self.rng.random_range(0..self.config.palette_len.max(1)),
        };
        self.blocks.push(block);
        Ok(self.blocks.last().unwrap())
    }

    /// Remove the newest block, returning it so the host can release its
    /// display element. Rejected at the configured minimum.
    pub fn remove_block(&mut self) -> Result<Block, LimitError> {
        if self.blocks.len() <= self.config.min_blocks {
            return Err(LimitError::AtMin(self.config.min_blocks));
        }
        // Bounds check above guarantees at least one block
        Ok(self.blocks.pop().unwrap())
    }

    /// Drop every block at once (controller shutdown)
    pub fn clear(&mut self) -> Vec<Block> {
        std::mem::take(&mut self.blocks)
    }
}

fn random_sign(rng: &mut Pcg32) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> BlockField {
        BlockField::new(42, FieldConfig::default())
    }

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_spawn_in_bounds() {
        let mut f = field();
        for _ in 0..10 {
            f.spawn_block(VIEW).unwrap();
        }
        for block in f.blocks() {
            assert!(block.in_bounds(VIEW), "spawned out of bounds: {block:?}");
            assert!(block.dir.x.abs() == 1.0 && block.dir.y.abs() == 1.0);
            assert!(block.color_index < PALETTE.len());
        }
    }

    #[test]
    fn test_spawn_rejected_at_max() {
        let mut f = field();
        for _ in 0..MAX_BLOCKS {
            f.spawn_block(VIEW).unwrap();
        }
        assert_eq!(f.spawn_block(VIEW).unwrap_err(), LimitError::AtMax(MAX_BLOCKS));
        assert_eq!(f.len(), MAX_BLOCKS);
    }

    #[test]
    fn test_remove_rejected_at_min() {
        let mut f = field();
        f.spawn_block(VIEW).unwrap();
        assert_eq!(f.remove_block().unwrap_err(), LimitError::AtMin(MIN_BLOCKS));
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_remove_pops_newest() {
        let mut f = field();
        f.spawn_block(VIEW).unwrap();
        let newest = f.spawn_block(VIEW).unwrap().id;
        assert_eq!(f.remove_block().unwrap().id, newest);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut f = field();
        let a = f.spawn_block(VIEW).unwrap().id;
        let b = f.spawn_block(VIEW).unwrap().id;
        f.remove_block().unwrap();
        let c = f.spawn_block(VIEW).unwrap().id;
        assert!(a < b && b < c);
    }

    #[test]
    fn test_seeded_spawns_are_reproducible() {
        let mut a = field();
        let mut b = field();
        for _ in 0..5 {
            assert_eq!(a.spawn_block(VIEW).unwrap(), b.spawn_block(VIEW).unwrap());
        }
    }

    #[test]
    fn test_tiny_viewport_spawn_clamps_to_origin() {
        let mut f = field();
        let tiny = Viewport::new(BLOCK_SIZE, BLOCK_SIZE);
        let block = f.spawn_block(tiny).unwrap();
        assert_eq!(block.pos, Vec2::ZERO);
    }
}
