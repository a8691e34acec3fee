use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::animation::{Animation, Easing};
use crate::block::{Block, BlockId, BlockParams};
use crate::direction::Direction;
use crate::error::BoardError;
use crate::events::{BoardEvent, Listeners};
use crate::utils::{constrain, lerp};

/// Board configuration. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardParams {
    pub cols: usize,
    pub rows: usize,
    pub animate: bool,
    /// Duration of a single-cell slide, in milliseconds.
    pub animation_duration: f64,
    pub easing: Easing,
    /// Reject moves that would push a block past the grid border.
    pub confine_to_grid: bool,
    pub color: Option<String>,
    pub image: Option<String>,
}

impl Default for BoardParams {
    fn default() -> Self {
        BoardParams {
            cols: 6,
            rows: 6,
            animate: true,
            animation_duration: 60.0,
            easing: Easing::Linear,
            confine_to_grid: false,
            color: None,
            image: None,
        }
    }
}

/// The single in-flight slide.
#[derive(Debug)]
struct Motion {
    block: BlockId,
    from: (f64, f64),
    delta: (i32, i32),
    animation: Animation,
}

/// Grid of blocks plus the press/drag/release state machine that moves them.
///
/// Pointer coordinates are board-space: one unit per cell, fractional values
/// allowed. A drag moves the selected block at most one cell per call, along
/// the axis the pointer travelled further on. With animation enabled the
/// move is spread over frames delivered through [`Board::tick`], and no other
/// move is accepted until it completes.
#[derive(Debug)]
pub struct Board {
    cols: usize,
    rows: usize,
    animate: bool,
    animation_duration: f64,
    easing: Easing,
    confine_to_grid: bool,
    color: Option<String>,
    image: Option<String>,
    blocks: Vec<Block>,
    selected: Option<BlockId>,
    listeners: Listeners,
    pressed: Option<(f64, f64)>,
    saved: Option<HashMap<BlockId, (f64, f64)>>,
    motion: Option<Motion>,
    moves_since_pressed: u32,
}

impl Default for Board {
    fn default() -> Self {
        Board::new(BoardParams::default())
    }
}

impl Board {
    pub fn new(params: BoardParams) -> Self {
        Board {
            cols: params.cols,
            rows: params.rows,
            animate: params.animate,
            animation_duration: params.animation_duration,
            easing: params.easing,
            confine_to_grid: params.confine_to_grid,
            color: params.color,
            image: params.image,
            blocks: Vec::new(),
            selected: None,
            listeners: Listeners::default(),
            pressed: None,
            saved: None,
            motion: None,
            moves_since_pressed: 0,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn animate(&self) -> bool {
        self.animate
    }

    pub fn set_animate(&mut self, animate: bool) {
        self.animate = animate;
    }

    pub fn animation_duration(&self) -> f64 {
        self.animation_duration
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(id.0)
    }

    /// Appends a block. Overlap with existing blocks is not checked.
    pub fn add_block(&mut self, params: BlockParams) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block::new(id, params));
        id
    }

    /// Lets `block` share cells with `other`.
    pub fn allow_overlap(&mut self, block: BlockId, other: BlockId) -> Result<(), BoardError> {
        if self.block(other).is_none() {
            return Err(BoardError::UnknownBlock(other));
        }
        self.block_mut(block)
            .ok_or(BoardError::UnknownBlock(block))?
            .allow_overlap(other);
        Ok(())
    }

    pub fn find_blocks_by_tag(&self, tag: &str) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|b| b.tag() == Some(tag))
            .collect()
    }

    /// First selectable block, in insertion order, covering the cell.
    pub fn block_at_coord(&self, x: f64, y: f64) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.is_selectable() && b.contains_coord(x, y))
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.and_then(|id| self.block(id))
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    pub fn moves_since_pressed(&self) -> u32 {
        self.moves_since_pressed
    }

    pub fn on(&mut self, event: BoardEvent, listener: impl FnMut(&Block) + 'static) {
        self.listeners.add(event, Box::new(listener));
    }

    /// Registers by event name. An unknown name is logged, adds no listener
    /// and is handed back so a host can surface it.
    pub fn on_named(
        &mut self,
        event: &str,
        listener: impl FnMut(&Block) + 'static,
    ) -> Result<BoardEvent, BoardError> {
        match event.parse::<BoardEvent>() {
            Ok(event) => {
                self.on(event, listener);
                Ok(event)
            }
            Err(err) => {
                error!("{err}");
                Err(err)
            }
        }
    }

    fn fire(&mut self, event: BoardEvent, id: BlockId) {
        if let Some(block) = self.blocks.get(id.0) {
            self.listeners.fire(event, block);
        }
    }

    pub fn save_positions(&mut self) {
        let snapshot = self.blocks.iter().map(|b| (b.id(), b.position())).collect();
        self.saved = Some(snapshot);
        debug!(blocks = self.blocks.len(), "positions saved");
    }

    /// Puts every block back where the last [`Board::save_positions`] found it.
    /// Nothing moves unless every block is present in the snapshot.
    pub fn restore_positions(&mut self) -> Result<(), BoardError> {
        if self.motion.is_some() {
            return Err(BoardError::AnimationInFlight);
        }
        let saved = self.saved.as_ref().ok_or(BoardError::NoSnapshot)?;
        if let Some(missing) = self.blocks.iter().find(|b| !saved.contains_key(&b.id())) {
            return Err(BoardError::MissingFromSnapshot(missing.id()));
        }
        for block in &mut self.blocks {
            let (x, y) = saved[&block.id()];
            block.set_position(x, y);
        }
        debug!(blocks = self.blocks.len(), "positions restored");
        Ok(())
    }

    pub fn mouse_pressed(&mut self, x: f64, y: f64) {
        let (x, y) = (x.floor(), y.floor());
        self.pressed = Some((x, y));
        if let Some(id) = self.block_at_coord(x, y).map(Block::id) {
            self.selected = Some(id);
        }
        self.moves_since_pressed = 0;
    }

    pub fn mouse_dragged(&mut self, x: f64, y: f64) {
        let (Some((px, py)), Some(_)) = (self.pressed, self.selected) else {
            return;
        };
        let (x, y) = (x.floor(), y.floor());
        let dragged_x = x - px;
        let dragged_y = y - py;
        let diff_x = dragged_x.round();
        let diff_y = dragged_y.round();
        if diff_x == 0.0 && diff_y == 0.0 {
            return;
        }

        // One cell along the axis dragged further; the other axis is dropped.
        let (mut dx, mut dy) = (0, 0);
        if dragged_x.abs() > dragged_y.abs() {
            dx = constrain(diff_x, -1.0, 1.0) as i32;
        } else {
            dy = constrain(diff_y, -1.0, 1.0) as i32;
        }

        match Direction::from(dx, dy) {
            Some(direction) => {
                if self.try_move_selected_block(direction) {
                    // measure the rest of the drag from the block's new cell
                    self.pressed = Some((px + f64::from(dx), py + f64::from(dy)));
                }
            }
            None => warn!(dx, dy, "drag did not resolve to a direction"),
        }
    }

    pub fn mouse_released(&mut self) {
        if let Some(id) = self.selected.take()
            && (self.moves_since_pressed > 0 || self.motion.is_some())
        {
            self.fire(BoardEvent::FullMoveEnd, id);
        }
    }

    pub fn try_move_selected_block(&mut self, direction: Direction) -> bool {
        if self.motion.is_some() {
            return false;
        }
        let Some(block) = self.selected_block() else {
            return false;
        };
        let id = block.id();
        if !block.can_move(direction) {
            return false;
        }
        let (dx, dy) = direction.delta();
        if self.confine_to_grid && !self.fits_in_grid(block, dx, dy) {
            debug!(block = %id, %direction, "move rejected: leaves the grid");
            return false;
        }
        let blocked = self.blocks.iter().any(|other| {
            other.id() != id && other.overlaps_with(block, dx, dy) && block.cannot_overlap_with(other)
        });
        if blocked {
            debug!(block = %id, %direction, "move rejected: cell occupied");
            return false;
        }

        debug!(block = %id, %direction, animate = self.animate, "move accepted");
        self.fire(BoardEvent::MoveStart, id);
        if self.animate {
            let from = self.blocks[id.0].position();
            self.motion = Some(Motion {
                block: id,
                from,
                delta: (dx, dy),
                animation: Animation::new(self.animation_duration).with_easing(self.easing),
            });
        } else {
            self.blocks[id.0].move_by(direction);
            self.moves_since_pressed += 1;
            self.fire(BoardEvent::MoveEnd, id);
        }
        true
    }

    /// Advances the in-flight slide to `now_ms` (the host's frame timestamp).
    /// Returns whether a block moved.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        let id = motion.block;
        let (fx, fy) = motion.from;
        let (tx, ty) = (fx + f64::from(motion.delta.0), fy + f64::from(motion.delta.1));

        // eased progress is exactly 1.0 on the last frame, so the block lands on the cell
        let block = &mut self.blocks[id.0];
        let mut done = false;
        motion.animation.step(
            now_ms,
            |p| block.set_position(lerp(fx, tx, p), lerp(fy, ty, p)),
            || done = true,
        );
        self.fire(BoardEvent::Animation, id);

        if done {
            self.motion = None;
            self.moves_since_pressed += 1;
            self.fire(BoardEvent::MoveEnd, id);
        }
        true
    }

    fn fits_in_grid(&self, block: &Block, dx: i32, dy: i32) -> bool {
        let (cols, rows) = (self.cols as f64, self.rows as f64);
        block.shape_coords().all(|(x, y)| {
            let (x, y) = (x + f64::from(dx), y + f64::from(dy));
            x >= 0.0 && y >= 0.0 && x < cols && y < rows
        })
    }
}
