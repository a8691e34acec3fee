use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// Stable handle of a block inside its board. Handles are arena indices and
/// never change once the block has been added.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Construction parameters for a block. Every field is optional in JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockParams {
    /// Occupancy mask, rows of 0/1 flags relative to the anchor.
    pub shape: Vec<Vec<u8>>,
    pub x: i32,
    pub y: i32,
    pub possible_moves: Vec<Direction>,
    /// Blocks this one may share cells with.
    pub possible_overlaps: Vec<BlockId>,
    pub selectable: bool,
    pub color: Option<String>,
    pub image: Option<String>,
    #[serde(alias = "name")]
    pub tag: Option<String>,
    /// HTML fragment shown inside the block by the DOM renderer.
    pub content: Option<String>,
}

impl Default for BlockParams {
    fn default() -> Self {
        BlockParams {
            shape: vec![vec![1]],
            x: 0,
            y: 0,
            possible_moves: Direction::all(),
            possible_overlaps: Vec::new(),
            selectable: true,
            color: None,
            image: None,
            tag: None,
            content: None,
        }
    }
}

impl BlockParams {
    pub fn at(x: i32, y: i32) -> Self {
        BlockParams {
            x,
            y,
            ..Default::default()
        }
    }
}

/// A tile covering one or more grid cells.
///
/// `x`/`y` are whole cells except while the block is being animated, where
/// they carry the interpolated position of the current frame.
#[derive(Clone, Debug)]
pub struct Block {
    id: BlockId,
    shape: Vec<Vec<u8>>,
    cols: usize,
    rows: usize,
    pub(crate) x: f64,
    pub(crate) y: f64,
    possible_moves: Vec<Direction>,
    possible_overlaps: BTreeSet<BlockId>,
    selectable: bool,
    color: Option<String>,
    image: Option<String>,
    tag: Option<String>,
    content: Option<String>,
}

impl Block {
    pub fn new(id: BlockId, params: BlockParams) -> Self {
        let cols = params.shape.iter().map(Vec::len).max().unwrap_or(0);
        let rows = params.shape.len();
        Block {
            id,
            shape: params.shape,
            cols,
            rows,
            x: f64::from(params.x),
            y: f64::from(params.y),
            possible_moves: params.possible_moves,
            possible_overlaps: params.possible_overlaps.into_iter().collect(),
            selectable: params.selectable,
            color: params.color,
            image: params.image,
            tag: params.tag,
            content: params.content,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn shape(&self) -> &[Vec<u8>] {
        &self.shape
    }

    /// Width of the shape's bounding box, in cells.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Height of the shape's bounding box, in cells.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn possible_moves(&self) -> &[Direction] {
        &self.possible_moves
    }

    pub fn can_move(&self, direction: Direction) -> bool {
        self.possible_moves.contains(&direction)
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Absolute coordinates of every occupied cell, in row-major mask order.
    pub fn shape_coords(&self) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
        let (bx, by) = (self.x, self.y);
        self.shape.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|&(_, &cell)| cell == 1)
                .map(move |(col, _)| (bx + col as f64, by + row as f64))
        })
    }

    pub fn contains_coord(&self, x: f64, y: f64) -> bool {
        self.shape_coords().any(|(bx, by)| bx == x && by == y)
    }

    /// Shifts the block one cell. Legality is the board's concern.
    pub fn move_by(&mut self, direction: Direction) {
        self.x += f64::from(direction.dx());
        self.y += f64::from(direction.dy());
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn allow_overlap(&mut self, other: BlockId) {
        self.possible_overlaps.insert(other);
    }

    pub fn cannot_overlap_with(&self, other: &Block) -> bool {
        !self.possible_overlaps.contains(&other.id)
    }

    /// True when any of our cells coincides with a cell of `other` once
    /// `other` is shifted by `(dx, dy)`.
    pub fn overlaps_with(&self, other: &Block, dx: i32, dy: i32) -> bool {
        let (dx, dy) = (f64::from(dx), f64::from(dy));
        self.shape_coords().any(|(x, y)| {
            other
                .shape_coords()
                .any(|(ox, oy)| x == ox + dx && y == oy + dy)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: usize, params: BlockParams) -> Block {
        Block::new(BlockId(id), params)
    }

    #[test]
    fn single_cell_coords() {
        let b = block(0, BlockParams::at(4, 1));
        assert_eq!(b.shape_coords().collect::<Vec<_>>(), vec![(4.0, 1.0)]);
        assert_eq!((b.cols(), b.rows()), (1, 1));
    }

    #[test]
    fn l_shape_coords_are_row_major() {
        let b = block(
            0,
            BlockParams {
                shape: vec![vec![1, 0], vec![1, 1]],
                ..BlockParams::at(2, 3)
            },
        );
        let coords: Vec<_> = b.shape_coords().collect();
        assert_eq!(coords, vec![(2.0, 3.0), (2.0, 4.0), (3.0, 4.0)]);
        assert!(b.contains_coord(3.0, 4.0));
        assert!(!b.contains_coord(3.0, 3.0));
        // the iterator can be replayed
        let it = b.shape_coords();
        assert_eq!(it.clone().count(), it.count());
    }

    #[test]
    fn ragged_mask_uses_longest_row() {
        let b = block(
            0,
            BlockParams {
                shape: vec![vec![1], vec![1, 1, 1]],
                ..Default::default()
            },
        );
        assert_eq!((b.cols(), b.rows()), (3, 2));
    }

    #[test]
    fn overlap_depends_on_offset() {
        let a = block(0, BlockParams::at(1, 1));
        let b = block(1, BlockParams::at(1, 1));
        assert!(a.overlaps_with(&b, 0, 0));
        assert!(!a.overlaps_with(&b, 1, 0));
        assert!(!b.overlaps_with(&a, 0, -1));

        let c = block(2, BlockParams::at(0, 1));
        assert!(a.overlaps_with(&c, 1, 0));
    }

    #[test]
    fn overlap_permission_is_by_id() {
        let mut a = block(0, BlockParams::default());
        let b = block(1, BlockParams::default());
        let twin = block(2, BlockParams::default());
        assert!(a.cannot_overlap_with(&b));
        a.allow_overlap(BlockId(1));
        assert!(!a.cannot_overlap_with(&b));
        assert!(a.cannot_overlap_with(&twin));
    }

    #[test]
    fn move_by_and_set_position() {
        let mut b = block(0, BlockParams::at(2, 2));
        b.move_by(Direction::LEFT);
        b.move_by(Direction::DOWN);
        assert_eq!(b.position(), (1.0, 3.0));
        b.set_position(0.0, 0.0);
        assert_eq!(b.position(), (0.0, 0.0));
    }

    #[test]
    fn params_fill_defaults_from_json() {
        let p: BlockParams = serde_json::from_str(r#"{"x":2,"name":"hero"}"#).unwrap();
        assert_eq!(p.x, 2);
        assert_eq!(p.shape, vec![vec![1]]);
        assert_eq!(p.possible_moves.len(), 4);
        assert!(p.selectable);
        assert_eq!(p.tag.as_deref(), Some("hero"));
    }
}
