//! Sliding-puzzle engine: blocks on a grid, dragged one cell at a time.
//!
//! The crate has no browser dependency. A host feeds board-space pointer
//! coordinates into [`Board::mouse_pressed`], [`Board::mouse_dragged`] and
//! [`Board::mouse_released`], forwards its frame timestamps to
//! [`Board::tick`], and repaints from the board's events and read-only state.

pub mod animation;
pub mod block;
pub mod board;
pub mod direction;
pub mod error;
pub mod events;
pub mod layout;
pub mod utils;

pub use animation::{Animation, Easing, Frame};
pub use block::{Block, BlockId, BlockParams};
pub use board::{Board, BoardParams};
pub use direction::Direction;
pub use error::{BoardError, LayoutError};
pub use events::BoardEvent;
pub use layout::Layout;
pub use utils::{Dimension, constrain, fit_in_bounds, lerp};

/// Fixed categorical palette, cycled by index, for blocks without a colour.
pub fn block_color(i: usize) -> &'static str {
    const PALETTE: [&str; 16] = [
        "red",
        "orangered",
        "orange",
        "gold",
        "yellowgreen",
        "green",
        "mediumseagreen",
        "teal",
        "deepskyblue",
        "dodgerblue",
        "blueviolet",
        "purple",
        "fuchsia",
        "hotpink",
        "peru",
        "slategray",
    ];
    PALETTE[i % PALETTE.len()]
}
