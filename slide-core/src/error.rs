use thiserror::Error;

use crate::block::BlockId;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error(
        "'{0}' is not an event of the board. Valid events are: \"moveStart\", \"moveEnd\", \"fullMoveEnd\", \"animation\""
    )]
    UnknownEvent(String),

    #[error("no positions were saved before restoring")]
    NoSnapshot,

    #[error("block {0} is missing from the saved positions")]
    MissingFromSnapshot(BlockId),

    #[error("block {0} does not belong to this board")]
    UnknownBlock(BlockId),

    #[error("positions cannot be restored while a move is animating")]
    AnimationInFlight,
}

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid layout JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("block {block} lists overlap index {index}, which is out of range")]
    OverlapIndex { block: usize, index: usize },

    #[error("block {0} has an empty shape")]
    EmptyShape(usize),

    #[error("block {0} has a shape with no occupied cell")]
    NoOccupiedCell(usize),

    #[error("block {block} has shape value {value}; only 0 and 1 are allowed")]
    InvalidCell { block: usize, value: u8 },
}
