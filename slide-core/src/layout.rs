use serde::{Deserialize, Serialize};

use crate::block::BlockParams;
use crate::board::{Board, BoardParams};
use crate::error::LayoutError;

/// A whole puzzle as stored in a JSON file. `possible_overlaps` entries are
/// indices into `blocks`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub board: BoardParams,
    pub blocks: Vec<BlockParams>,
}

impl Layout {
    pub fn from_json(text: &str) -> Result<Self, LayoutError> {
        let layout: Layout = serde_json::from_str(text)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        for (i, block) in self.blocks.iter().enumerate() {
            if block.shape.is_empty() {
                return Err(LayoutError::EmptyShape(i));
            }
            if let Some(&value) = block.shape.iter().flatten().find(|&&v| v > 1) {
                return Err(LayoutError::InvalidCell { block: i, value });
            }
            if !block.shape.iter().flatten().any(|&v| v == 1) {
                return Err(LayoutError::NoOccupiedCell(i));
            }
            if let Some(other) = block
                .possible_overlaps
                .iter()
                .find(|other| other.0 >= self.blocks.len())
            {
                return Err(LayoutError::OverlapIndex {
                    block: i,
                    index: other.0,
                });
            }
        }
        Ok(())
    }

    /// Builds a board whose block ids match the positions in `blocks`.
    pub fn build(self) -> Result<Board, LayoutError> {
        self.validate()?;
        let mut board = Board::new(self.board);
        for params in self.blocks {
            board.add_block(params);
        }
        Ok(board)
    }
}
