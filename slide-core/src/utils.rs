use serde::{Deserialize, Serialize};

use crate::board::Board;

/// Pixel extent of a drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

pub fn constrain(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

pub fn lerp(start: f64, stop: f64, amount: f64) -> f64 {
    amount * (stop - start) + start
}

/// Largest board size, in whole pixels per cell, that fits inside `bounds`.
pub fn fit_in_bounds(board: &Board, bounds: Dimension) -> Dimension {
    let unit = unit_for(board.cols(), board.rows(), bounds);
    Dimension {
        width: board.cols() as f64 * unit,
        height: board.rows() as f64 * unit,
    }
}

pub fn unit_for(cols: usize, rows: usize, bounds: Dimension) -> f64 {
    if cols == 0 || rows == 0 {
        return 0.0;
    }
    (bounds.width / cols as f64)
        .min(bounds.height / rows as f64)
        .floor()
        .max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardParams;

    #[test]
    fn constrain_and_lerp() {
        assert_eq!(constrain(3.0, -1.0, 1.0), 1.0);
        assert_eq!(constrain(-3.0, -1.0, 1.0), -1.0);
        assert_eq!(constrain(0.0, -1.0, 1.0), 0.0);
        assert_eq!(lerp(2.0, 3.0, 0.5), 2.5);
        assert_eq!(lerp(2.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn fit_keeps_whole_pixel_cells() {
        let board = Board::new(BoardParams {
            cols: 4,
            rows: 2,
            ..Default::default()
        });
        let fitted = fit_in_bounds(
            &board,
            Dimension {
                width: 403.0,
                height: 300.0,
            },
        );
        assert_eq!(fitted, Dimension { width: 400.0, height: 200.0 });
    }
}
