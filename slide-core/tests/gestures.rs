// End-to-end drag scenarios driven the way a renderer drives the board:
// board-space pointer coordinates in, frame timestamps in, events out.

use std::cell::RefCell;
use std::rc::Rc;

use slide_core::{Block, BlockParams, Board, BoardEvent, BoardParams, Direction};

type EventLog = Rc<RefCell<Vec<(BoardEvent, f64, f64)>>>;

fn board(animate: bool) -> Board {
    Board::new(BoardParams {
        cols: 4,
        rows: 4,
        animate,
        animation_duration: 60.0,
        ..Default::default()
    })
}

fn watch(board: &mut Board) -> EventLog {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    for event in BoardEvent::ALL {
        let log = log.clone();
        board.on(event, move |b: &Block| log.borrow_mut().push((event, b.x(), b.y())));
    }
    log
}

fn count(log: &EventLog, event: BoardEvent) -> usize {
    log.borrow().iter().filter(|(e, _, _)| *e == event).count()
}

fn right_only() -> BlockParams {
    BlockParams {
        possible_moves: vec![Direction::RIGHT],
        ..BlockParams::at(0, 0)
    }
}

#[test]
fn blocked_drag_leaves_block_in_place() {
    for animate in [false, true] {
        let mut board = board(animate);
        let a = board.add_block(right_only());
        board.add_block(BlockParams::at(1, 0));
        let log = watch(&mut board);

        board.mouse_pressed(0.5, 0.5);
        board.mouse_dragged(1.5, 0.5);
        board.tick(0.0);
        board.tick(100.0);

        assert_eq!(board.block(a).unwrap().position(), (0.0, 0.0));
        assert_eq!(count(&log, BoardEvent::MoveStart), 0);
        assert_eq!(count(&log, BoardEvent::MoveEnd), 0);
        board.mouse_released();
        assert_eq!(count(&log, BoardEvent::FullMoveEnd), 0);
    }
}

#[test]
fn free_drag_without_animation_ends_synchronously() {
    let mut board = board(false);
    let a = board.add_block(right_only());
    let log = watch(&mut board);

    board.mouse_pressed(0.5, 0.5);
    board.mouse_dragged(1.5, 0.5);

    assert_eq!(board.block(a).unwrap().position(), (1.0, 0.0));
    assert_eq!(count(&log, BoardEvent::MoveEnd), 1);
    assert_eq!(count(&log, BoardEvent::Animation), 0);

    board.mouse_released();
    assert_eq!(count(&log, BoardEvent::FullMoveEnd), 1);
}

#[test]
fn free_drag_with_animation_interpolates() {
    let mut board = board(true);
    let a = board.add_block(right_only());
    let log = watch(&mut board);

    board.mouse_pressed(0.5, 0.5);
    board.mouse_dragged(1.5, 0.5);
    assert_eq!(count(&log, BoardEvent::MoveStart), 1);
    assert_eq!(count(&log, BoardEvent::MoveEnd), 0);

    let mut now = 1_000.0;
    while board.is_animating() {
        board.tick(now);
        now += 16.0;
    }

    let frames: Vec<f64> = log
        .borrow()
        .iter()
        .filter(|(e, _, _)| *e == BoardEvent::Animation)
        .map(|&(_, x, _)| x)
        .collect();
    assert!(frames.iter().any(|&x| x > 0.0 && x < 1.0));
    assert!(frames.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(frames.last(), Some(&1.0));

    let last = log.borrow().last().copied();
    assert_eq!(last, Some((BoardEvent::MoveEnd, 1.0, 0.0)));
    assert_eq!(board.block(a).unwrap().position(), (1.0, 0.0));
}

#[test]
fn drag_during_animation_is_rejected_then_retried() {
    let mut board = board(true);
    let a = board.add_block(BlockParams::at(0, 0));
    board.mouse_pressed(0.5, 0.5);
    board.mouse_dragged(1.5, 0.5);
    board.tick(0.0);

    // pointer keeps going while the first slide is in flight
    board.mouse_dragged(2.5, 0.5);
    board.tick(30.0);
    assert!(board.block(a).unwrap().x() < 1.0);
    board.tick(60.0);
    assert_eq!(board.block(a).unwrap().x(), 1.0);

    // the next drag event picks the second cell up
    board.mouse_dragged(2.5, 0.5);
    board.tick(70.0);
    board.tick(130.0);
    assert_eq!(board.block(a).unwrap().position(), (2.0, 0.0));
    assert_eq!(board.moves_since_pressed(), 2);
}

#[test]
fn save_move_restore_round_trip() {
    let mut board = board(false);
    let a = board.add_block(BlockParams::at(0, 0));
    let b = board.add_block(BlockParams {
        shape: vec![vec![1, 1]],
        ..BlockParams::at(1, 2)
    });
    board.save_positions();

    board.mouse_pressed(0.0, 0.0);
    board.mouse_dragged(0.0, 1.0);
    board.mouse_released();
    board.mouse_pressed(2.0, 2.0);
    board.mouse_dragged(2.0, 3.0);
    board.mouse_released();
    assert_eq!(board.block(a).unwrap().position(), (0.0, 1.0));
    assert_eq!(board.block(b).unwrap().position(), (1.0, 3.0));

    board.restore_positions().unwrap();
    assert_eq!(board.block(a).unwrap().position(), (0.0, 0.0));
    assert_eq!(board.block(b).unwrap().position(), (1.0, 2.0));
}

#[test]
fn multi_cell_block_is_blocked_by_any_cell() {
    let mut board = board(false);
    // L-shape covering (0,0), (0,1), (1,1)
    let l = board.add_block(BlockParams {
        shape: vec![vec![1, 0], vec![1, 1]],
        ..BlockParams::at(0, 0)
    });
    board.add_block(BlockParams::at(2, 1));

    board.mouse_pressed(0.5, 1.5);
    assert!(!board.try_move_selected_block(Direction::RIGHT));
    // the mask's empty corner may sit on the obstacle
    board.block_mut(l).unwrap().set_position(1.0, 2.0);
    board.mouse_pressed(1.5, 2.5);
    assert!(board.try_move_selected_block(Direction::UP));
    assert_eq!(board.block(l).unwrap().position(), (1.0, 1.0));
}
