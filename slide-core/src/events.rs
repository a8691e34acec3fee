use std::fmt;
use std::str::FromStr;

use crate::block::Block;
use crate::error::BoardError;

/// Lifecycle events emitted by a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardEvent {
    /// A single-cell move was accepted.
    MoveStart,
    /// A single-cell move finished (after its animation, if any).
    MoveEnd,
    /// The gesture that produced at least one move was released.
    FullMoveEnd,
    /// An animation frame moved the block.
    Animation,
}

impl BoardEvent {
    pub const ALL: [BoardEvent; 4] = [
        BoardEvent::MoveStart,
        BoardEvent::MoveEnd,
        BoardEvent::FullMoveEnd,
        BoardEvent::Animation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BoardEvent::MoveStart => "moveStart",
            BoardEvent::MoveEnd => "moveEnd",
            BoardEvent::FullMoveEnd => "fullMoveEnd",
            BoardEvent::Animation => "animation",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for BoardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoardEvent {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoardEvent::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| BoardError::UnknownEvent(s.to_string()))
    }
}

pub type Listener = Box<dyn FnMut(&Block)>;

/// Ordered listener lists, one slot per event kind.
#[derive(Default)]
pub struct Listeners {
    slots: [Vec<Listener>; 4],
}

impl Listeners {
    pub fn add(&mut self, event: BoardEvent, listener: Listener) {
        self.slots[event.index()].push(listener);
    }

    pub fn len(&self, event: BoardEvent) -> usize {
        self.slots[event.index()].len()
    }

    /// Calls every listener of `event` synchronously, in registration order.
    pub fn fire(&mut self, event: BoardEvent, block: &Block) {
        for listener in &mut self.slots[event.index()] {
            listener(block);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for event in BoardEvent::ALL {
            map.entry(&event.name(), &self.len(event));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::block::{BlockId, BlockParams};

    #[test]
    fn parses_known_names_only() {
        for e in BoardEvent::ALL {
            assert_eq!(e.name().parse::<BoardEvent>().unwrap(), e);
        }
        assert!(matches!(
            "moveend".parse::<BoardEvent>(),
            Err(BoardError::UnknownEvent(name)) if name == "moveend"
        ));
    }

    #[test]
    fn fires_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();
        for tag in ["first", "second"] {
            let seen = seen.clone();
            listeners.add(
                BoardEvent::MoveEnd,
                Box::new(move |b: &Block| seen.borrow_mut().push((tag, b.id()))),
            );
        }
        let block = Block::new(BlockId(3), BlockParams::default());
        listeners.fire(BoardEvent::MoveStart, &block);
        assert!(seen.borrow().is_empty());
        listeners.fire(BoardEvent::MoveEnd, &block);
        assert_eq!(
            *seen.borrow(),
            vec![("first", BlockId(3)), ("second", BlockId(3))]
        );
    }
}
