// Linear item list with a bounds-checked current position.
// Every mutation clamps; out-of-range requests never panic.

use log::debug;

use crate::error::FlipbookError;
use crate::types::{Direction, Item};

/// Ordered items plus the current position. Invariant: `position < items.len()`.
#[derive(Debug, Clone)]
pub struct Sequence {
    items: Vec<Item>,
    position: usize,
}

impl Sequence {
    pub fn new(items: Vec<Item>) -> Result<Self, FlipbookError> {
        if items.is_empty() {
            return Err(FlipbookError::EmptySequence);
        }
        Ok(Sequence { items, position: 0 })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn last_index(&self) -> usize {
        self.items.len() - 1
    }

    pub fn current(&self) -> &Item {
        &self.items[self.position]
    }

    pub fn can_advance(&self) -> bool {
        self.position < self.last_index()
    }

    pub fn can_retreat(&self) -> bool {
        self.position > 0
    }

    pub fn can_step(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.can_advance(),
            Direction::Backward => self.can_retreat(),
        }
    }

    /// Index one step away in `direction`, if it exists.
    pub fn neighbour(&self, direction: Direction) -> Option<usize> {
        if !self.can_step(direction) {
            return None;
        }
        match direction {
            Direction::Forward => Some(self.position + 1),
            Direction::Backward => Some(self.position - 1),
        }
    }

    /// Direct jump, clamped into range. Returns true when the position actually changed.
    pub fn set_position(&mut self, target: i64) -> bool {
        let clamped = target.clamp(0, self.last_index() as i64) as usize;
        if clamped == self.position {
            debug!("set_position({target}) is a no-op at {}", self.position);
            return false;
        }
        self.position = clamped;
        true
    }

    pub fn advance(&mut self) -> bool {
        self.step(Direction::Forward)
    }

    pub fn retreat(&mut self) -> bool {
        self.step(Direction::Backward)
    }

    /// Move one step, clamped to bounds.
    pub fn step(&mut self, direction: Direction) -> bool {
        match self.neighbour(direction) {
            Some(next) => {
                self.position = next;
                true
            }
            None => false,
        }
    }

    /// Paginator fill for `index`: 0 at the first item, 1 at the last.
    pub fn progress_of(&self, index: usize) -> f32 {
        if self.items.len() <= 1 {
            return 0.0;
        }
        index.min(self.last_index()) as f32 / self.last_index() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn items(n: usize) -> Vec<Item> {
        (0..n)
            .map(|i| Item::new(format!("page-{}.jpg", i + 1), format!("Page {}", i + 1)))
            .collect()
    }

    #[test]
    fn empty_sequence_rejected() {
        assert!(matches!(
            Sequence::new(Vec::new()),
            Err(FlipbookError::EmptySequence)
        ));
    }

    #[test]
    fn bounds_checks() {
        let mut seq = Sequence::new(items(3)).unwrap();
        assert!(seq.can_advance());
        assert!(!seq.can_retreat());
        assert!(seq.advance());
        assert!(seq.advance());
        assert!(!seq.can_advance());
        assert!(!seq.advance());
        assert_eq!(seq.position(), 2);
        assert_eq!(seq.current().label, "Page 3");
    }

    #[test]
    fn set_position_clamps_and_reports_change() {
        let mut seq = Sequence::new(items(4)).unwrap();
        assert!(seq.set_position(99));
        assert_eq!(seq.position(), 3);
        assert!(seq.set_position(-5));
        assert_eq!(seq.position(), 0);
        assert!(!seq.set_position(0));
    }

    #[test]
    fn single_item_progress_is_zero() {
        let seq = Sequence::new(items(1)).unwrap();
        assert_eq!(seq.progress_of(0), 0.0);
        assert!(!seq.can_advance());
        assert!(!seq.can_retreat());
    }

    #[test]
    fn progress_spans_unit_interval() {
        let seq = Sequence::new(items(5)).unwrap();
        assert_eq!(seq.progress_of(0), 0.0);
        assert_eq!(seq.progress_of(2), 0.5);
        assert_eq!(seq.progress_of(4), 1.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Jump(i64),
        Step(bool),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-20i64..20).prop_map(Op::Jump),
            any::<bool>().prop_map(Op::Step),
        ]
    }

    proptest! {
        /// Position stays inside the item range whatever mix of jumps and steps arrives.
        #[test]
        fn position_always_in_range(
            len in 1usize..8,
            ops in prop::collection::vec(op_strategy(), 0..64)
        ) {
            let mut seq = Sequence::new(items(len)).unwrap();
            for op in ops {
                match op {
                    Op::Jump(target) => { seq.set_position(target); }
                    Op::Step(true) => { seq.advance(); }
                    Op::Step(false) => { seq.retreat(); }
                }
                prop_assert!(seq.position() < seq.len());
            }
        }
    }
}
