//! Capacity-bounded writes into caller-owned arrays.

use netutil_error::{MarshalError, MarshalResult};

/// Hands out the slots of a fixed-capacity buffer in order.
///
/// Asking for a slot past the end yields `SizeExceeded`; slots already handed
/// out keep whatever was written to them.
#[derive(Debug)]
pub struct SlotWriter<'a, T> {
    what: &'static str,
    slots: &'a mut [T],
    cursor: usize,
}

impl<'a, T> SlotWriter<'a, T> {
    pub fn new(what: &'static str, slots: &'a mut [T]) -> Self {
        Self {
            what,
            slots,
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots handed out so far.
    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    pub fn next_slot(&mut self) -> MarshalResult<&mut T> {
        let index = self.cursor;
        if index >= self.slots.len() {
            return Err(MarshalError::SizeExceeded {
                what: self.what,
                capacity: self.slots.len(),
            });
        }
        self.cursor += 1;
        Ok(&mut self.slots[index])
    }
}
