//! Fixed-capacity sliding window over pending task handles

/// A ring of `capacity` slots plus a write cursor.
///
/// The pipeline exchanges each freshly pulled handle for the one already
/// occupying the cursor slot, which keeps at most `capacity` handles buffered
/// at any moment. Once the source is exhausted the remaining handles are
/// popped starting at the cursor and wrapping around, which is exactly their
/// submission order; a plain front-to-back sweep would emit out of order
/// whenever the ring has wrapped.
#[derive(Debug)]
pub(crate) struct SlidingWindow<H> {
    slots: Vec<Option<H>>,
    cursor: usize,
}

impl<H> SlidingWindow<H> {
    /// Create a window with the given capacity. Capacity must be nonzero;
    /// the pipeline guarantees this by validating `parallelism >= 2`.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "window capacity must be nonzero");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self { slots, cursor: 0 }
    }

    /// Store `item` at the cursor, returning whatever previously occupied
    /// that slot, and advance the cursor.
    pub(crate) fn exchange(&mut self, item: H) -> Option<H> {
        let previous = self.slots[self.cursor].replace(item);
        self.cursor = (self.cursor + 1) % self.slots.len();
        previous
    }

    /// Remove and return the oldest buffered item, or `None` if the window
    /// is empty. Repeated calls yield the remaining items in submission
    /// order.
    pub(crate) fn pop_oldest(&mut self) -> Option<H> {
        let capacity = self.slots.len();
        for offset in 0..capacity {
            let slot = (self.cursor + offset) % capacity;
            if let Some(item) = self.slots[slot].take() {
                self.cursor = (slot + 1) % capacity;
                return Some(item);
            }
        }
        None
    }
}
