//! Bounded undo stack of immutable images.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::buffer::PixelBuffer;

/// LIFO stack of shared images with a fixed capacity.
///
/// The top entry is the current image. Pushing onto a full stack drops the
/// oldest entry. Popping never removes the last entry, so once an image has
/// been loaded there is always a current one.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: VecDeque<Arc<PixelBuffer>>,
    capacity: usize,
}

impl HistoryStack {
    /// Create an empty stack. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push `image` as the new current entry.
    ///
    /// Returns the evicted oldest entry when the stack was full.
    pub fn push(&mut self, image: Arc<PixelBuffer>) -> Option<Arc<PixelBuffer>> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(image);
        evicted
    }

    /// Remove the current entry, unless it is the only one.
    pub fn pop(&mut self) -> Option<Arc<PixelBuffer>> {
        if self.entries.len() > 1 {
            self.entries.pop_back()
        } else {
            None
        }
    }

    pub fn current(&self) -> Option<&Arc<PixelBuffer>> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::buffer::Pixel;
    use proptest::prelude::*;

    proptest! {
        /// Property: the stack never exceeds capacity and keeps the newest entries.
        #[test]
        fn prop_keeps_newest(capacity in 1usize..10, pushes in 1usize..30) {
            let mut stack = HistoryStack::new(capacity);
            for v in 0..pushes {
                stack.push(Arc::new(PixelBuffer::filled(1, 1, Pixel::rgb(v as u8, 0, 0)).unwrap()));
            }
            prop_assert_eq!(stack.len(), pushes.min(capacity));
            prop_assert_eq!(stack.current().unwrap().get(0, 0).unwrap().r as usize, pushes - 1);
        }
    }
}
