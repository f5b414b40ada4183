//! Fixed-capacity FIFO used to hand events from the pollers to the dispatcher

use crate::error::QueueError;

/// What the kernel does with an event that arrives while the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Keep the queue, discard the incoming event
    DropNewest,
    /// Discard the oldest pending event to make room
    DropOldest,
    /// Treat the overflow as a kernel fault
    Fault,
}

/// Circular buffer with a capacity fixed at compile time.
///
/// Strict FIFO, no priorities. The backing store is allocated once, inline,
/// and never grows.
pub struct BoundedQueue<T, const N: usize> {
    slots: [Option<T>; N],
    front: usize,
    size: usize,
}

impl<T, const N: usize> BoundedQueue<T, N> {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            front: 0,
            size: 0,
        }
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub const fn is_full(&self) -> bool {
        self.size == N
    }

    /// Appends at the rear. A full queue is left untouched.
    pub fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        if self.is_full() {
            return Err(QueueError::Full);
        }

        let rear = (self.front + self.size) % N;
        self.slots[rear] = Some(item);
        self.size += 1;
        Ok(())
    }

    /// Removes and returns the front item
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        if self.is_empty() {
            return Err(QueueError::Empty);
        }

        let item = self.slots[self.front].take().ok_or(QueueError::Empty)?;
        self.front = (self.front + 1) % N;
        self.size -= 1;
        Ok(item)
    }

    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            self.slots[self.front].as_ref()
        }
    }

    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.front = 0;
        self.size = 0;
    }
}

impl<T, const N: usize> Default for BoundedQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeue_order_matches_enqueue_order_across_wrap() {
        let mut queue: BoundedQueue<u16, 3> = BoundedQueue::new();
        let mut next_in = 0u16;
        let mut next_out = 0u16;

        // Interleave so front/rear wrap several times
        for round in 0..10 {
            for _ in 0..(round % 3) + 1 {
                if queue.enqueue(next_in).is_ok() {
                    next_in += 1;
                }
                assert!(queue.len() <= queue.capacity());
            }
            while let Ok(item) = queue.dequeue() {
                assert_eq!(item, next_out);
                next_out += 1;
            }
        }

        assert_eq!(next_in, next_out);
        assert!(next_in > 3);
    }

    #[test]
    fn full_queue_rejects_and_stays_unchanged() {
        let mut queue: BoundedQueue<u8, 2> = BoundedQueue::new();
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();

        assert!(queue.is_full());
        assert_eq!(queue.enqueue(3), Err(QueueError::Full));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Ok(1));
        assert_eq!(queue.dequeue(), Ok(2));
    }

    #[test]
    fn empty_dequeue_fails_instead_of_returning_garbage() {
        let mut queue: BoundedQueue<u8, 4> = BoundedQueue::new();
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));

        queue.enqueue(9).unwrap();
        queue.dequeue().unwrap();
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));
        assert!(queue.peek().is_none());
    }

    #[test]
    fn zero_capacity_queue_is_always_full() {
        let mut queue: BoundedQueue<u8, 0> = BoundedQueue::new();
        assert!(queue.is_empty());
        assert!(queue.is_full());
        assert_eq!(queue.enqueue(1), Err(QueueError::Full));
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));
    }

    #[test]
    fn clear_resets_indices() {
        let mut queue: BoundedQueue<u8, 3> = BoundedQueue::default();
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();
        queue.dequeue().unwrap();
        queue.clear();

        assert!(queue.is_empty());
        queue.enqueue(7).unwrap();
        assert_eq!(queue.peek(), Some(&7));
    }
}
