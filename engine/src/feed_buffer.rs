use std::collections::VecDeque;

use corelib::models::Event;

use crate::error::ConfigError;

pub const DEFAULT_CAPACITY: usize = 50;

/// Capacity-bounded history of one feed, newest first.
///
/// Order reflects arrival, never `observed_at_ms`. When an insert pushes the
/// length past `capacity`, entries are dropped from the tail (the oldest).
#[derive(Debug, Clone)]
pub struct FeedBuffer {
    /// Front holds the most recent arrival.
    events: VecDeque<Event>,
    capacity: usize,
}

impl FeedBuffer {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        Ok(Self {
            events: VecDeque::with_capacity(capacity + 1),
            capacity,
        })
    }

    /// Inserts at the front. Returns how many old events were evicted.
    pub fn append(&mut self, event: Event) -> usize {
        self.events.push_front(event);
        self.evict_overflow()
    }

    /// Inserts a batch so that the buffer then reads `events[0], events[1], ..`
    /// followed by the previous contents. Returns how many events were evicted.
    pub fn append_batch<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = Event>,
        I::IntoIter: DoubleEndedIterator,
    {
        for event in events.into_iter().rev() {
            self.events.push_front(event);
        }
        self.evict_overflow()
    }

    fn evict_overflow(&mut self) -> usize {
        let overflow = self.events.len().saturating_sub(self.capacity);
        self.events.truncate(self.capacity);
        overflow
    }

    /// Newest-first copy of the current contents.
    pub fn snapshot(&self) -> Vec<Event> {
        self.events.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Event> {
        self.events.iter()
    }

    pub fn iter_oldest_first(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().rev()
    }

    pub fn latest(&self) -> Option<&Event> {
        self.events.front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for FeedBuffer {
    fn default() -> Self {
        Self {
            events: VecDeque::with_capacity(DEFAULT_CAPACITY + 1),
            capacity: DEFAULT_CAPACITY,
        }
    }
}
