//! Bounded priority queue with FIFO order inside each priority class

use super::types::RequestPriority;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

/// Returned when the queue is at capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("queue full ({queue_length}/{max_queue_size})")]
pub struct QueueFull {
    pub queue_length: usize,
    pub max_queue_size: usize,
}

/// A request waiting for admission
#[derive(Debug)]
pub struct QueuedRequest<J> {
    pub id: Uuid,
    pub caller_id: String,
    pub priority: RequestPriority,
    pub estimated_tokens: u32,
    pub enqueued_at: Instant,
    pub max_wait: Duration,
    pub job: J,
}

impl<J> QueuedRequest<J> {
    pub fn new(
        caller_id: impl Into<String>,
        priority: RequestPriority,
        estimated_tokens: u32,
        max_wait: Duration,
        job: J,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            caller_id: caller_id.into(),
            priority,
            estimated_tokens,
            enqueued_at: Instant::now(),
            max_wait,
            job,
        }
    }

    pub fn waited(&self) -> Duration {
        self.enqueued_at.elapsed()
    }
}

/// Ordered by (priority rank, insertion order)
#[derive(Debug)]
pub struct PriorityQueue<J> {
    entries: VecDeque<QueuedRequest<J>>,
}

impl<J> Default for PriorityQueue<J> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<J> PriorityQueue<J> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert behind every entry of equal or higher urgency
    pub fn enqueue(&mut self, request: QueuedRequest<J>, max_queue_size: usize) -> Result<(), QueueFull> {
        if self.entries.len() >= max_queue_size {
            return Err(QueueFull {
                queue_length: self.entries.len(),
                max_queue_size,
            });
        }

        let rank = request.priority.rank();
        let index = self
            .entries
            .iter()
            .position(|queued| queued.priority.rank() > rank)
            .unwrap_or(self.entries.len());
        self.entries.insert(index, request);
        Ok(())
    }

    pub fn peek_front(&self) -> Option<&QueuedRequest<J>> {
        self.entries.front()
    }

    pub fn pop_front(&mut self) -> Option<QueuedRequest<J>> {
        self.entries.pop_front()
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut QueuedRequest<J>> {
        self.entries.iter_mut().find(|queued| queued.id == id)
    }

    /// Removing an id twice is a no-op
    pub fn remove_by_id(&mut self, id: Uuid) -> Option<QueuedRequest<J>> {
        let index = self.entries.iter().position(|queued| queued.id == id)?;
        self.entries.remove(index)
    }

    /// 1-based position of the caller's first queued entry
    pub fn position_of(&self, caller_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|queued| queued.caller_id == caller_id)
            .map(|index| index + 1)
    }

    /// Remove every entry matching `predicate`, keeping the order of the rest
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<QueuedRequest<J>>
    where
        F: FnMut(&QueuedRequest<J>) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = VecDeque::with_capacity(self.entries.len());
        for queued in self.entries.drain(..) {
            if predicate(&queued) {
                removed.push(queued);
            } else {
                kept.push_back(queued);
            }
        }
        self.entries = kept;
        removed
    }

    pub fn drain_all(&mut self) -> Vec<QueuedRequest<J>> {
        self.entries.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
