//! Search queue
//!
//! Ordered waiting list of clients looking for a partner. Strict FIFO:
//! first in, first matched. The matchmaker keeps the queue consistent
//! with client state: an id is queued iff its client is `Searching`.

use std::collections::VecDeque;

use crate::types::ClientId;

/// FIFO queue of clients waiting to be matched
#[derive(Debug, Default)]
pub struct SearchQueue {
    waiting: VecDeque<ClientId>,
}

impl SearchQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            waiting: VecDeque::new(),
        }
    }

    /// Append `id` to the tail
    ///
    /// Caller must ensure `id` is not already queued; the matchmaker
    /// enforces this by checking client state before pushing.
    pub fn push(&mut self, id: ClientId) {
        self.waiting.push_back(id);
    }

    /// Remove and return the head, or None if empty
    pub fn pop_front(&mut self) -> Option<ClientId> {
        self.waiting.pop_front()
    }

    /// Remove `id` from anywhere in the queue; no-op if absent
    pub fn remove(&mut self, id: ClientId) {
        self.waiting.retain(|queued| *queued != id);
    }

    /// Check whether `id` is queued
    pub fn contains(&self, id: ClientId) -> bool {
        self.waiting.contains(&id)
    }

    /// Number of waiting clients
    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }
}
