// Time-boxed destruction effects.
//
// Every effect lives for the same fixed duration, so spawn order is expiry order and
// expiring always strips the head of the queue.

use crate::domain::Position;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectInstance {
    pub origin: Position,
    pub spawned_at: Instant,
}

#[derive(Debug, Clone)]
pub struct EffectQueue {
    lifetime: Duration,
    effects: VecDeque<EffectInstance>,
}

impl EffectQueue {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            effects: VecDeque::new(),
        }
    }

    pub fn spawn(&mut self, origin: Position, now: Instant) {
        self.effects.push_back(EffectInstance {
            origin,
            spawned_at: now,
        });
    }

    /// Deadline at which the oldest effect must be removed, if any remain.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.effects
            .front()
            .map(|effect| effect.spawned_at + self.lifetime)
    }

    /// Drops every effect whose lifetime has elapsed, oldest first. Returns how many were dropped.
    pub fn expire(&mut self, now: Instant) -> usize {
        let mut expired = 0;
        while self.next_expiry().is_some_and(|deadline| deadline <= now) {
            self.effects.pop_front();
            expired += 1;
        }
        expired
    }

    /// Read-only view for the current frame; re-derived every time it is called.
    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> + '_ {
        self.effects.iter()
    }

    pub fn origins(&self) -> Vec<Position> {
        self.iter().map(|effect| effect.origin).collect()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
