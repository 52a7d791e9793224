//! Debounced, position-addressable undo history.
//!
//! Changes update the live buffer immediately but only become undo points
//! once a quiet period passes without another change. The pending commit is a
//! single deadline slot owned by the stack: every change overwrites it, which
//! is the cancel-and-rearm of a debounce timer without any timer object.
//!
//! The host drives time. Call [`HistoryStack::tick`] with the current instant
//! whenever convenient (or await [`HistoryStack::next_deadline`]) and the
//! pending change is committed once its deadline has passed.

use std::time::Duration;

use inkdown_common::config::HistoryConfig;
use web_time::Instant;

/// Trait for managing undo operations.
///
/// Undo is backward-only; there is no redo path.
pub trait UndoManager {
    /// Check if undo is available.
    fn can_undo(&self) -> bool;

    /// Perform undo. Returns true if the live buffer changed.
    fn undo(&mut self) -> bool;

    /// Forget every entry except the live buffer.
    fn clear_history(&mut self);
}

/// One undo point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry<B> {
    pub snapshot: B,
    pub timestamp: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Idle,
    PendingCommit { deadline: Instant },
}

/// Linear history of buffer versions plus the live (possibly uncommitted)
/// buffer.
#[derive(Debug, Clone)]
pub struct HistoryStack<B> {
    entries: Vec<HistoryEntry<B>>,
    index: usize,
    live: B,
    deadline: Option<Instant>,
    debounce: Duration,
    max_entries: usize,
}

impl<B: Clone + PartialEq> HistoryStack<B> {
    /// Start a history whose first entry is `initial`.
    pub fn new(initial: B, config: &HistoryConfig, now: Instant) -> Self {
        Self {
            entries: vec![HistoryEntry {
                snapshot: initial.clone(),
                timestamp: now,
            }],
            index: 0,
            live: initial,
            deadline: None,
            debounce: config.debounce(),
            max_entries: config.max_entries.max(1),
        }
    }

    /// The buffer the user currently sees.
    pub fn live(&self) -> &B {
        &self.live
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry<B>] {
        &self.entries
    }

    pub fn state(&self) -> HistoryState {
        match self.deadline {
            Some(deadline) => HistoryState::PendingCommit { deadline },
            None => HistoryState::Idle,
        }
    }

    /// When the pending change will be committed, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Record a new live buffer and (re)arm the commit deadline.
    pub fn record_change(&mut self, buffer: B, now: Instant) {
        self.live = buffer;
        let deadline = now + self.debounce;
        if self.deadline.replace(deadline).is_some() {
            tracing::trace!("history debounce rearmed");
        }
    }

    /// Commit the pending change if its deadline has passed.
    ///
    /// Returns true when a commit happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.commit(deadline);
                true
            }
            _ => false,
        }
    }

    /// Commit any pending change right away.
    pub fn flush(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            self.commit(now);
            true
        } else {
            false
        }
    }

    fn commit(&mut self, timestamp: Instant) {
        self.deadline = None;

        let discarded = self.entries.len() - (self.index + 1);
        self.entries.truncate(self.index + 1);

        if self.entries[self.index].snapshot == self.live {
            tracing::trace!(discarded, "history commit skipped, buffer unchanged");
            return;
        }

        self.entries.push(HistoryEntry {
            snapshot: self.live.clone(),
            timestamp,
        });
        self.index += 1;

        while self.entries.len() > self.max_entries {
            self.entries.remove(0);
            self.index -= 1;
        }

        tracing::debug!(
            index = self.index,
            entries = self.entries.len(),
            discarded,
            "history checkpoint"
        );
    }

    /// Step back one entry. A pending change is committed first so it can
    /// be undone like any other.
    pub fn undo_at(&mut self, now: Instant) -> bool {
        self.flush(now);
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        // Straight index move: no deadline is armed, nothing is recorded.
        self.live = self.entries[self.index].snapshot.clone();
        tracing::debug!(index = self.index, "undo");
        true
    }
}

impl<B: Clone + PartialEq> UndoManager for HistoryStack<B> {
    fn can_undo(&self) -> bool {
        self.index > 0 || self.deadline.is_some()
    }

    fn undo(&mut self) -> bool {
        self.undo_at(Instant::now())
    }

    fn clear_history(&mut self) {
        self.entries = vec![HistoryEntry {
            snapshot: self.live.clone(),
            timestamp: Instant::now(),
        }];
        self.index = 0;
        self.deadline = None;
    }
}
