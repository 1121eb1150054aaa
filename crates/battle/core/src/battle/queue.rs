//! Indexed min-priority turn queue.
//!
//! Entries live in a flat vector. `pop` scans for the minimum and every tick
//! multiplies all waiting entries by the decay factor.

use super::combatant::CombatantId;
use super::priority::Priority;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueEntry {
    pub id: CombatantId,
    pub priority: Priority,
    /// Enqueue sequence number; breaks priority ties, earliest first.
    pub seq: u64,
}

#[derive(Clone, Debug, Default)]
pub struct TurnQueue {
    entries: Vec<QueueEntry>,
    next_seq: u64,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enqueues `id`. An id already present is moved to the new priority.
    pub fn push(&mut self, id: CombatantId, priority: Priority) {
        self.remove(id);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(QueueEntry { id, priority, seq });
    }

    /// Removes and returns the entry with the lowest `(priority, seq)`.
    pub fn pop(&mut self) -> Option<QueueEntry> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| (entry.priority, entry.seq))
            .map(|(index, _)| index)?;
        Some(self.entries.swap_remove(index))
    }

    pub fn remove(&mut self, id: CombatantId) -> Option<QueueEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.swap_remove(index))
    }

    /// Decays every waiting entry. Called after a pop, so the actor is not
    /// among them.
    pub fn decay_all(&mut self) {
        for entry in &mut self.entries {
            entry.priority = entry.priority.decay();
        }
    }

    pub fn priority_of(&self, id: CombatantId) -> Option<Priority> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.priority)
    }

    pub fn contains(&self, id: CombatantId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_lowest_then_earliest() {
        let mut queue = TurnQueue::new();
        queue.push(CombatantId(0), Priority::for_speed(100, 5));
        queue.push(CombatantId(1), Priority::for_speed(100, 10));
        queue.push(CombatantId(2), Priority::for_speed(100, 10));

        assert_eq!(queue.pop().map(|e| e.id), Some(CombatantId(1)));
        assert_eq!(queue.pop().map(|e| e.id), Some(CombatantId(2)));
        assert_eq!(queue.pop().map(|e| e.id), Some(CombatantId(0)));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn decay_lowers_every_waiting_entry() {
        let mut queue = TurnQueue::new();
        for (id, spd) in [(0, 3), (1, 7), (2, 11)] {
            queue.push(CombatantId(id), Priority::for_speed(100, spd));
        }
        let actor = queue.pop().map(|e| e.id);
        let before: Vec<_> = queue.iter().map(|e| (e.id, e.priority)).collect();

        queue.decay_all();

        for (id, priority) in before {
            assert_ne!(Some(id), actor);
            assert!(queue.priority_of(id).is_some_and(|now| now < priority));
        }
    }

    #[test]
    fn push_replaces_and_remove_drops() {
        let mut queue = TurnQueue::new();
        queue.push(CombatantId(4), Priority::ratio(9, 1));
        queue.push(CombatantId(4), Priority::ratio(1, 1));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.priority_of(CombatantId(4)), Some(Priority::ratio(1, 1)));

        assert!(queue.remove(CombatantId(4)).is_some());
        assert!(!queue.contains(CombatantId(4)));
    }
}
