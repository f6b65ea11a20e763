//! One-shot actions keyed by simulation time.

use std::{cmp::Reverse, collections::BinaryHeap, time::Duration};

use crypt_caster_core::EffectId;

/// Deferred world mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScheduledAction {
    /// Allows the next footstep cue to play.
    ClearFootsteps,
    /// Removes a transient effect such as a corpse.
    DespawnEffect(EffectId),
}

#[derive(Debug, PartialEq, Eq)]
struct Entry {
    due: Duration,
    sequence: u64,
    action: ScheduledAction,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.sequence).cmp(&(other.due, other.sequence))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of actions ordered by due time, ties broken by insertion order.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    next_sequence: u64,
}

impl Scheduler {
    pub(crate) fn schedule(&mut self, due: Duration, action: ScheduledAction) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Reverse(Entry {
            due,
            sequence,
            action,
        }));
    }

    /// Pops the earliest action due at or before `now`.
    pub(crate) fn pop_due(&mut self, now: Duration) -> Option<ScheduledAction> {
        match self.queue.peek() {
            Some(Reverse(entry)) if entry.due <= now => {
                self.queue.pop().map(|Reverse(entry)| entry.action)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypt_caster_core::SlotKey;

    #[test]
    fn actions_fire_in_due_order_then_insertion_order() {
        let corpse = EffectId::new(SlotKey::new(0, 0));
        let mut scheduler = Scheduler::default();
        scheduler.schedule(Duration::from_millis(300), ScheduledAction::DespawnEffect(corpse));
        scheduler.schedule(Duration::from_millis(100), ScheduledAction::ClearFootsteps);
        scheduler.schedule(Duration::from_millis(300), ScheduledAction::ClearFootsteps);

        assert_eq!(scheduler.pop_due(Duration::from_millis(50)), None);
        assert_eq!(
            scheduler.pop_due(Duration::from_millis(100)),
            Some(ScheduledAction::ClearFootsteps)
        );
        assert_eq!(scheduler.pop_due(Duration::from_millis(299)), None);

        let now = Duration::from_secs(1);
        assert_eq!(
            scheduler.pop_due(now),
            Some(ScheduledAction::DespawnEffect(corpse))
        );
        assert_eq!(scheduler.pop_due(now), Some(ScheduledAction::ClearFootsteps));
        assert_eq!(scheduler.pop_due(now), None);
    }
}
