//! Generational storage for entities that come and go during a level.

use crypt_caster_core::SlotKey;
use slotmap::{DefaultKey, Key, KeyData, SlotMap};

/// Slot map handing out generation-checked keys.
///
/// Keys issued before a removal never resolve to a later occupant of the same
/// slot. Handles cross the crate boundary as [`SlotKey`].
#[derive(Debug)]
pub(crate) struct Arena<T> {
    entries: SlotMap<DefaultKey, T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            entries: SlotMap::with_key(),
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn insert(&mut self, value: T) -> SlotKey {
        to_slot_key(self.entries.insert(value))
    }

    pub(crate) fn get(&self, key: SlotKey) -> Option<&T> {
        self.entries.get(from_slot_key(key))
    }

    pub(crate) fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        self.entries.get_mut(from_slot_key(key))
    }

    pub(crate) fn remove(&mut self, key: SlotKey) -> Option<T> {
        self.entries.remove(from_slot_key(key))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Live entries in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> {
        self.entries
            .iter()
            .map(|(key, value)| (to_slot_key(key), value))
    }

    /// Snapshot of live keys, for loops that mutate the arena.
    pub(crate) fn keys(&self) -> Vec<SlotKey> {
        self.entries.keys().map(to_slot_key).collect()
    }
}

fn to_slot_key(key: DefaultKey) -> SlotKey {
    let raw = key.data().as_ffi();
    SlotKey::new(raw as u32, (raw >> 32) as u32)
}

fn from_slot_key(key: SlotKey) -> DefaultKey {
    let raw = (u64::from(key.generation()) << 32) | u64::from(key.index());
    KeyData::from_ffi(raw).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_keys_do_not_resolve_after_reuse() {
        let mut arena = Arena::default();
        let first = arena.insert("ghoul");
        assert_eq!(arena.remove(first), Some("ghoul"));

        let second = arena.insert("thing");
        assert_eq!(second.index(), first.index());
        assert_ne!(second.generation(), first.generation());
        assert!(arena.get(first).is_none());
        assert_eq!(arena.remove(first), None);
        assert_eq!(arena.get(second), Some(&"thing"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn iteration_follows_slot_order() {
        let mut arena = Arena::default();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let _ = arena.insert(3);
        let _ = arena.remove(b);
        if let Some(value) = arena.get_mut(a) {
            *value = 10;
        }

        let values: Vec<i32> = arena.iter().map(|(_, value)| *value).collect();
        assert_eq!(values, vec![10, 3]);
        assert_eq!(arena.keys().first(), Some(&a));
        assert_eq!(arena.keys().len(), 2);
    }

    #[test]
    fn keys_survive_the_round_trip_through_slot_keys() {
        let mut arena = Arena::default();
        let key = arena.insert("skeleton");
        assert_eq!(to_slot_key(from_slot_key(key)), key);
        assert_eq!(arena.get(SlotKey::new(key.index() + 1, key.generation())), None);
    }
}
