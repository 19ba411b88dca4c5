//! # Generational Slot Arena
//!
//! Fixed-capacity storage that hands out generational ids instead of
//! addresses.

use std::fmt;

/// Identifier of a value stored in a [`SlotArena`].
///
/// The ID is split into two parts:
/// - Lower 32 bits: Slot index
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SlotId(u64);

impl SlotId {
    /// Creates a slot ID from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotId")
            .field("index", &self.index())
            .field("generation", &self.generation())
            .finish()
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {} (gen {})", self.index(), self.generation())
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A fixed-capacity arena addressed by [`SlotId`].
///
/// Removing a value bumps its slot's generation, so every id handed out for
/// the old value stops resolving, even after the slot is reused.
///
/// # Thread Safety
///
/// Mutation needs `&mut self`. Shared `&SlotArena<T>` access is as
/// thread-safe as `&T`.
///
/// # Example
///
/// ```rust
/// use kestrel_core::SlotArena;
///
/// let mut arena: SlotArena<u32> = SlotArena::with_capacity(4);
/// let id = arena.insert(42).unwrap();
/// assert_eq!(arena.get(id), Some(&42));
///
/// arena.remove(id);
/// assert_eq!(arena.get(id), None);
/// ```
pub struct SlotArena<T> {
    /// The storage array.
    slots: Box<[Slot<T>]>,
    /// Free list - indices of available slots.
    free_list: Vec<u32>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an arena with room for `capacity` values.
    ///
    /// All memory is pre-allocated upfront. Capacity is clamped to
    /// `u32::MAX` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = u32::try_from(capacity).unwrap_or(u32::MAX);

        let slots: Vec<Slot<T>> = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                value: None,
            })
            .collect();

        // Reversed so that the lowest index is handed out first
        let free_list: Vec<u32> = (0..capacity).rev().collect();

        Self {
            slots: slots.into_boxed_slice(),
            free_list,
            len: 0,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores a value, returning its id, or `None` if the arena is full.
    pub fn insert(&mut self, value: T) -> Option<SlotId> {
        let index = self.free_list.pop()?;
        let slot = &mut self.slots[index as usize];

        slot.value = Some(value);
        self.len += 1;

        Some(SlotId::new(index, slot.generation))
    }

    /// Removes and returns the value for `id`.
    ///
    /// Returns `None` if `id` is stale or was never issued.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index());
        self.len -= 1;

        Some(value)
    }

    /// Gets a reference to the value for `id`.
    #[inline]
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&T> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    /// Returns `true` if `id` currently resolves.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates over all occupied slots.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots.iter().zip(0u32..).filter_map(|(slot, index)| {
            slot.value
                .as_ref()
                .map(|value| (SlotId::new(index, slot.generation), value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_id_packing() {
        let id = SlotId::new(7, 3);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 3);
        assert_eq!(id.to_string(), "slot 7 (gen 3)");
    }

    #[test]
    fn test_insert_get_remove() {
        let mut arena: SlotArena<&str> = SlotArena::with_capacity(2);

        let id = arena.insert("imu_1").unwrap();
        assert_eq!(arena.get(id), Some(&"imu_1"));
        assert_eq!(arena.len(), 1);

        assert_eq!(arena.remove(id), Some("imu_1"));
        assert!(arena.is_empty());
        assert_eq!(arena.remove(id), None);
    }

    #[test]
    fn test_full_arena() {
        let mut arena: SlotArena<u8> = SlotArena::with_capacity(2);

        let _ = arena.insert(1).unwrap();
        let _ = arena.insert(2).unwrap();
        assert!(arena.insert(3).is_none());
        assert_eq!(arena.capacity(), 2);
    }

    #[test]
    fn test_reused_slot_rejects_stale_id() {
        let mut arena: SlotArena<u32> = SlotArena::with_capacity(1);

        let old = arena.insert(1).unwrap();
        arena.remove(old);

        let new = arena.insert(2).unwrap();
        assert_eq!(old.index(), new.index()); // Same slot reused
        assert_ne!(old, new);
        assert!(!arena.contains(old));
        assert_eq!(arena.get(new), Some(&2));
    }

    #[test]
    fn test_iter_yields_live_ids() {
        let mut arena: SlotArena<u32> = SlotArena::with_capacity(3);
        let a = arena.insert(10).unwrap();
        let b = arena.insert(20).unwrap();
        let c = arena.insert(30).unwrap();
        arena.remove(b);

        let live: Vec<_> = arena.iter().collect();
        assert_eq!(live, vec![(a, &10), (c, &30)]);
    }
}
