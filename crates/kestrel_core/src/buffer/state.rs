//! # Backend-Owned State Buffer

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::StateView;

/// Fixed-size `f64` storage that can be written through a shared reference.
///
/// The backend allocates one of these per physical quantity and keeps it
/// alive for as long as any handle borrows it. Writes never reallocate, so
/// every view observes the same storage for its whole lifetime.
///
/// # Thread Safety
///
/// Individual elements are read and written atomically. A multi-element
/// `load` racing a `store` may observe a mix of old and new elements.
pub struct StateBuffer<const N: usize> {
    /// Element bit patterns (`f64::to_bits`).
    cells: [AtomicU64; N],
}

impl<const N: usize> StateBuffer<N> {
    /// Number of elements in the buffer.
    pub const LEN: usize = N;

    /// Creates a buffer holding `values`.
    #[must_use]
    pub fn new(values: [f64; N]) -> Self {
        Self {
            cells: values.map(|value| AtomicU64::new(value.to_bits())),
        }
    }

    /// Reads every element.
    #[inline]
    #[must_use]
    pub fn load(&self) -> [f64; N] {
        std::array::from_fn(|i| f64::from_bits(self.cells[i].load(Ordering::Relaxed)))
    }

    /// Reads one element, or `None` if `index` is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.cells
            .get(index)
            .map(|cell| f64::from_bits(cell.load(Ordering::Relaxed)))
    }

    /// Overwrites every element.
    #[inline]
    pub fn store(&self, values: [f64; N]) {
        for (cell, value) in self.cells.iter().zip(values) {
            cell.store(value.to_bits(), Ordering::Relaxed);
        }
    }

    /// Overwrites one element. Returns `false` if `index` is out of range.
    #[inline]
    pub fn set(&self, index: usize, value: f64) -> bool {
        match self.cells.get(index) {
            Some(cell) => {
                cell.store(value.to_bits(), Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Borrows a read-only view of this buffer.
    #[inline]
    #[must_use]
    pub const fn view(&self) -> StateView<'_, N> {
        StateView::new(self)
    }
}

impl<const N: usize> Default for StateBuffer<N> {
    fn default() -> Self {
        Self::new([0.0; N])
    }
}

impl<const N: usize> fmt::Debug for StateBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateBuffer").field(&self.load()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_load() {
        let buffer = StateBuffer::new([0.0, 0.0, 0.0, 1.0]);
        assert_eq!(buffer.load(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(StateBuffer::<4>::LEN, 4);
    }

    #[test]
    fn test_default_is_zeroed() {
        let buffer = StateBuffer::<9>::default();
        assert_eq!(buffer.load(), [0.0; 9]);
    }

    #[test]
    fn test_store_overwrites_all() {
        let buffer = StateBuffer::new([1.0, 2.0, 3.0]);
        buffer.store([-0.5, f64::NAN, 9.81]);

        let values = buffer.load();
        assert_eq!(values[0], -0.5);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 9.81);
    }

    #[test]
    fn test_get_and_set_bounds() {
        let buffer = StateBuffer::<3>::default();
        assert!(buffer.set(2, 4.5));
        assert!(!buffer.set(3, 1.0));
        assert_eq!(buffer.get(2), Some(4.5));
        assert_eq!(buffer.get(3), None);
    }

    #[test]
    fn test_shared_write_across_threads() {
        let buffer = StateBuffer::<3>::default();

        std::thread::scope(|s| {
            s.spawn(|| buffer.store([1.0, 2.0, 3.0]));
        });

        assert_eq!(buffer.load(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_debug_shows_values() {
        let buffer = StateBuffer::new([0.5, 1.5]);
        assert_eq!(format!("{buffer:?}"), "StateBuffer([0.5, 1.5])");
    }
}
