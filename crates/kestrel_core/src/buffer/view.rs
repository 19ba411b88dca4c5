//! # Read-Only Buffer View

use std::fmt;
use std::ptr;

use super::StateBuffer;

/// A read-only, non-owning view of a [`StateBuffer`].
///
/// Views are `Copy` and pointer-sized. They expose no write operation, and
/// the lifetime `'a` prevents a view from outliving the backend's buffer.
/// Every `load` reads the live storage; nothing is cached.
#[derive(Clone, Copy)]
pub struct StateView<'a, const N: usize> {
    buffer: &'a StateBuffer<N>,
}

impl<'a, const N: usize> StateView<'a, N> {
    /// Number of elements in the viewed buffer.
    pub const LEN: usize = N;

    #[inline]
    pub(crate) const fn new(buffer: &'a StateBuffer<N>) -> Self {
        Self { buffer }
    }

    /// Reads the current value of every element.
    #[inline]
    #[must_use]
    pub fn load(&self) -> [f64; N] {
        self.buffer.load()
    }

    /// Reads the current value of one element.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.buffer.get(index)
    }

    /// Returns `true` if this view borrows exactly `buffer`.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, buffer: &StateBuffer<N>) -> bool {
        ptr::eq(self.buffer, buffer)
    }

    /// Address of the viewed storage.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> *const StateBuffer<N> {
        self.buffer
    }
}

impl StateView<'_, 9> {
    /// Reads a row-major 3x3 buffer as a matrix.
    #[must_use]
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        let v = self.load();
        [[v[0], v[1], v[2]], [v[3], v[4], v[5]], [v[6], v[7], v[8]]]
    }
}

impl<const N: usize> fmt::Debug for StateView<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateView")
            .field("ptr", &self.as_ptr())
            .field("values", &self.load())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_reads_live_storage() {
        let buffer = StateBuffer::new([0.0, 0.0, 0.0, 1.0]);
        let view = buffer.view();

        buffer.store([0.0, 0.0, 0.7071, 0.7071]);
        assert_eq!(view.load(), [0.0, 0.0, 0.7071, 0.7071]);
        assert_eq!(view.get(3), Some(0.7071));
    }

    #[test]
    fn test_ptr_eq() {
        let a = StateBuffer::<3>::default();
        let b = StateBuffer::<3>::default();
        let view = a.view();

        assert!(view.ptr_eq(&a));
        assert!(!view.ptr_eq(&b));
        assert_eq!(view.as_ptr(), ptr::addr_of!(a));
    }

    #[test]
    fn test_matrix_row_major() {
        let buffer = StateBuffer::new([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let m = buffer.view().matrix();
        assert_eq!(m[0], [1.0, 2.0, 3.0]);
        assert_eq!(m[1][2], 6.0);
        assert_eq!(m[2][0], 7.0);
    }

    #[test]
    fn test_copy_views_share_storage() {
        let buffer = StateBuffer::<3>::default();
        let first = buffer.view();
        let second = first;

        buffer.set(0, 2.5);
        assert_eq!(first.get(0), second.get(0));
        assert_eq!(StateView::<3>::LEN, 3);
    }
}
