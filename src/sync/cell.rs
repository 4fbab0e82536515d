//! Storage shared between normal context and the timer interrupt.

use core::cell::UnsafeCell;

use super::guard::{InterruptContext, InterruptGuard};

/// A value shared with the timer interrupt.
///
/// Multi-byte values (positions, fat pointers) are written non-atomically by
/// the hardware, so every normal-context access is bracketed by an
/// [`InterruptGuard`]. The interrupt handler itself never masks: it is the
/// only code running while it runs.
pub struct IsrCell<T> {
    value: UnsafeCell<T>,
}

// SAFETY: every access path either masks interrupts (normal context) or
// requires an `InterruptContext` (the handler, which cannot be preempted by
// normal context). Masking serializes accesses only on a single core, so
// `no_std` builds must use a single-core `critical-section` implementation.
// With `std`, the host implementation is a global lock and `peek` goes
// through it too, so normal-context threads never race each other.
unsafe impl<T: Send> Sync for IsrCell<T> {}

impl<T> IsrCell<T> {
    /// Create a new cell.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
        }
    }

    /// Consume the cell and return the value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }

    /// Exclusive access through a unique borrow; no masking needed.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Run `f` on the value from interrupt context.
    ///
    /// `f` must not reach this same cell again.
    #[inline]
    pub(crate) fn with_isr<R>(&self, _cx: &InterruptContext, f: impl FnOnce(&mut T) -> R) -> R {
        // SAFETY: interrupt context cannot be preempted by normal context, and
        // the closure is crate code that never re-enters this cell.
        f(unsafe { &mut *self.value.get() })
    }
}

impl<T: Copy> IsrCell<T> {
    /// Read the value from normal context.
    #[inline]
    pub fn get(&self) -> T {
        let guard = InterruptGuard::acquire();
        self.get_in(&guard)
    }

    /// Write the value from normal context.
    #[inline]
    pub fn set(&self, value: T) {
        let guard = InterruptGuard::acquire();
        self.set_in(&guard, value);
    }

    /// Read the value under a guard the caller already holds.
    #[inline]
    pub fn get_in(&self, _guard: &InterruptGuard) -> T {
        // SAFETY: interrupts are masked for the lifetime of `_guard`.
        unsafe { *self.value.get() }
    }

    /// Write the value under a guard the caller already holds.
    #[inline]
    pub fn set_in(&self, _guard: &InterruptGuard, value: T) {
        // SAFETY: interrupts are masked for the lifetime of `_guard`.
        unsafe { *self.value.get() = value }
    }

    /// Read the value from interrupt context.
    #[inline]
    pub fn isr_get(&self, _cx: &InterruptContext) -> T {
        // SAFETY: see `with_isr`.
        unsafe { *self.value.get() }
    }

    /// Write the value from interrupt context.
    #[inline]
    pub fn isr_set(&self, _cx: &InterruptContext, value: T) {
        // SAFETY: see `with_isr`.
        unsafe { *self.value.get() = value }
    }

    /// Unsynchronized volatile read.
    ///
    /// The result may be torn if the interrupt updates a value wider than the
    /// native word mid-read. Only use it as a hint that is confirmed with a
    /// guarded read before acting on it.
    #[cfg(not(feature = "std"))]
    #[inline]
    pub(crate) fn peek(&self) -> T {
        // SAFETY: on a single core the only concurrent writer is the
        // interrupt; the pointer is valid and aligned, and a torn value is
        // still a valid bit pattern for the integer types peeked in this crate.
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }

    /// Hint read; a guarded read on hosts, where callers may be threads.
    #[cfg(feature = "std")]
    #[inline]
    pub(crate) fn peek(&self) -> T {
        self.get()
    }
}

impl<T: Copy + Default> Default for IsrCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
