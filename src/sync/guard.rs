//! Interrupt guard and interrupt-context token.

use core::marker::PhantomData;

/// RAII critical section.
///
/// Interrupts are masked from [`acquire`](Self::acquire) until the guard is
/// dropped, on every exit path. The previous interrupt state is restored, so
/// guards nest, but they must be dropped in reverse order of acquisition.
/// Inside the crate a guard is always a local that lives for one field access
/// (or one read-modify-write), which keeps the ordering trivially correct.
#[must_use = "interrupts are re-enabled as soon as the guard is dropped"]
pub struct InterruptGuard {
    restore: critical_section::RestoreState,
    /// Guards must be released on the context that acquired them.
    _not_send: PhantomData<*mut ()>,
}

impl InterruptGuard {
    /// Mask interrupts until the returned guard is dropped.
    #[inline]
    pub(crate) fn acquire() -> Self {
        // SAFETY: the matching `release` runs in `Drop`, on this context, and
        // crate code never reorders guard drops.
        let restore = unsafe { critical_section::acquire() };
        Self {
            restore,
            _not_send: PhantomData,
        }
    }
}

impl Drop for InterruptGuard {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: `restore` came from the `acquire` that created this guard.
        unsafe { critical_section::release(self.restore) }
    }
}

/// Proof that the current code runs inside the timer interrupt.
///
/// Interrupt-context accessors of [`IsrCell`](super::IsrCell) take this token
/// instead of masking interrupts: nothing in normal context can run while the
/// handler does, and normal context only touches shared state with interrupts
/// masked.
pub struct InterruptContext {
    _not_send: PhantomData<*mut ()>,
}

impl InterruptContext {
    /// Assert that the caller is the timer interrupt handler.
    ///
    /// # Safety
    ///
    /// Must only be called from the interrupt handler that dispatches the
    /// scheduler (or from code that can neither preempt nor be preempted by
    /// any other code touching the same axes, such as a single-threaded host
    /// test). The token must not outlive the handler invocation.
    #[inline]
    pub unsafe fn assume() -> Self {
        Self {
            _not_send: PhantomData,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> InterruptContext {
    // SAFETY: unit tests drive ticks from the test thread only.
    unsafe { InterruptContext::assume() }
}
