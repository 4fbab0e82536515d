//! Fixed-capacity round-robin registry.

use crate::error::{Result, SchedulerError};
use crate::sync::{InterruptContext, InterruptGuard, IsrCell};

use super::Tickable;

/// Registry capacity of the reference build.
pub const DEFAULT_CAPACITY: usize = 4;

type Slot<'a> = Option<&'a dyn Tickable>;

/// Round-robin dispatcher for the timer interrupt.
///
/// The registry has `N` slots fixed at build time. Every call to
/// [`dispatch`](Self::dispatch) advances the cursor by one slot and ticks
/// whatever is registered there, so with all slots taken each owner gets
/// one tick in `N` interrupts.
///
/// The scheduler borrows its owners for `'a`, so an owner cannot be dropped
/// while the scheduler could still dispatch to it.
///
/// # Example
///
/// ```rust,ignore
/// static SCHEDULER: TickScheduler<'static> = TickScheduler::new();
///
/// SCHEDULER.register(x_axis).or_fatal(&mut sink).leak();
///
/// #[interrupt]
/// fn TIMER2_COMPA() {
///     let cx = unsafe { InterruptContext::assume() };
///     SCHEDULER.dispatch(&cx);
/// }
/// ```
pub struct TickScheduler<'a, const N: usize = DEFAULT_CAPACITY> {
    slots: [IsrCell<Slot<'a>>; N],
    cursor: IsrCell<usize>,
}

impl<'a, const N: usize> TickScheduler<'a, N> {
    /// Create a scheduler with every slot empty.
    pub const fn new() -> Self {
        Self {
            slots: [const { IsrCell::new(None) }; N],
            cursor: IsrCell::new(0),
        }
    }

    /// Number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Install `owner` in the first empty slot.
    ///
    /// The scan and the slot write happen under one interrupt guard, so
    /// dispatch never sees a half-written slot.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::AlreadyRegistered`] if `owner` already holds a slot.
    /// - [`SchedulerError::CapacityExceeded`] if every slot is taken. This is a
    ///   build configuration error; route it to a
    ///   [`FatalSink`](crate::fatal::FatalSink).
    pub fn register(&self, owner: &'a dyn Tickable) -> Result<Registration<'_, 'a, N>> {
        let guard = InterruptGuard::acquire();

        if self
            .slots
            .iter()
            .any(|slot| is_owner(slot.get_in(&guard), owner))
        {
            return Err(SchedulerError::AlreadyRegistered.into());
        }

        let Some(index) = self.slots.iter().position(|slot| slot.get_in(&guard).is_none()) else {
            drop(guard);
            error!("tick scheduler full ({=usize} slots)", N);
            return Err(SchedulerError::CapacityExceeded { capacity: N }.into());
        };

        self.slots[index].set_in(&guard, Some(owner));
        drop(guard);

        debug!("tick scheduler: registered slot {=usize}", index);
        Ok(Registration {
            scheduler: self,
            owner,
        })
    }

    /// Clear every slot holding `owner`.
    ///
    /// Returns `false`, and changes nothing, if `owner` was not registered.
    /// Slots are not compacted.
    pub fn unregister(&self, owner: &dyn Tickable) -> bool {
        let mut removed = false;
        for slot in self.slots.iter() {
            let guard = InterruptGuard::acquire();
            if is_owner(slot.get_in(&guard), owner) {
                slot.set_in(&guard, None);
                removed = true;
            }
        }

        if removed {
            debug!("tick scheduler: unregistered");
        }
        removed
    }

    /// Whether `owner` currently holds a slot.
    pub fn is_registered(&self, owner: &dyn Tickable) -> bool {
        self.slots.iter().any(|slot| is_owner(slot.get(), owner))
    }

    /// Number of occupied slots.
    pub fn registered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    /// Advance the cursor and tick the owner of the slot it lands on.
    ///
    /// Call once per timer interrupt. With an empty slot under the cursor
    /// nothing runs.
    pub fn dispatch(&self, cx: &InterruptContext) {
        if N == 0 {
            return;
        }

        let next = self.cursor.isr_get(cx) + 1;
        let cursor = if next >= N { 0 } else { next };
        self.cursor.isr_set(cx, cursor);

        if let Some(owner) = self.slots[cursor].isr_get(cx) {
            owner.tick(cx);
        }
    }
}

impl<'a, const N: usize> Default for TickScheduler<'a, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn is_owner(slot: Slot<'_>, owner: &dyn Tickable) -> bool {
    slot.is_some_and(|held| core::ptr::addr_eq(held, owner))
}

/// Live registration of an owner with a [`TickScheduler`].
///
/// Dropping it unregisters the owner. Call [`leak`](Self::leak) to keep the
/// owner registered for the rest of the program.
#[must_use = "dropping a Registration unregisters the owner immediately"]
pub struct Registration<'s, 'a, const N: usize> {
    scheduler: &'s TickScheduler<'a, N>,
    owner: &'a dyn Tickable,
}

impl<'s, 'a, const N: usize> Registration<'s, 'a, N> {
    /// Keep the owner registered forever.
    pub fn leak(self) {
        core::mem::forget(self);
    }

    /// Unregister now. Equivalent to dropping the registration.
    pub fn cancel(self) {}
}

impl<'s, 'a, const N: usize> Drop for Registration<'s, 'a, N> {
    fn drop(&mut self) {
        self.scheduler.unregister(self.owner);
    }
}
