//! Cross-context access discipline.
//!
//! The crate runs on a single core with two priority levels: the timer
//! interrupt (scheduler dispatch and every axis tick) and normal context
//! (all commands). State touched by both lives in an [`IsrCell`]:
//!
//! - normal context reads and writes it under an [`InterruptGuard`], either
//!   one taken for a single access (`get`/`set`) or one shared by several
//!   accesses (`get_in`/`set_in`);
//! - interrupt context accesses it without masking, which requires an
//!   [`InterruptContext`] token that only the interrupt handler can conjure.
//!
//! Nothing here is a general-purpose lock. It is only sound because there is
//! exactly one interrupt level that touches the guarded state.

mod cell;
mod guard;

pub use cell::IsrCell;
pub use guard::{InterruptContext, InterruptGuard};

#[cfg(test)]
pub(crate) use guard::test_context;
