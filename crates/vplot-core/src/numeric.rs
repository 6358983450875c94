//! Scoped control over fit diagnostics.
//!
//! Shaping and composing turn fit diagnostics off for their duration. The previous state is
//! restored when the guard drops, so an early return or `?` never leaks the suppressed state
//! into later, unrelated calls.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
    static FIT_WARNINGS: Cell<bool> = const { Cell::new(true) };
}

/// Whether fit fallbacks are currently reported through `tracing`.
pub fn fit_warnings_enabled() -> bool {
    FIT_WARNINGS.with(Cell::get)
}

/// Suppresses fit diagnostics on the current thread until dropped. Guards nest.
#[must_use = "diagnostics are restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct QuietFitWarnings {
    previous: bool,
    // The state is thread-local; the guard must be dropped on the thread that created it.
    _not_send: PhantomData<*const ()>,
}

impl QuietFitWarnings {
    pub fn enter() -> Self {
        let previous = FIT_WARNINGS.with(|w| w.replace(false));
        Self {
            previous,
            _not_send: PhantomData,
        }
    }
}

impl Drop for QuietFitWarnings {
    fn drop(&mut self) {
        FIT_WARNINGS.with(|w| w.set(self.previous));
    }
}
