//! Interrupt dispatch slot
//!
//! Interrupt handlers are free functions, so the scheduler has to live in
//! a `static`. The slot holds it behind a blocking mutex and forwards the
//! two hardware events. Installing the scheduler and starting its first
//! cycle happen under one lock, so no completion interrupt can ever find
//! the slot empty.
//!
//! The slot also records the bus parameters the running engine was built
//! for. That record is process-wide: every `Display` handle sharing the
//! slot sees the same "already initialized" state.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::phase::Event;
use crate::traits::BusParams;

/// Anything that reacts to refresh events
pub trait RefreshEngine {
    fn handle(&mut self, event: Event);
}

struct Installed<S> {
    engine: S,
    params: BusParams,
}

/// Static home for the running scheduler
pub struct RefreshSlot<M: RawMutex, S> {
    inner: Mutex<M, RefCell<Option<Installed<S>>>>,
}

impl<M: RawMutex, S> RefreshSlot<M, S> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    pub fn is_installed(&self) -> bool {
        self.inner.lock(|cell| cell.borrow().is_some())
    }

    /// Bus parameters of the installed engine
    pub fn params(&self) -> Option<BusParams> {
        self.inner
            .lock(|cell| cell.borrow().as_ref().map(|installed| installed.params))
    }

    /// Run `f` against the installed engine, if any
    pub fn with<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.inner
            .lock(|cell| cell.borrow_mut().as_mut().map(|installed| f(&mut installed.engine)))
    }
}

impl<M: RawMutex, S: RefreshEngine> RefreshSlot<M, S> {
    /// Build an engine for `params`, install it and run the bootstrap cycle
    ///
    /// `build` runs under the slot lock and only when the slot is empty,
    /// so two callers can never both acquire hardware for it. When the
    /// slot is occupied `build` is not called and `occupied` is returned.
    /// The second element of `build`'s output is passed back to the caller.
    pub fn start_with<T, E>(
        &self,
        params: BusParams,
        occupied: E,
        build: impl FnOnce() -> Result<(S, T), E>,
    ) -> Result<T, E> {
        self.inner.lock(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.is_some() {
                return Err(occupied);
            }
            let (engine, extra) = build()?;
            slot.insert(Installed { engine, params })
                .engine
                .handle(Event::AlarmFired);
            Ok(extra)
        })
    }

    /// Install a ready-made `engine` and run the bootstrap cycle
    ///
    /// Returns `false` (dropping `engine`) if one is already installed.
    pub fn start(&self, params: BusParams, engine: S) -> bool {
        self.start_with(params, (), || Ok((engine, ()))).is_ok()
    }

    /// Settle alarm interrupt entry point
    pub fn on_alarm(&self) -> bool {
        self.dispatch(Event::AlarmFired)
    }

    /// DMA completion interrupt entry point
    pub fn on_transfer_complete(&self) -> bool {
        self.dispatch(Event::TransferComplete)
    }

    fn dispatch(&self, event: Event) -> bool {
        self.with(|engine| engine.handle(event)).is_some()
    }
}

impl<M: RawMutex, S> Default for RefreshSlot<M, S> {
    fn default() -> Self {
        Self::new()
    }
}
