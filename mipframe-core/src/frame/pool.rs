//! Triple-buffer frame pool
//!
//! The pool owns three frame slots and the role table. It hands out
//! exactly one [`Producer`] (foreground) and one [`Consumer`] (interrupt
//! side). Slot memory carries no per-slot lock; exclusivity comes from the
//! role table:
//!
//! - the producer slot is only ever written by the `Producer`
//! - the consumer slot is only ever read by the transfer, and its byte 0
//!   is written by the `Consumer` right before a transfer starts
//! - the pending slot may be read by both at once (copy-on-publish and a
//!   freshly started transfer), so byte 0 is always accessed atomically
//!
//! The role lock is held only for the table update, never across a copy.

#![allow(unsafe_code)]

use core::cell::{Cell, UnsafeCell};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicBool, AtomicU8, Ordering};

use super::layout;
use super::roles::{RoleTable, SLOTS};
use crate::config::Geometry;

/// One frame of device-native bytes
struct Slot<const N: usize> {
    bytes: UnsafeCell<[u8; N]>,
}

impl<const N: usize> Slot<N> {
    const fn new() -> Self {
        Self {
            bytes: UnsafeCell::new([0; N]),
        }
    }

    fn ptr(&self) -> *mut u8 {
        self.bytes.get().cast()
    }

    /// Byte 0, shared between contexts
    fn command_byte(&self) -> &AtomicU8 {
        // SAFETY: the pointer is valid for the pool's lifetime and aligned
        // (align of u8). Byte 0 is only ever accessed through this atomic
        // once handles exist, or exclusively before that.
        unsafe { AtomicU8::from_ptr(self.ptr()) }
    }
}

/// Three frame slots plus their role assignment
///
/// `N` must equal `geometry.frame_len()`; this is checked when the pool
/// is constructed, at compile time for `static` pools.
pub struct FramePool<M: RawMutex, const N: usize> {
    slots: [Slot<N>; SLOTS],
    roles: Mutex<M, Cell<RoleTable>>,
    geometry: Geometry,
    taken: AtomicBool,
}

// SAFETY: concurrent access to slot memory is partitioned by the role
// table as described in the module docs, and the handles that perform it
// can only be obtained once.
unsafe impl<M: RawMutex + Sync, const N: usize> Sync for FramePool<M, N> {}

impl<M: RawMutex, const N: usize> FramePool<M, N> {
    /// Create an empty pool
    pub const fn new(geometry: Geometry) -> Self {
        assert!(geometry.is_valid(), "invalid panel geometry");
        assert!(geometry.frame_len() == N, "frame length does not match geometry");

        Self {
            slots: [Slot::new(), Slot::new(), Slot::new()],
            roles: Mutex::new(Cell::new(RoleTable::INITIAL)),
            geometry,
            taken: AtomicBool::new(false),
        }
    }

    /// Panel geometry the slots are laid out for
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Snapshot of the role table
    pub fn roles(&self) -> RoleTable {
        self.roles.lock(|roles| roles.get())
    }

    /// Whether the handles have been handed out
    pub fn is_split(&self) -> bool {
        self.taken.load(Ordering::Acquire)
    }

    /// Seed every slot with the frame skeleton and hand out the handles
    ///
    /// Returns `None` on every call after the first.
    pub fn split(&self) -> Option<(Producer<'_, M, N>, Consumer<'_, M, N>)> {
        if self.taken.swap(true, Ordering::AcqRel) {
            return None;
        }

        for slot in &self.slots {
            // SAFETY: no handle exists yet, so nothing else references
            // slot memory.
            let bytes = unsafe { &mut *slot.bytes.get() };
            layout::write_skeleton(bytes, &self.geometry);
        }
        self.roles.lock(|roles| roles.set(RoleTable::INITIAL));

        Some((
            Producer { pool: self },
            Consumer {
                pool: self,
                slot: RoleTable::INITIAL.consumer,
            },
        ))
    }

    fn update(&self, f: impl FnOnce(RoleTable) -> RoleTable) -> (RoleTable, RoleTable) {
        self.roles.lock(|roles| {
            let before = roles.get();
            let after = f(before);
            debug_assert!(after.is_consistent());
            roles.set(after);
            (before, after)
        })
    }
}

/// Foreground handle: exclusive writer of the producer slot
pub struct Producer<'a, M: RawMutex, const N: usize> {
    pool: &'a FramePool<M, N>,
}

impl<'a, M: RawMutex, const N: usize> Producer<'a, M, N> {
    /// Slot currently in the producer role
    pub fn slot(&self) -> usize {
        self.pool.roles().producer as usize
    }

    /// Panel geometry of the frame
    pub fn geometry(&self) -> &Geometry {
        &self.pool.geometry
    }

    /// Current producer frame
    pub fn frame(&self) -> &[u8] {
        let slot = &self.pool.slots[self.slot()];
        // SAFETY: the producer slot is never written by the consumer side
        // and never adopted for transfer while it holds the producer role.
        unsafe { &*slot.bytes.get() }
    }

    /// Current producer frame, writable
    ///
    /// Byte 0 is overwritten with the polarity command when the frame is
    /// transmitted.
    pub fn frame_mut(&mut self) -> &mut [u8] {
        let slot = &self.pool.slots[self.slot()];
        // SAFETY: as for `frame`, and `&mut self` rules out any other
        // borrow obtained through this handle.
        unsafe { &mut *slot.bytes.get() }
    }

    /// Queue the producer frame for transmission and start the next one
    ///
    /// The new producer frame starts as a copy of the published one.
    /// Returns the role table after the rotation.
    pub fn publish(&mut self) -> RoleTable {
        let (_, roles) = self.pool.update(RoleTable::publish);

        let src = &self.pool.slots[roles.pending as usize];
        let dst = &self.pool.slots[roles.producer as usize];

        // The published slot may be adopted and stamped by the consumer
        // while it is being copied, so it is read as two parts: the
        // command byte atomically, the rest through a shared slice.
        let command = src.command_byte().load(Ordering::Relaxed);

        // SAFETY: nobody writes bytes 1.. of the pending slot; the
        // consumer side only stamps byte 0 and frames are only written
        // through this handle. The new producer slot is neither consumer
        // nor pending.
        let (body, frame) = unsafe {
            (
                core::slice::from_raw_parts(src.ptr().add(1), N - 1),
                &mut *dst.bytes.get(),
            )
        };
        frame[0] = command;
        frame[1..].copy_from_slice(body);

        roles
    }
}

/// Interrupt-side handle: reader of the consumer slot
pub struct Consumer<'a, M: RawMutex, const N: usize> {
    pool: &'a FramePool<M, N>,
    slot: u8,
}

impl<'a, M: RawMutex, const N: usize> Consumer<'a, M, N> {
    /// Slot currently in the consumer role
    pub fn slot(&self) -> usize {
        self.slot as usize
    }

    /// Take over the pending slot as the transfer source
    ///
    /// Returns `true` when a newly published frame was picked up.
    pub fn adopt(&mut self) -> bool {
        let (before, after) = self.pool.update(RoleTable::adopt);
        self.slot = after.consumer;
        before.has_pending()
    }

    /// Write the polarity command into byte 0 of the consumer frame
    pub fn stamp(&mut self, command: u8) {
        self.pool.slots[self.slot()]
            .command_byte()
            .store(command, Ordering::Relaxed);
    }

    /// Consumer frame, ready for transmission
    pub fn frame(&self) -> &[u8] {
        let slot = &self.pool.slots[self.slot()];
        // SAFETY: the consumer slot is never written by the producer, and
        // the only write on this side (`stamp`) needs `&mut self`.
        unsafe { &*slot.bytes.get() }
    }
}
