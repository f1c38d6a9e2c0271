//! Buffer role assignment
//!
//! Roles are a permutation of the slot indices `{0, 1, 2}`. Transitions
//! are only ever expressed through [`RoleTable::publish`] and
//! [`RoleTable::adopt`], both of which map a valid table to a valid one.

/// Number of frame slots
pub const SLOTS: usize = 3;

/// Current role of every frame slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RoleTable {
    /// Slot the foreground writes into
    pub producer: u8,
    /// Slot the transfer engine streams
    pub consumer: u8,
    /// Slot owned by nobody
    pub idle: u8,
    /// Slot that becomes `consumer` at the next cycle boundary
    pub pending: u8,
}

impl RoleTable {
    /// Roles at power-on
    pub const INITIAL: Self = Self {
        producer: 1,
        consumer: 0,
        idle: 2,
        pending: 0,
    };

    /// The slot index that is neither `a` nor `b`
    pub const fn remaining(a: u8, b: u8) -> u8 {
        3 - (a + b)
    }

    /// Hand the producer frame over for transmission (foreground)
    ///
    /// The idle slot becomes the new producer; the old producer is queued
    /// as `pending`. The consumer is never touched, so an in-flight
    /// transfer keeps its source.
    pub const fn publish(self) -> Self {
        let producer = self.idle;
        Self {
            producer,
            consumer: self.consumer,
            idle: Self::remaining(producer, self.consumer),
            pending: self.producer,
        }
    }

    /// Switch the transfer source to the pending slot (cycle boundary)
    pub const fn adopt(self) -> Self {
        let consumer = self.pending;
        Self {
            producer: self.producer,
            consumer,
            idle: Self::remaining(self.producer, consumer),
            pending: consumer,
        }
    }

    /// A frame has been published but not yet picked up
    pub const fn has_pending(&self) -> bool {
        self.pending != self.consumer
    }

    /// The three roles cover every slot exactly once
    pub const fn is_permutation(&self) -> bool {
        if self.producer >= 3 || self.consumer >= 3 || self.idle >= 3 {
            return false;
        }
        let mask = (1u8 << self.producer) | (1u8 << self.consumer) | (1u8 << self.idle);
        mask == 0b111
    }

    /// Pending never names the producer, so the foreground cannot be
    /// writing a frame the engine is about to adopt
    pub const fn is_consistent(&self) -> bool {
        self.is_permutation() && self.pending < 3 && self.pending != self.producer
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::INITIAL
    }
}
