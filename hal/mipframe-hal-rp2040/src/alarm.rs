//! TIMER alarm used as the settle delay
//!
//! The embassy time driver runs on ALARM0 / TIMER_IRQ_0; this alarm uses
//! ALARM1 / TIMER_IRQ_1. embassy-rp has no owned handle for a single
//! alarm, so ownership is a process-wide flag.

use embassy_rp::pac;
use mipframe_hal::OneShotAlarm;
use portable_atomic::{AtomicBool, Ordering};

const ALARM: usize = 1;

static TAKEN: AtomicBool = AtomicBool::new(false);

/// One-shot microsecond alarm on TIMER ALARM1
pub struct TimerAlarm {
    _private: (),
}

impl TimerAlarm {
    /// Take the alarm, clearing any stale expiry and enabling its interrupt
    ///
    /// `None` once it has been taken.
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            return None;
        }
        pac::TIMER.intr().write(|w| w.set_alarm(ALARM, true));
        pac::TIMER.inte().modify(|w| w.set_alarm(ALARM, true));
        Some(Self { _private: () })
    }

    /// Whether the alarm can still be taken
    pub fn is_available() -> bool {
        !TAKEN.load(Ordering::Acquire)
    }
}

impl OneShotAlarm for TimerAlarm {
    fn arm(&mut self, after_us: u32) {
        // The alarm compares against the low 32 bits of the counter, which
        // wraps every ~71 minutes
        let now = pac::TIMER.timerawl().read();
        pac::TIMER
            .alarm(ALARM)
            .write_value(now.wrapping_add(after_us.max(1)));
    }

    fn acknowledge(&mut self) {
        pac::TIMER.intr().write(|w| w.set_alarm(ALARM, true));
    }
}
