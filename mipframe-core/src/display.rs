//! Foreground display API
//!
//! `init` once, then any number of `blit` calls followed by `publish`.
//! Published frames are picked up by the scheduler at its next cycle
//! boundary; until then the previous frame keeps being refreshed.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::blit::{self, Region, Tile};
use crate::config::{Geometry, Timing};
use crate::error::DisplayError;
use crate::frame::{FramePool, Producer, RoleTable};
use crate::scheduler::{RefreshSlot, Scheduler};
use crate::traits::{Bus, BusParams};

/// Scheduler type produced by `init` for a given bus
pub type SchedulerFor<'a, M, const N: usize, B> =
    Scheduler<'a, M, N, <B as Bus>::Select, <B as Bus>::Transfer, <B as Bus>::Alarm>;

/// Foreground handle to one panel
///
/// Several handles may point at the same pool, but only the one whose
/// `init` brought the bus up owns the producer side and can draw.
pub struct Display<'a, M: RawMutex, const N: usize> {
    pool: &'a FramePool<M, N>,
    timing: Timing,
    producer: Option<Producer<'a, M, N>>,
}

impl<'a, M: RawMutex, const N: usize> Display<'a, M, N> {
    pub fn new(pool: &'a FramePool<M, N>, timing: Timing) -> Self {
        Self {
            pool,
            timing,
            producer: None,
        }
    }

    /// Whether this handle owns the producer side of a running display
    pub fn is_initialized(&self) -> bool {
        self.producer.is_some()
    }

    pub fn geometry(&self) -> &Geometry {
        self.pool.geometry()
    }

    /// Snapshot of the buffer roles
    pub fn roles(&self) -> RoleTable {
        self.pool.roles()
    }

    /// Bring up the bus, seed the frames and start refreshing
    ///
    /// The initialized state belongs to `slot`, not to this handle. Once
    /// any handle has brought the display up, calling again with the same
    /// parameters is a no-op and different parameters fail with
    /// `Reinitialization`. On any other error nothing is claimed and the
    /// display stays uninitialized.
    pub fn init<B, SM>(
        &mut self,
        params: BusParams,
        bus: &mut B,
        slot: &RefreshSlot<SM, SchedulerFor<'a, M, N, B>>,
    ) -> Result<(), DisplayError>
    where
        B: Bus,
        SM: RawMutex,
    {
        if let Some(running) = slot.params() {
            return if running == params {
                Ok(())
            } else {
                Err(DisplayError::Reinitialization)
            };
        }

        bus.validate(&params)?;

        let pool = self.pool;
        let timing = self.timing;
        let producer = slot.start_with(params, DisplayError::ResourceExhausted, || {
            // A pool split outside this slot cannot be used for refresh
            if pool.is_split() {
                return Err(DisplayError::ResourceExhausted);
            }
            let hardware = bus.claim(&params, &timing.spi_config())?;
            let (producer, consumer) = pool.split().ok_or(DisplayError::ResourceExhausted)?;
            Ok((Scheduler::new(consumer, hardware, &timing), producer))
        });

        match producer {
            Ok(producer) => {
                self.producer = Some(producer);
                Ok(())
            }
            // Another handle installed its engine between the checks
            Err(DisplayError::ResourceExhausted) => match slot.params() {
                Some(running) if running == params => Ok(()),
                Some(_) => Err(DisplayError::Reinitialization),
                None => Err(DisplayError::ResourceExhausted),
            },
            Err(e) => Err(e),
        }
    }

    /// Write a tile into the producer frame, repeating it over `region`
    pub fn blit(
        &mut self,
        tile: &[u8],
        tile_width: u16,
        tile_height: u16,
        region: Region,
    ) -> Result<(), DisplayError> {
        let producer = self.producer.as_mut().ok_or(DisplayError::NotInitialized)?;
        let geometry = *producer.geometry();

        region.check(&geometry)?;
        let tile = Tile::new(tile, tile_width, tile_height)?;

        blit::blit(producer.frame_mut(), &geometry, &tile, &region)
    }

    /// Hand the producer frame to the scheduler
    ///
    /// The next producer frame starts as a copy of the published one.
    pub fn publish(&mut self) -> Result<(), DisplayError> {
        let producer = self.producer.as_mut().ok_or(DisplayError::NotInitialized)?;
        producer.publish();
        Ok(())
    }

    /// Producer frame as it would be transmitted (byte 0 aside)
    pub fn frame(&self) -> Result<&[u8], DisplayError> {
        let producer = self.producer.as_ref().ok_or(DisplayError::NotInitialized)?;
        Ok(producer.frame())
    }

    /// Raw producer frame for callers that pack whole rows themselves
    pub fn frame_mut(&mut self) -> Result<&mut [u8], DisplayError> {
        let producer = self.producer.as_mut().ok_or(DisplayError::NotInitialized)?;
        Ok(producer.frame_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FRAME_LEN;
    use crate::frame::layout;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use mipframe_hal::{FrameTransfer, OneShotAlarm, OutputPin, SpiConfig};

    use crate::traits::Hardware;

    struct MockPin;

    impl OutputPin for MockPin {
        fn set_high(&mut self) {}
        fn set_low(&mut self) {}
        fn is_set_high(&self) -> bool {
            false
        }
    }

    struct MockTransfer;

    impl FrameTransfer for MockTransfer {
        fn start(&mut self, _frame: &[u8]) {}
        fn acknowledge(&mut self) {}
        fn is_busy(&self) -> bool {
            false
        }
    }

    struct MockAlarm;

    impl OneShotAlarm for MockAlarm {
        fn arm(&mut self, _after_us: u32) {}
    }

    /// Two buses, a configurable number of DMA channels
    struct MockBus {
        channels: u8,
        claims: u8,
    }

    impl MockBus {
        fn new(channels: u8) -> Self {
            Self { channels, claims: 0 }
        }
    }

    impl Bus for MockBus {
        type Select = MockPin;
        type Transfer = MockTransfer;
        type Alarm = MockAlarm;

        fn supports(&self, bus_id: u8) -> bool {
            bus_id < 2
        }

        fn claim(
            &mut self,
            _params: &BusParams,
            _spi: &SpiConfig,
        ) -> Result<Hardware<MockPin, MockTransfer, MockAlarm>, DisplayError> {
            if self.channels == 0 {
                return Err(DisplayError::ResourceExhausted);
            }
            self.channels -= 1;
            self.claims += 1;
            Ok(Hardware {
                select: MockPin,
                transfer: MockTransfer,
                alarm: MockAlarm,
            })
        }
    }

    type Pool = FramePool<NoopRawMutex, FRAME_LEN>;
    type Slot<'a> = RefreshSlot<NoopRawMutex, SchedulerFor<'a, NoopRawMutex, FRAME_LEN, MockBus>>;

    const PARAMS: BusParams = BusParams::new(0, 2, 3, 5);

    #[test]
    fn test_operations_before_init() {
        let pool = Pool::new(Geometry::REFERENCE);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        assert!(!display.is_initialized());
        assert_eq!(display.publish(), Err(DisplayError::NotInitialized));
        assert_eq!(
            display.blit(&[0; 8], 1, 1, Region::new(0, 0, 1, 1)),
            Err(DisplayError::NotInitialized)
        );
        assert_eq!(display.frame().err(), Some(DisplayError::NotInitialized));
    }

    #[test]
    fn test_init_starts_refresh() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(1);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        display.init(PARAMS, &mut bus, &slot).unwrap();
        assert!(display.is_initialized());
        assert_eq!(slot.params(), Some(PARAMS));
        assert!(slot.is_installed());
        assert_eq!(slot.with(|s| s.stats().cycles), Some(1));
        assert_eq!(display.roles(), RoleTable::INITIAL);
    }

    #[test]
    fn test_reinit_same_params_is_noop() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(2);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        display.init(PARAMS, &mut bus, &slot).unwrap();
        display.init(PARAMS, &mut bus, &slot).unwrap();
        assert_eq!(bus.claims, 1);
    }

    #[test]
    fn test_reinit_different_params() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(2);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        display.init(PARAMS, &mut bus, &slot).unwrap();
        let other = BusParams::new(1, 10, 11, 9);
        assert_eq!(
            display.init(other, &mut bus, &slot),
            Err(DisplayError::Reinitialization)
        );
        assert_eq!(slot.params(), Some(PARAMS));
    }

    #[test]
    fn test_invalid_bus() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(1);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        let bad = BusParams::new(2, 2, 3, 5);
        assert_eq!(display.init(bad, &mut bus, &slot), Err(DisplayError::InvalidConfig));
        assert!(!display.is_initialized());
        assert!(!pool.is_split());
        assert_eq!(bus.claims, 0);

        // A failed init does not block a later good one
        display.init(PARAMS, &mut bus, &slot).unwrap();
    }

    #[test]
    fn test_shared_pins_rejected() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(1);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        let bad = BusParams::new(0, 3, 3, 5);
        assert_eq!(display.init(bad, &mut bus, &slot), Err(DisplayError::InvalidConfig));
    }

    #[test]
    fn test_no_dma_channel() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(0);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        assert_eq!(
            display.init(PARAMS, &mut bus, &slot),
            Err(DisplayError::ResourceExhausted)
        );
        assert!(!pool.is_split());
        assert!(!slot.is_installed());
    }

    #[test]
    fn test_second_handle_sees_running_display() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(2);
        let mut first = Display::new(&pool, Timing::REFERENCE);
        let mut second = Display::new(&pool, Timing::REFERENCE);

        first.init(PARAMS, &mut bus, &slot).unwrap();

        // Same parameters: nothing to do, and nothing claimed again
        assert_eq!(second.init(PARAMS, &mut bus, &slot), Ok(()));
        assert_eq!(bus.claims, 1);

        let other = BusParams::new(1, 10, 11, 9);
        assert_eq!(
            second.init(other, &mut bus, &slot),
            Err(DisplayError::Reinitialization)
        );

        // Drawing stays with the handle that brought the bus up
        assert!(first.is_initialized());
        assert!(!second.is_initialized());
        assert_eq!(second.publish(), Err(DisplayError::NotInitialized));
        assert_eq!(first.publish(), Ok(()));
    }

    #[test]
    fn test_split_pool_claims_nothing() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(1);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        let _handles = pool.split().unwrap();
        assert_eq!(
            display.init(PARAMS, &mut bus, &slot),
            Err(DisplayError::ResourceExhausted)
        );
        assert_eq!(bus.claims, 0);
        assert!(!slot.is_installed());
    }

    #[test]
    fn test_failed_claim_can_be_retried() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(0);
        let mut display = Display::new(&pool, Timing::REFERENCE);

        assert_eq!(
            display.init(PARAMS, &mut bus, &slot),
            Err(DisplayError::ResourceExhausted)
        );

        bus.channels = 1;
        display.init(PARAMS, &mut bus, &slot).unwrap();
        assert!(display.is_initialized());
        assert_eq!(slot.params(), Some(PARAMS));
    }

    #[test]
    fn test_blit_validation_order() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(1);
        let mut display = Display::new(&pool, Timing::REFERENCE);
        display.init(PARAMS, &mut bus, &slot).unwrap();

        // Bounds are checked before the buffer length
        assert_eq!(
            display.blit(&[0; 3], 1, 1, Region::new(49, 0, 2, 1)),
            Err(DisplayError::OutOfBounds)
        );
        assert_eq!(
            display.blit(&[0; 3], 1, 1, Region::new(0, 0, 1, 1)),
            Err(DisplayError::InvalidBuffer)
        );
        assert_eq!(
            display.blit(&[0; 8], 0, 1, Region::new(0, 0, 1, 1)),
            Err(DisplayError::OutOfBounds)
        );
    }

    #[test]
    fn test_blit_and_publish() {
        let pool = Pool::new(Geometry::REFERENCE);
        let slot = Slot::new();
        let mut bus = MockBus::new(1);
        let mut display = Display::new(&pool, Timing::REFERENCE);
        display.init(PARAMS, &mut bus, &slot).unwrap();

        display.blit(&[0xFF; 8], 1, 1, Region::new(0, 0, 1, 1)).unwrap();
        let g = Geometry::REFERENCE;
        assert_eq!(display.frame().unwrap()[layout::data_offset(&g, 7, 0)], 0xFF);

        display.publish().unwrap();
        let roles = display.roles();
        assert!(roles.has_pending());
        assert!(roles.is_consistent());

        // Copy-on-publish: the new producer frame carries the blit
        assert_eq!(display.frame().unwrap()[layout::data_offset(&g, 7, 0)], 0xFF);
    }
}
