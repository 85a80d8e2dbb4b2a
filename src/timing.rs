use crate::Error;

/// Recommended interval between two calls to `Registry::tick`, in milliseconds.
pub const TICKS_INTERVAL_MS: u16 = 5;
/// Consecutive differing samples needed before a new level is accepted.
pub const DEBOUNCE_TICKS: u8 = 3;
/// Largest debounce threshold supported, the filter counter has 3 bits worth of range.
pub const MAX_DEBOUNCE_TICKS: u8 = 7;
/// Release timeout that closes a click sequence.
pub const SHORT_PRESS_MS: u16 = 300;
/// Hold time after which a press becomes a long press.
pub const LONG_PRESS_MS: u16 = 1000;

/// Tick counts used by the state machine.
///
/// All the thresholds are expressed in ticks, so they only mean something for the tick interval
/// they were computed with. When the interval changes the `Timing` must be built again.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    debounce_ticks: u8,
    short_ticks: u16,
    long_ticks: u16,
}

impl Timing {
    /// Builds the thresholds from wall-clock durations.
    ///
    /// # Arguments
    ///
    /// * `tick_ms` - Interval at which `Registry::tick` is going to be called
    /// * `debounce_ticks` - Consecutive samples needed to accept a level change, `1..=7`
    /// * `short_ms` - Release timeout closing a click sequence, also the longest hold that still
    /// counts as a repeated press
    /// * `long_ms` - Hold time for a long press, must be longer than `short_ms`
    ///
    /// Durations are divided by `tick_ms` with integer division, e.g. `300 / 5 = 60` ticks.
    pub const fn from_millis(
        tick_ms: u16,
        debounce_ticks: u8,
        short_ms: u16,
        long_ms: u16,
    ) -> Result<Timing, Error> {
        if tick_ms == 0 {
            return Err(Error::InvalidTiming);
        }
        Timing::from_ticks(debounce_ticks, short_ms / tick_ms, long_ms / tick_ms)
    }

    /// Builds the thresholds from raw tick counts.
    pub const fn from_ticks(
        debounce_ticks: u8,
        short_ticks: u16,
        long_ticks: u16,
    ) -> Result<Timing, Error> {
        if debounce_ticks == 0 || debounce_ticks > MAX_DEBOUNCE_TICKS {
            return Err(Error::InvalidTiming);
        }
        if short_ticks == 0 || long_ticks <= short_ticks {
            return Err(Error::InvalidTiming);
        }
        Ok(Timing {
            debounce_ticks,
            short_ticks,
            long_ticks,
        })
    }

    pub const fn debounce_ticks(&self) -> u8 {
        self.debounce_ticks
    }

    pub const fn short_ticks(&self) -> u16 {
        self.short_ticks
    }

    pub const fn long_ticks(&self) -> u16 {
        self.long_ticks
    }
}

impl Default for Timing {
    /// 5ms ticks, 3 debounce samples, 60 ticks release timeout and 200 ticks long press.
    fn default() -> Self {
        Timing {
            debounce_ticks: DEBOUNCE_TICKS,
            short_ticks: SHORT_PRESS_MS / TICKS_INTERVAL_MS,
            long_ticks: LONG_PRESS_MS / TICKS_INTERVAL_MS,
        }
    }
}
