//! Protocol timing and its conversion to channel ticks.

use crate::error::StripError;
use crate::symbol::{Level, Symbol};

/// Channel resolution used when none (or zero) is configured: 10 MHz, 0.1µs per tick.
pub const DEFAULT_RESOLUTION_HZ: u32 = 10_000_000;

/// Length of the inter-frame reset gap in microseconds.
pub const DEFAULT_RESET_US: u32 = 50;

/// Substitutes the default resolution for zero.
#[inline]
pub const fn resolve_resolution(resolution_hz: u32) -> u32 {
    if resolution_hz == 0 {
        DEFAULT_RESOLUTION_HZ
    } else {
        resolution_hz
    }
}

/// Converts nanoseconds to ticks, rounding to nearest.
///
/// # Errors
/// `InvalidArgument` if the result is zero ticks or does not fit in a symbol half.
pub fn ns_to_ticks(nanos: u32, resolution_hz: u32) -> Result<u16, StripError> {
    let ticks = (u64::from(nanos) * u64::from(resolution_hz) + 500_000_000) / 1_000_000_000;
    if ticks == 0 {
        return Err(StripError::InvalidArgument(
            "pulse shorter than one tick at this resolution",
        ));
    }
    if ticks > u64::from(Symbol::MAX_DURATION) {
        return Err(StripError::InvalidArgument(
            "pulse longer than a symbol can hold at this resolution",
        ));
    }
    Ok(ticks as u16)
}

/// Pulse widths of a one-wire LED protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedTiming {
    /// High time of a "0" bit, ns.
    pub t0h_ns: u32,
    /// Low time of a "0" bit, ns.
    pub t0l_ns: u32,
    /// High time of a "1" bit, ns.
    pub t1h_ns: u32,
    /// Low time of a "1" bit, ns.
    pub t1l_ns: u32,
    /// Reset gap, µs.
    pub reset_us: u32,
}

impl LedTiming {
    /// WS2812 datasheet timing (±150ns tolerance).
    pub const WS2812: LedTiming = LedTiming {
        t0h_ns: 300,
        t0l_ns: 900,
        t1h_ns: 900,
        t1l_ns: 300,
        reset_us: DEFAULT_RESET_US,
    };

    /// Symbol for a logical "0" bit.
    pub fn bit0(&self, resolution_hz: u32) -> Result<Symbol, StripError> {
        let resolution_hz = resolve_resolution(resolution_hz);
        Ok(Symbol::new(
            Level::High,
            ns_to_ticks(self.t0h_ns, resolution_hz)?,
            Level::Low,
            ns_to_ticks(self.t0l_ns, resolution_hz)?,
        ))
    }

    /// Symbol for a logical "1" bit.
    pub fn bit1(&self, resolution_hz: u32) -> Result<Symbol, StripError> {
        let resolution_hz = resolve_resolution(resolution_hz);
        Ok(Symbol::new(
            Level::High,
            ns_to_ticks(self.t1h_ns, resolution_hz)?,
            Level::Low,
            ns_to_ticks(self.t1l_ns, resolution_hz)?,
        ))
    }

    /// The reset gap as one all-low symbol split into two equal halves.
    pub fn reset_code(&self, resolution_hz: u32) -> Result<Symbol, StripError> {
        let resolution_hz = resolve_resolution(resolution_hz);
        let total = u64::from(self.reset_us) * u64::from(resolution_hz) / 1_000_000;
        let half = total / 2;
        if half == 0 {
            return Err(StripError::InvalidArgument(
                "reset gap shorter than two ticks at this resolution",
            ));
        }
        if half > u64::from(Symbol::MAX_DURATION) {
            return Err(StripError::InvalidArgument(
                "reset gap longer than a symbol can hold at this resolution",
            ));
        }
        Ok(Symbol::new(Level::Low, half as u16, Level::Low, half as u16))
    }
}

impl Default for LedTiming {
    fn default() -> Self {
        LedTiming::WS2812
    }
}
