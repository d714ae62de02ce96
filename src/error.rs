//! Error taxonomy shared by every strip operation.

/// The channel stage that reported a driver failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelOp {
    /// Channel allocation.
    Create,
    /// Enabling the channel.
    Enable,
    /// Submitting a transmission.
    Transmit,
    /// Waiting for the transmission to drain.
    Wait,
    /// Disabling the channel.
    Disable,
    /// Releasing the channel.
    Delete,
}

impl core::fmt::Display for ChannelOp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ChannelOp::Create => "create",
            ChannelOp::Enable => "enable",
            ChannelOp::Transmit => "transmit",
            ChannelOp::Wait => "wait",
            ChannelOp::Disable => "disable",
            ChannelOp::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while creating or driving an LED strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripError {
    /// The pixel buffer (or another fixed-capacity store) cannot hold the request.
    OutOfMemory {
        /// Bytes or slots that were asked for.
        requested: usize,
        /// Bytes or slots available.
        capacity: usize,
    },

    /// A parameter is invalid: bad pin, pin already bound, zero LEDs, bad timing.
    InvalidArgument(&'static str),

    /// A pixel index at or beyond the strip length.
    IndexOutOfRange {
        /// The rejected index.
        index: u16,
        /// Number of LEDs on the strip.
        num_leds: u16,
    },

    /// The channel is already transmitting.
    HardwareBusy,

    /// Waiting for the channel to go idle exceeded the deadline.
    Timeout,

    /// The underlying peripheral driver failed.
    Device {
        /// Stage that failed.
        op: ChannelOp,
        /// Raw driver error code.
        code: i32,
    },
}

impl StripError {
    /// Shorthand for a driver failure during `op`.
    pub const fn device(op: ChannelOp, code: i32) -> Self {
        StripError::Device { op, code }
    }
}

impl core::fmt::Display for StripError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StripError::OutOfMemory {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "out of memory: {} requested, {} available",
                    requested, capacity
                )
            }
            StripError::InvalidArgument(reason) => {
                write!(f, "invalid argument: {}", reason)
            }
            StripError::IndexOutOfRange { index, num_leds } => {
                write!(
                    f,
                    "pixel index {} out of range for a strip of {} LEDs",
                    index, num_leds
                )
            }
            StripError::HardwareBusy => write!(f, "channel is already transmitting"),
            StripError::Timeout => write!(f, "timed out waiting for the channel to go idle"),
            StripError::Device { op, code } => {
                write!(f, "channel {} failed with driver code {:#x}", op, code)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StripError {}
