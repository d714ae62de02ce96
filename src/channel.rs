//! Transmit channel abstraction.
//!
//! The pulse peripheral is reached through two traits:
//! - [`TxChannelProvider`] allocates and releases channels bound to a pin.
//! - [`TxChannel`] enables a channel, runs one encoder over an input, waits for
//!   the line to go idle and disables it again.
//!
//! A channel hands its memory block to the encoder once per chunk until the
//! encoder reports completion. [`drive_encoder`] implements that refill loop in
//! software for backends that stream symbols themselves.

use crate::encoder::Encoder;
use crate::error::StripError;
use crate::symbol::{Symbol, SymbolBuffer};
use crate::timing::{DEFAULT_RESOLUTION_HZ, resolve_resolution};
use heapless::Vec;

/// Pin number of the data line.
pub type GpioNum = u8;

/// Memory block size when none is configured.
#[cfg(any(feature = "esp32", feature = "esp32s2"))]
pub const DEFAULT_MEM_BLOCK_SYMBOLS: usize = 64;
/// Memory block size when none is configured.
#[cfg(not(any(feature = "esp32", feature = "esp32s2")))]
pub const DEFAULT_MEM_BLOCK_SYMBOLS: usize = 48;

/// Transmit queue depth when none is configured.
pub const DEFAULT_TRANS_QUEUE_DEPTH: usize = 4;

/// Clock feeding the channel's tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Whatever the platform picks.
    #[default]
    Default,
    /// APB bus clock.
    Apb,
    /// Crystal oscillator.
    Xtal,
    /// Internal fast RC oscillator.
    RcFast,
}

/// Configuration of one transmit channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxChannelConfig {
    /// Data pin.
    pub gpio: GpioNum,
    /// Tick clock source.
    pub clock_source: ClockSource,
    /// Tick resolution in Hz; zero selects the default.
    pub resolution_hz: u32,
    /// Symbols the channel holds at once; zero selects the default.
    pub mem_block_symbols: usize,
    /// Pending transactions the driver may queue; zero selects the default.
    pub trans_queue_depth: usize,
    /// Feed the channel through DMA.
    pub with_dma: bool,
    /// Invert the output signal.
    pub invert_out: bool,
}

impl TxChannelConfig {
    /// Default configuration for `gpio`.
    pub const fn new(gpio: GpioNum) -> Self {
        Self {
            gpio,
            clock_source: ClockSource::Default,
            resolution_hz: DEFAULT_RESOLUTION_HZ,
            mem_block_symbols: DEFAULT_MEM_BLOCK_SYMBOLS,
            trans_queue_depth: DEFAULT_TRANS_QUEUE_DEPTH,
            with_dma: false,
            invert_out: false,
        }
    }

    /// Sets the tick clock source.
    pub fn with_clock_source(mut self, clock_source: ClockSource) -> Self {
        self.clock_source = clock_source;
        self
    }

    /// Sets the tick resolution.
    pub fn with_resolution_hz(mut self, resolution_hz: u32) -> Self {
        self.resolution_hz = resolution_hz;
        self
    }

    /// Sets the memory block size.
    pub fn with_mem_block_symbols(mut self, mem_block_symbols: usize) -> Self {
        self.mem_block_symbols = mem_block_symbols;
        self
    }

    /// Sets the transmit queue depth.
    pub fn with_trans_queue_depth(mut self, trans_queue_depth: usize) -> Self {
        self.trans_queue_depth = trans_queue_depth;
        self
    }

    /// Enables or disables DMA.
    pub fn with_dma(mut self, with_dma: bool) -> Self {
        self.with_dma = with_dma;
        self
    }

    /// Enables or disables output inversion.
    pub fn with_invert_out(mut self, invert_out: bool) -> Self {
        self.invert_out = invert_out;
        self
    }

    /// Resolution with the zero fallback applied.
    pub fn effective_resolution_hz(&self) -> u32 {
        resolve_resolution(self.resolution_hz)
    }

    /// Memory block size with the zero fallback applied.
    pub fn effective_mem_block_symbols(&self) -> usize {
        if self.mem_block_symbols == 0 {
            DEFAULT_MEM_BLOCK_SYMBOLS
        } else {
            self.mem_block_symbols
        }
    }

    /// Queue depth with the zero fallback applied.
    pub fn effective_trans_queue_depth(&self) -> usize {
        if self.trans_queue_depth == 0 {
            DEFAULT_TRANS_QUEUE_DEPTH
        } else {
            self.trans_queue_depth
        }
    }
}

/// Per-transmission options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransmitConfig {
    /// Hardware repeat count; 0 sends the frame once.
    pub loop_count: u32,
}

/// How long to wait for a channel to go idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Block until done.
    #[default]
    Forever,
    /// Give up after this many milliseconds.
    Millis(u32),
}

/// A transmit channel of the pulse peripheral.
///
/// Implementations return `HardwareBusy` from `transmit` while a previous
/// transmission is still in flight, and `Timeout` from `wait_all_done` when the
/// deadline passes. A timeout leaves the channel enabled.
pub trait TxChannel {
    /// Powers up the channel.
    fn enable(&mut self) -> Result<(), StripError>;

    /// Starts sending `input` through `encoder`.
    ///
    /// The channel calls `encoder.encode` once per memory block until the
    /// encoder reports completion.
    fn transmit<E: Encoder>(
        &mut self,
        encoder: &mut E,
        input: &[E::Item],
        config: &TransmitConfig,
    ) -> Result<(), StripError>;

    /// Blocks until every queued transmission has left the pin.
    fn wait_all_done(&mut self, timeout: Timeout) -> Result<(), StripError>;

    /// Powers down the channel.
    fn disable(&mut self) -> Result<(), StripError>;
}

/// Allocates transmit channels.
pub trait TxChannelProvider {
    /// Channel type handed out.
    type Channel: TxChannel;

    /// Binds a new channel to `config.gpio`.
    ///
    /// Fails with `InvalidArgument` if the pin is already bound.
    fn new_tx_channel(&mut self, config: &TxChannelConfig) -> Result<Self::Channel, StripError>;

    /// Releases a channel and its pin.
    fn delete_tx_channel(&mut self, channel: Self::Channel) -> Result<(), StripError>;
}

/// Tracks which pins are bound to a channel, up to `N` at once.
#[derive(Debug, Clone, Default)]
pub struct PinRegistry<const N: usize> {
    bound: Vec<GpioNum, N>,
}

impl<const N: usize> PinRegistry<N> {
    /// Creates an empty registry.
    pub const fn new() -> Self {
        Self { bound: Vec::new() }
    }

    /// Marks `gpio` as bound.
    ///
    /// # Errors
    /// * `InvalidArgument` - the pin is already bound
    /// * `OutOfMemory` - all `N` slots are in use
    pub fn claim(&mut self, gpio: GpioNum) -> Result<(), StripError> {
        if self.is_bound(gpio) {
            return Err(StripError::InvalidArgument("gpio already bound to a channel"));
        }
        self.bound.push(gpio).map_err(|_| StripError::OutOfMemory {
            requested: N + 1,
            capacity: N,
        })
    }

    /// Frees `gpio`. Returns false if it was not bound.
    pub fn release(&mut self, gpio: GpioNum) -> bool {
        match self.bound.iter().position(|&pin| pin == gpio) {
            Some(slot) => {
                self.bound.swap_remove(slot);
                true
            }
            None => false,
        }
    }

    /// True if `gpio` is bound.
    pub fn is_bound(&self, gpio: GpioNum) -> bool {
        self.bound.contains(&gpio)
    }

    /// Number of bound pins.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// True if no pin is bound.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

/// Totals of one [`drive_encoder`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// Symbols produced.
    pub symbols: usize,
    /// Encode calls made, one per memory block.
    pub chunks: usize,
}

/// Runs `encoder` over `input` one memory block at a time.
///
/// Each chunk gets the whole of `block` as free space; whatever the encoder
/// writes is passed to `sink` before the next chunk. Stops when the encoder
/// reports completion.
///
/// # Errors
/// * `InvalidArgument` - `block` is empty, or a chunk produced nothing without completing
/// * any error returned by `sink`
pub fn drive_encoder<E, F>(
    encoder: &mut E,
    input: &[E::Item],
    block: &mut [Symbol],
    mut sink: F,
) -> Result<FrameStats, StripError>
where
    E: Encoder + ?Sized,
    F: FnMut(&[Symbol]) -> Result<(), StripError>,
{
    if block.is_empty() {
        return Err(StripError::InvalidArgument("memory block holds no symbols"));
    }

    let mut stats = FrameStats::default();
    loop {
        let mut buffer = SymbolBuffer::new(&mut *block);
        let encoded = encoder.encode(input, &mut buffer);
        stats.chunks += 1;
        stats.symbols += encoded.symbols;
        sink(buffer.written())?;

        if encoded.state.is_complete() {
            return Ok(stats);
        }
        if encoded.symbols == 0 {
            return Err(StripError::InvalidArgument("encoder made no progress"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::CopyEncoder;
    use crate::symbol::Level;

    #[test]
    fn zero_config_values_fall_back_to_defaults() {
        let config = TxChannelConfig::new(4)
            .with_resolution_hz(0)
            .with_mem_block_symbols(0)
            .with_trans_queue_depth(0);
        assert_eq!(config.effective_resolution_hz(), DEFAULT_RESOLUTION_HZ);
        assert_eq!(config.effective_mem_block_symbols(), DEFAULT_MEM_BLOCK_SYMBOLS);
        assert_eq!(config.effective_trans_queue_depth(), DEFAULT_TRANS_QUEUE_DEPTH);
    }

    #[test]
    fn registry_binds_each_pin_once() {
        let mut registry = PinRegistry::<2>::new();
        assert!(registry.claim(5).is_ok());
        assert!(matches!(registry.claim(5), Err(StripError::InvalidArgument(_))));
        assert!(registry.claim(6).is_ok());
        assert!(matches!(registry.claim(7), Err(StripError::OutOfMemory { .. })));

        assert!(registry.release(5));
        assert!(!registry.release(5));
        assert!(registry.claim(5).is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn drive_encoder_counts_chunks() {
        let input = [Symbol::new(Level::High, 1, Level::Low, 1); 7];
        let mut encoder = CopyEncoder::new();
        let mut block = [Symbol::default(); 3];
        let mut seen = 0;

        let stats = drive_encoder(&mut encoder, &input, &mut block, |chunk| {
            seen += chunk.len();
            Ok(())
        })
        .unwrap();

        assert_eq!(stats, FrameStats { symbols: 7, chunks: 3 });
        assert_eq!(seen, 7);
    }

    #[test]
    fn drive_encoder_rejects_empty_block() {
        let mut encoder = CopyEncoder::new();
        let mut block: [Symbol; 0] = [];
        let result = drive_encoder(&mut encoder, &[Symbol::default()], &mut block, |_| Ok(()));
        assert!(matches!(result, Err(StripError::InvalidArgument(_))));
    }

    #[test]
    fn drive_encoder_stops_on_sink_error() {
        let input = [Symbol::default(); 10];
        let mut encoder = CopyEncoder::new();
        let mut block = [Symbol::default(); 4];

        let result = drive_encoder(&mut encoder, &input, &mut block, |_| {
            Err(StripError::HardwareBusy)
        });
        assert_eq!(result, Err(StripError::HardwareBusy));
    }
}
