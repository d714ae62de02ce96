//! Shared test infrastructure for gled-strip integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use gled_strip::{
    ChannelOp, Encoder, GpioNum, PinRegistry, StripError, Symbol, Timeout, TransmitConfig,
    TxChannel, TxChannelConfig, TxChannelProvider, drive_encoder,
};

/// Driver code the mock returns for calls made in the wrong channel state.
pub const ERR_INVALID_STATE: i32 = 0x103;

/// Driver code the mock returns for injected failures.
pub const ERR_INJECTED: i32 = -1;

// ============================================================================
// Mock Channel
// ============================================================================

/// Mock transmit channel that records every frame it sends
pub struct MockChannel {
    pub config: TxChannelConfig,
    pub enabled: bool,
    pub in_flight: bool,
    /// Stage that fails with `ERR_INJECTED` on its next call
    pub fail_on: Option<ChannelOp>,
    /// Make `wait_all_done` time out
    pub wait_times_out: bool,
    /// Abort the next transmission after this many memory blocks
    pub abort_after_chunks: Option<usize>,
    /// Every stage called, in order
    pub calls: Vec<ChannelOp>,
    /// Symbols of each completed transmission
    pub frames: Vec<Vec<Symbol>>,
    /// Encode calls per transmission
    pub chunks: Vec<usize>,
}

impl MockChannel {
    pub fn new(config: TxChannelConfig) -> Self {
        Self {
            config,
            enabled: false,
            in_flight: false,
            fail_on: None,
            wait_times_out: false,
            abort_after_chunks: None,
            calls: Vec::new(),
            frames: Vec::new(),
            chunks: Vec::new(),
        }
    }

    pub fn refresh_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_frame(&self) -> &[Symbol] {
        self.frames.last().map(Vec::as_slice).unwrap_or(&[])
    }

    fn check(&mut self, op: ChannelOp) -> Result<(), StripError> {
        self.calls.push(op);
        if self.fail_on == Some(op) {
            self.fail_on = None;
            return Err(StripError::device(op, ERR_INJECTED));
        }
        Ok(())
    }
}

impl TxChannel for MockChannel {
    fn enable(&mut self) -> Result<(), StripError> {
        self.check(ChannelOp::Enable)?;
        if self.enabled {
            return Err(StripError::device(ChannelOp::Enable, ERR_INVALID_STATE));
        }
        self.enabled = true;
        Ok(())
    }

    fn transmit<E: Encoder>(
        &mut self,
        encoder: &mut E,
        input: &[E::Item],
        config: &TransmitConfig,
    ) -> Result<(), StripError> {
        self.check(ChannelOp::Transmit)?;
        if !self.enabled {
            return Err(StripError::device(ChannelOp::Transmit, ERR_INVALID_STATE));
        }
        if self.in_flight {
            return Err(StripError::HardwareBusy);
        }
        if config.loop_count != 0 {
            return Err(StripError::InvalidArgument("loop transmission not supported"));
        }

        let mut block = vec![Symbol::default(); self.config.effective_mem_block_symbols()];
        let mut frame = Vec::new();
        let mut budget = self.abort_after_chunks.take();
        let stats = drive_encoder(encoder, input, &mut block, |chunk| {
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(StripError::device(ChannelOp::Transmit, ERR_INJECTED));
                }
                *remaining -= 1;
            }
            frame.extend_from_slice(chunk);
            Ok(())
        })?;

        self.frames.push(frame);
        self.chunks.push(stats.chunks);
        self.in_flight = true;
        Ok(())
    }

    fn wait_all_done(&mut self, _timeout: Timeout) -> Result<(), StripError> {
        self.check(ChannelOp::Wait)?;
        if self.wait_times_out {
            return Err(StripError::Timeout);
        }
        self.in_flight = false;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), StripError> {
        self.check(ChannelOp::Disable)?;
        if !self.enabled {
            return Err(StripError::device(ChannelOp::Disable, ERR_INVALID_STATE));
        }
        self.enabled = false;
        self.in_flight = false;
        Ok(())
    }
}

// ============================================================================
// Mock Provider
// ============================================================================

/// Mock peripheral handing out `MockChannel`s, one per pin
pub struct MockProvider {
    pins: PinRegistry<4>,
    /// Make the next `new_tx_channel` fail
    pub fail_create: bool,
    pub deleted: Vec<GpioNum>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            pins: PinRegistry::new(),
            fail_create: false,
            deleted: Vec::new(),
        }
    }

    pub fn is_bound(&self, gpio: GpioNum) -> bool {
        self.pins.is_bound(gpio)
    }
}

impl TxChannelProvider for MockProvider {
    type Channel = MockChannel;

    fn new_tx_channel(&mut self, config: &TxChannelConfig) -> Result<MockChannel, StripError> {
        if self.fail_create {
            return Err(StripError::device(ChannelOp::Create, ERR_INJECTED));
        }
        self.pins.claim(config.gpio)?;
        Ok(MockChannel::new(*config))
    }

    fn delete_tx_channel(&mut self, channel: MockChannel) -> Result<(), StripError> {
        if !self.pins.release(channel.config.gpio) {
            return Err(StripError::device(ChannelOp::Delete, ERR_INVALID_STATE));
        }
        self.deleted.push(channel.config.gpio);
        Ok(())
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Turns a frame back into bytes, MSB first; panics on unexpected symbols.
///
/// The trailing reset symbol is not part of the result.
pub fn decode_frame(frame: &[Symbol], bit0: Symbol, bit1: Symbol, reset: Symbol) -> Vec<u8> {
    let (last, bits) = frame.split_last().expect("frame is empty");
    assert_eq!(*last, reset, "frame must end with the reset symbol");
    assert_eq!(bits.len() % 8, 0, "frame carries a partial byte");

    bits.chunks(8)
        .map(|byte| {
            byte.iter().fold(0u8, |acc, symbol| {
                let bit = if *symbol == bit1 {
                    1
                } else if *symbol == bit0 {
                    0
                } else {
                    panic!("unexpected symbol {:?}", symbol)
                };
                (acc << 1) | bit
            })
        })
        .collect()
}
