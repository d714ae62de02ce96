//! Frame encoder for LED strips: pixel bytes followed by the reset gap.
//!
//! [`StripEncoder`] chains a [`BytesEncoder`] over the pixel buffer and a
//! [`CopyEncoder`] over the reset symbol. A frame usually spans several memory
//! blocks, so the encoder keeps track of which phase it is in between calls.
//! When the pixel phase finishes and the block still has room, the reset phase
//! starts in the same call.

use crate::encoder::{BytesEncoder, CopyEncoder, EncodeState, Encoded, Encoder};
use crate::error::StripError;
use crate::symbol::{Symbol, SymbolBuffer};
use crate::timing::LedTiming;

/// Phase of the frame currently being encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripEncoderState {
    /// Emitting pixel bits.
    #[default]
    SendPixels,
    /// Emitting the trailing reset gap.
    SendReset,
}

/// Encodes a GRB(W) pixel buffer into one reset-terminated frame.
#[derive(Debug, Clone)]
pub struct StripEncoder {
    bytes_encoder: BytesEncoder,
    copy_encoder: CopyEncoder,
    reset_code: Symbol,
    state: StripEncoderState,
}

impl StripEncoder {
    /// Builds the bit and reset symbols for `timing` at `resolution_hz`.
    ///
    /// A resolution of zero selects the 10 MHz default.
    ///
    /// # Errors
    /// `InvalidArgument` if any pulse rounds to zero ticks or overflows a symbol.
    pub fn new(timing: &LedTiming, resolution_hz: u32) -> Result<Self, StripError> {
        let bit0 = timing.bit0(resolution_hz)?;
        let bit1 = timing.bit1(resolution_hz)?;
        let reset_code = timing.reset_code(resolution_hz)?;

        Ok(Self {
            bytes_encoder: BytesEncoder::new(bit0, bit1),
            copy_encoder: CopyEncoder::new(),
            reset_code,
            state: StripEncoderState::SendPixels,
        })
    }

    /// Current phase.
    pub fn state(&self) -> StripEncoderState {
        self.state
    }

    /// Symbol emitted for a "0" bit.
    pub fn bit0(&self) -> Symbol {
        self.bytes_encoder.bit0()
    }

    /// Symbol emitted for a "1" bit.
    pub fn bit1(&self) -> Symbol {
        self.bytes_encoder.bit1()
    }

    /// Symbol emitted at the end of every frame.
    pub fn reset_code(&self) -> Symbol {
        self.reset_code
    }
}

impl Encoder for StripEncoder {
    type Item = u8;

    fn encode(&mut self, pixels: &[u8], buffer: &mut SymbolBuffer<'_>) -> Encoded {
        let mut symbols = 0;

        loop {
            match self.state {
                StripEncoderState::SendPixels => {
                    let session = self.bytes_encoder.encode(pixels, buffer);
                    symbols += session.symbols;
                    if session.state.is_complete() {
                        self.state = StripEncoderState::SendReset;
                    }
                    if session.state.is_mem_full() {
                        #[cfg(feature = "defmt")]
                        defmt::trace!("strip encoder: memory block full while sending pixels");
                        return Encoded {
                            symbols,
                            state: EncodeState::MEM_FULL,
                        };
                    }
                    if !session.state.is_complete() {
                        // Neither flag: nothing more can be done in this call.
                        return Encoded {
                            symbols,
                            state: EncodeState::RESET,
                        };
                    }
                    // Pixels done with room to spare, go straight to the reset gap.
                }
                StripEncoderState::SendReset => {
                    let reset_code = [self.reset_code];
                    let session = self.copy_encoder.encode(&reset_code, buffer);
                    symbols += session.symbols;

                    let mut state = EncodeState::RESET;
                    if session.state.is_complete() {
                        self.state = StripEncoderState::SendPixels;
                        state |= EncodeState::COMPLETE;
                    }
                    if session.state.is_mem_full() {
                        #[cfg(feature = "defmt")]
                        defmt::trace!("strip encoder: memory block full while sending reset");
                        state |= EncodeState::MEM_FULL;
                    }
                    return Encoded { symbols, state };
                }
            }
        }
    }

    fn reset(&mut self) {
        self.bytes_encoder.reset();
        self.copy_encoder.reset();
        self.state = StripEncoderState::SendPixels;
    }
}
