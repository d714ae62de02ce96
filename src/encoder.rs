//! Resumable symbol encoders.
//!
//! An [`Encoder`] is called once per memory block. It writes as many symbols as
//! fit, remembers where it stopped, and reports through [`EncodeState`] whether
//! it finished or ran out of room. The next call continues exactly where the
//! previous one left off.
//!
//! Two primitive encoders are provided:
//! - [`BytesEncoder`] maps every bit of a byte stream to one of two symbols.
//! - [`CopyEncoder`] copies pre-built symbols verbatim.

use crate::symbol::{Symbol, SymbolBuffer};

/// Outcome flags of one encode call.
///
/// `COMPLETE` and `MEM_FULL` can both be set when an encoder finishes exactly
/// as the memory block fills up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncodeState(u8);

impl EncodeState {
    /// No flags set.
    pub const RESET: Self = Self(0);
    /// All input has been encoded.
    pub const COMPLETE: Self = Self(1 << 0);
    /// The memory block is full.
    pub const MEM_FULL: Self = Self(1 << 1);

    /// True if `COMPLETE` is set.
    #[inline]
    pub const fn is_complete(self) -> bool {
        self.0 & Self::COMPLETE.0 != 0
    }

    /// True if `MEM_FULL` is set.
    #[inline]
    pub const fn is_mem_full(self) -> bool {
        self.0 & Self::MEM_FULL.0 != 0
    }

    /// True if every flag of `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for EncodeState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for EncodeState {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Result of one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Encoded {
    /// Symbols written into the memory block by this call.
    pub symbols: usize,
    /// Completion and memory flags.
    pub state: EncodeState,
}

/// A resumable producer of symbols.
///
/// The channel calls `encode` with the same `input` until the returned state is
/// complete, handing over a fresh memory block each time.
pub trait Encoder {
    /// Input element type.
    type Item;

    /// Encodes as much of `input` as fits in `buffer`.
    fn encode(&mut self, input: &[Self::Item], buffer: &mut SymbolBuffer<'_>) -> Encoded;

    /// Discards any partial progress so the next call starts from the beginning.
    fn reset(&mut self);
}

/// Maps bytes to symbols, one symbol per bit.
#[derive(Debug, Clone)]
pub struct BytesEncoder {
    bit0: Symbol,
    bit1: Symbol,
    msb_first: bool,
    byte_index: usize,
    bit_index: u8,
}

impl BytesEncoder {
    /// Creates an encoder emitting bits most-significant first.
    pub fn new(bit0: Symbol, bit1: Symbol) -> Self {
        Self {
            bit0,
            bit1,
            msb_first: true,
            byte_index: 0,
            bit_index: 0,
        }
    }

    /// Selects bit order within each byte.
    pub fn with_msb_first(mut self, msb_first: bool) -> Self {
        self.msb_first = msb_first;
        self
    }

    /// Symbol used for a "0" bit.
    pub fn bit0(&self) -> Symbol {
        self.bit0
    }

    /// Symbol used for a "1" bit.
    pub fn bit1(&self) -> Symbol {
        self.bit1
    }

    /// Current `(byte, bit)` cursor.
    pub fn position(&self) -> (usize, u8) {
        (self.byte_index, self.bit_index)
    }

    #[inline]
    fn symbol_for(&self, byte: u8) -> Symbol {
        let mask = if self.msb_first {
            0x80 >> self.bit_index
        } else {
            1 << self.bit_index
        };
        if byte & mask != 0 { self.bit1 } else { self.bit0 }
    }
}

impl Encoder for BytesEncoder {
    type Item = u8;

    fn encode(&mut self, input: &[u8], buffer: &mut SymbolBuffer<'_>) -> Encoded {
        let mut written = 0;

        while let Some(&byte) = input.get(self.byte_index) {
            if buffer.push(self.symbol_for(byte)).is_err() {
                return Encoded {
                    symbols: written,
                    state: EncodeState::MEM_FULL,
                };
            }
            written += 1;

            self.bit_index += 1;
            if self.bit_index == 8 {
                self.bit_index = 0;
                self.byte_index += 1;
            }
        }

        self.reset();
        let mut state = EncodeState::COMPLETE;
        if buffer.is_full() {
            state |= EncodeState::MEM_FULL;
        }
        Encoded {
            symbols: written,
            state,
        }
    }

    fn reset(&mut self) {
        self.byte_index = 0;
        self.bit_index = 0;
    }
}

/// Copies symbols verbatim.
#[derive(Debug, Clone, Default)]
pub struct CopyEncoder {
    index: usize,
}

impl CopyEncoder {
    /// Creates an encoder at the start of its input.
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Index of the next symbol to copy.
    pub fn position(&self) -> usize {
        self.index
    }
}

impl Encoder for CopyEncoder {
    type Item = Symbol;

    fn encode(&mut self, input: &[Symbol], buffer: &mut SymbolBuffer<'_>) -> Encoded {
        let mut written = 0;

        while let Some(&symbol) = input.get(self.index) {
            if buffer.push(symbol).is_err() {
                return Encoded {
                    symbols: written,
                    state: EncodeState::MEM_FULL,
                };
            }
            written += 1;
            self.index += 1;
        }

        self.reset();
        let mut state = EncodeState::COMPLETE;
        if buffer.is_full() {
            state |= EncodeState::MEM_FULL;
        }
        Encoded {
            symbols: written,
            state,
        }
    }

    fn reset(&mut self) {
        self.index = 0;
    }
}
