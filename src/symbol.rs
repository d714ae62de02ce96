//! Pulse symbols and the memory-block view encoders write into.
//!
//! A [`Symbol`] is one entry of the peripheral's pulse memory: two timed
//! levels. [`SymbolBuffer`] is the window of free memory handed to an encoder
//! for a single encode call.

/// Output level of one half of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Line held low.
    #[default]
    Low,
    /// Line held high.
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high { Level::High } else { Level::Low }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level == Level::High
    }
}

/// Two-level timed pulse, durations in channel ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Symbol {
    /// Level of the first half.
    pub level0: Level,
    /// Length of the first half in ticks.
    pub duration0: u16,
    /// Level of the second half.
    pub level1: Level,
    /// Length of the second half in ticks.
    pub duration1: u16,
}

impl Symbol {
    /// Largest duration a single half can hold (15 bits).
    pub const MAX_DURATION: u16 = 0x7FFF;

    /// Creates a symbol.
    #[inline]
    pub const fn new(level0: Level, duration0: u16, level1: Level, duration1: u16) -> Self {
        Self {
            level0,
            duration0,
            level1,
            duration1,
        }
    }

    /// Total length of the symbol in ticks.
    #[inline]
    pub const fn ticks(&self) -> u32 {
        self.duration0 as u32 + self.duration1 as u32
    }

    /// Packs the symbol into the peripheral's 32-bit memory word.
    ///
    /// Layout: bits 0-14 `duration0`, bit 15 `level0`, bits 16-30 `duration1`,
    /// bit 31 `level1`. Durations wider than 15 bits are truncated.
    pub const fn to_word(&self) -> u32 {
        let low = (self.duration0 & Self::MAX_DURATION) as u32
            | ((matches!(self.level0, Level::High) as u32) << 15);
        let high = (self.duration1 & Self::MAX_DURATION) as u32
            | ((matches!(self.level1, Level::High) as u32) << 15);
        low | (high << 16)
    }

    /// Unpacks a 32-bit memory word.
    pub const fn from_word(word: u32) -> Self {
        Self {
            level0: if word & (1 << 15) != 0 {
                Level::High
            } else {
                Level::Low
            },
            duration0: (word & 0x7FFF) as u16,
            level1: if word & (1 << 31) != 0 {
                Level::High
            } else {
                Level::Low
            },
            duration1: ((word >> 16) & 0x7FFF) as u16,
        }
    }
}

impl From<Symbol> for u32 {
    fn from(symbol: Symbol) -> Self {
        symbol.to_word()
    }
}

impl From<u32> for Symbol {
    fn from(word: u32) -> Self {
        Symbol::from_word(word)
    }
}

/// Free space in one memory block, filled front to back by an encoder.
#[derive(Debug)]
pub struct SymbolBuffer<'a> {
    symbols: &'a mut [Symbol],
    position: usize,
}

impl<'a> SymbolBuffer<'a> {
    /// Wraps an empty memory block.
    pub fn new(symbols: &'a mut [Symbol]) -> Self {
        Self {
            symbols,
            position: 0,
        }
    }

    /// Appends a symbol, handing it back if the block is full.
    #[inline]
    pub fn push(&mut self, symbol: Symbol) -> Result<(), Symbol> {
        match self.symbols.get_mut(self.position) {
            Some(slot) => {
                *slot = symbol;
                self.position += 1;
                Ok(())
            }
            None => Err(symbol),
        }
    }

    /// Total number of symbols the block can hold.
    pub fn capacity(&self) -> usize {
        self.symbols.len()
    }

    /// Number of symbols written so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of free slots left.
    pub fn remaining(&self) -> usize {
        self.symbols.len() - self.position
    }

    /// True when no free slots remain.
    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    /// The symbols written so far.
    pub fn written(&self) -> &[Symbol] {
        &self.symbols[..self.position]
    }
}
