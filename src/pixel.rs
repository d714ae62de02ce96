//! Fixed-capacity pixel storage in wire order.

use crate::error::StripError;
use heapless::Vec;

/// Byte layout of one pixel on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// Green, red, blue (WS2812).
    #[default]
    Grb,
    /// Green, red, blue, white (SK6812 RGBW).
    Grbw,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Grb => 3,
            PixelFormat::Grbw => 4,
        }
    }
}

/// Pixel bytes for a strip of `num_leds` LEDs, held in at most `N` bytes.
///
/// The length is fixed at creation. Every write goes through an index check,
/// so a rejected write never touches the buffer.
#[derive(Debug, Clone)]
pub struct PixelBuffer<const N: usize> {
    bytes: Vec<u8, N>,
    num_leds: u16,
    format: PixelFormat,
}

impl<const N: usize> PixelBuffer<N> {
    /// Allocates an all-zero buffer.
    ///
    /// # Errors
    /// * `InvalidArgument` - `num_leds` is zero
    /// * `OutOfMemory` - `num_leds × bytes_per_pixel` exceeds `N`
    pub fn new(num_leds: u16, format: PixelFormat) -> Result<Self, StripError> {
        if num_leds == 0 {
            return Err(StripError::InvalidArgument("strip must have at least one LED"));
        }

        let len = usize::from(num_leds) * format.bytes_per_pixel();
        let mut bytes = Vec::new();
        bytes.resize(len, 0).map_err(|_| StripError::OutOfMemory {
            requested: len,
            capacity: N,
        })?;

        Ok(Self {
            bytes,
            num_leds,
            format,
        })
    }

    /// Number of LEDs.
    pub fn num_leds(&self) -> u16 {
        self.num_leds
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw bytes in wire order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn pixel_mut(&mut self, index: u16) -> Result<&mut [u8], StripError> {
        if index >= self.num_leds {
            return Err(StripError::IndexOutOfRange {
                index,
                num_leds: self.num_leds,
            });
        }
        let width = self.format.bytes_per_pixel();
        let start = usize::from(index) * width;
        Ok(&mut self.bytes[start..start + width])
    }

    /// Writes one pixel as G, R, B. On GRBW strips the white channel is cleared.
    pub fn set(&mut self, index: u16, red: u8, green: u8, blue: u8) -> Result<(), StripError> {
        let pixel = self.pixel_mut(index)?;
        pixel[0] = green;
        pixel[1] = red;
        pixel[2] = blue;
        if let Some(white) = pixel.get_mut(3) {
            *white = 0;
        }
        Ok(())
    }

    /// Writes one pixel as G, R, B, W.
    ///
    /// # Errors
    /// `InvalidArgument` on a GRB strip, `IndexOutOfRange` past the end.
    pub fn set_rgbw(
        &mut self,
        index: u16,
        red: u8,
        green: u8,
        blue: u8,
        white: u8,
    ) -> Result<(), StripError> {
        if self.format != PixelFormat::Grbw {
            return Err(StripError::InvalidArgument("strip has no white channel"));
        }
        let pixel = self.pixel_mut(index)?;
        pixel.copy_from_slice(&[green, red, blue, white]);
        Ok(())
    }

    /// Zeroes every pixel.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}
