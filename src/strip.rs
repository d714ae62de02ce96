//! LED strip device: pixel buffer, frame encoder and transmit channel together.
//!
//! Provides [`LedStrip`], which owns everything needed to drive one strip, and
//! the [`StripInterface`] trait through which callers set pixels and refresh
//! without caring about the backend.

use crate::channel::{
    GpioNum, Timeout, TransmitConfig, TxChannel, TxChannelConfig, TxChannelProvider,
};
use crate::colour::Colour;
use crate::encoder::Encoder;
use crate::error::StripError;
use crate::pixel::{PixelBuffer, PixelFormat};
use crate::strip_encoder::StripEncoder;
use crate::timing::LedTiming;
use palette::Srgb;
use smart_leds_trait::{RGB8, SmartLedsWrite};

/// Pixel and channel operations common to every strip backend.
pub trait StripInterface {
    /// Writes one pixel into the buffer. Does not touch the hardware.
    fn set_pixel(&mut self, index: u16, red: u8, green: u8, blue: u8) -> Result<(), StripError>;

    /// Sends the buffer to the strip and blocks until it has been latched.
    fn refresh(&mut self) -> Result<(), StripError>;

    /// Zeroes the buffer and refreshes, turning the strip dark.
    fn clear(&mut self) -> Result<(), StripError>;

    /// Number of LEDs on the strip.
    fn num_leds(&self) -> u16;

    /// Writes one pixel from the named palette.
    fn set_pixel_colour(&mut self, index: u16, colour: Colour) -> Result<(), StripError> {
        let rgb = colour.rgb();
        self.set_pixel(index, rgb.red, rgb.green, rgb.blue)
    }

    /// Sets every pixel to `color`, then refreshes once.
    fn set_all_pixels(&mut self, color: Srgb<u8>) -> Result<(), StripError> {
        for index in 0..self.num_leds() {
            self.set_pixel(index, color.red, color.green, color.blue)?;
        }
        self.refresh()
    }

    /// Fills the strip with a named colour and refreshes.
    fn set_colour(&mut self, colour: Colour) -> Result<(), StripError> {
        self.set_all_pixels(colour.rgb())
    }
}

/// Everything needed to create a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripConfig {
    /// Number of LEDs.
    pub num_leds: u16,
    /// Byte layout per pixel.
    pub pixel_format: PixelFormat,
    /// Protocol pulse widths.
    pub timing: LedTiming,
    /// Channel settings, including the data pin.
    pub channel: TxChannelConfig,
}

impl StripConfig {
    /// WS2812 GRB strip on `gpio` with default channel settings.
    pub const fn new(gpio: GpioNum, num_leds: u16) -> Self {
        Self {
            num_leds,
            pixel_format: PixelFormat::Grb,
            timing: LedTiming::WS2812,
            channel: TxChannelConfig::new(gpio),
        }
    }

    /// Sets the pixel layout.
    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = pixel_format;
        self
    }

    /// Sets the protocol timing.
    pub fn with_timing(mut self, timing: LedTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Replaces the channel settings.
    pub fn with_channel(mut self, channel: TxChannelConfig) -> Self {
        self.channel = channel;
        self
    }
}

/// An addressable LED strip on one transmit channel.
///
/// # Type Parameters
/// * `C` - Transmit channel implementation
/// * `N` - Pixel buffer capacity in bytes (`num_leds × bytes_per_pixel` must fit)
pub struct LedStrip<C: TxChannel, const N: usize> {
    pixels: PixelBuffer<N>,
    encoder: StripEncoder,
    channel: C,
    config: TxChannelConfig,
}

impl<C: TxChannel, const N: usize> LedStrip<C, N> {
    /// Creates a WS2812 GRB strip on `gpio` with default channel settings.
    ///
    /// # Errors
    /// See [`LedStrip::new`].
    pub fn create<P>(provider: &mut P, gpio: GpioNum, num_leds: u16) -> Result<Self, StripError>
    where
        P: TxChannelProvider<Channel = C>,
    {
        Self::new(provider, StripConfig::new(gpio, num_leds))
    }

    /// Allocates the buffer, builds the encoder and binds a channel.
    ///
    /// # Errors
    /// * `InvalidArgument` - zero LEDs, timing unrepresentable at the resolution,
    ///   or the pin is already bound
    /// * `OutOfMemory` - the buffer does not fit in `N` bytes
    /// * any error the provider reports while creating the channel
    pub fn new<P>(provider: &mut P, config: StripConfig) -> Result<Self, StripError>
    where
        P: TxChannelProvider<Channel = C>,
    {
        let pixels = PixelBuffer::new(config.num_leds, config.pixel_format)?;
        let encoder = StripEncoder::new(&config.timing, config.channel.effective_resolution_hz())?;
        let channel = provider.new_tx_channel(&config.channel)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "led strip: {} LEDs on gpio {}, {} Hz",
            config.num_leds,
            config.channel.gpio,
            config.channel.effective_resolution_hz()
        );

        Ok(Self {
            pixels,
            encoder,
            channel,
            config: config.channel,
        })
    }

    /// Writes one pixel as G, R, B. Does not touch the hardware.
    ///
    /// # Errors
    /// `IndexOutOfRange` if `index >= num_leds`; the buffer is left unchanged.
    pub fn set_pixel(
        &mut self,
        index: u16,
        red: u8,
        green: u8,
        blue: u8,
    ) -> Result<(), StripError> {
        self.pixels.set(index, red, green, blue)
    }

    /// Writes one pixel as G, R, B, W on a GRBW strip.
    pub fn set_pixel_rgbw(
        &mut self,
        index: u16,
        red: u8,
        green: u8,
        blue: u8,
        white: u8,
    ) -> Result<(), StripError> {
        self.pixels.set_rgbw(index, red, green, blue, white)
    }

    /// Sends the buffer and blocks until the channel is idle again.
    pub fn refresh(&mut self) -> Result<(), StripError> {
        self.refresh_with_timeout(Timeout::Forever)
    }

    /// Sends the buffer, waiting at most `timeout` for the channel to drain.
    ///
    /// Stages run in order: enable, transmit, wait, disable. The first failing
    /// stage ends the refresh and its error is returned as-is. Encode progress of
    /// an aborted frame is discarded, so the encoder is back at the start of a
    /// frame whenever this returns. After `Timeout` the channel is still
    /// enabled; call [`LedStrip::disable`] before refreshing again.
    pub fn refresh_with_timeout(&mut self, timeout: Timeout) -> Result<(), StripError> {
        self.encoder.reset();

        #[cfg(feature = "defmt")]
        defmt::debug!("led strip: refreshing {} bytes", self.pixels.as_bytes().len());

        let result = self.transmit_frame(timeout);
        if let Err(_err) = result {
            self.encoder.reset();

            #[cfg(feature = "defmt")]
            defmt::warn!("led strip: refresh failed: {}", _err);
        }

        result
    }

    fn transmit_frame(&mut self, timeout: Timeout) -> Result<(), StripError> {
        let tx_config = TransmitConfig { loop_count: 0 };

        self.channel.enable()?;
        self.channel.transmit(&mut self.encoder, self.pixels.as_bytes(), &tx_config)?;
        self.channel.wait_all_done(timeout)?;
        self.channel.disable()
    }

    /// Zeroes every pixel and refreshes.
    pub fn clear(&mut self) -> Result<(), StripError> {
        self.pixels.clear();
        self.refresh()
    }

    /// Disables the channel, e.g. after a refresh timed out.
    pub fn disable(&mut self) -> Result<(), StripError> {
        self.channel.disable()
    }

    /// Discards any partially encoded frame.
    pub fn reset_encoder(&mut self) {
        self.encoder.reset();
    }

    /// Releases the channel back to `provider` and drops the buffer.
    pub fn destroy<P>(self, provider: &mut P) -> Result<(), StripError>
    where
        P: TxChannelProvider<Channel = C>,
    {
        #[cfg(feature = "defmt")]
        defmt::info!("led strip: releasing gpio {}", self.config.gpio);

        provider.delete_tx_channel(self.channel)
    }

    /// Number of LEDs.
    pub fn num_leds(&self) -> u16 {
        self.pixels.num_leds()
    }

    /// Pixel layout.
    pub fn pixel_format(&self) -> PixelFormat {
        self.pixels.format()
    }

    /// Data pin.
    pub fn gpio(&self) -> GpioNum {
        self.config.gpio
    }

    /// Raw pixel bytes in wire order.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_bytes()
    }

    /// The frame encoder.
    pub fn encoder(&self) -> &StripEncoder {
        &self.encoder
    }

    /// The transmit channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Mutable access to the transmit channel.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Channel settings the strip was created with.
    pub fn channel_config(&self) -> &TxChannelConfig {
        &self.config
    }
}

impl<C: TxChannel, const N: usize> StripInterface for LedStrip<C, N> {
    fn set_pixel(&mut self, index: u16, red: u8, green: u8, blue: u8) -> Result<(), StripError> {
        LedStrip::set_pixel(self, index, red, green, blue)
    }

    fn refresh(&mut self) -> Result<(), StripError> {
        LedStrip::refresh(self)
    }

    fn clear(&mut self) -> Result<(), StripError> {
        LedStrip::clear(self)
    }

    fn num_leds(&self) -> u16 {
        LedStrip::num_leds(self)
    }
}

impl<C: TxChannel, const N: usize> SmartLedsWrite for LedStrip<C, N> {
    type Error = StripError;
    type Color = RGB8;

    /// Writes colors from the first LED onward, then refreshes.
    ///
    /// LEDs past the end of the iterator keep their previous color. Colors are
    /// staged in a copy of the buffer, so more colors than LEDs fails with
    /// `IndexOutOfRange` and leaves the buffer untouched.
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        let mut staged = self.pixels.clone();
        let mut index: u16 = 0;
        for color in iterator {
            let color: RGB8 = color.into();
            staged.set(index, color.r, color.g, color.b)?;
            index = index.saturating_add(1);
        }
        self.pixels = staged;
        self.refresh()
    }
}
