#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Symbol`**: One two-level timed pulse, durations in channel ticks
//! - **`LedTiming`**: Protocol pulse widths, converted to bit and reset symbols per resolution
//! - **`BytesEncoder`** / **`CopyEncoder`**: Resumable encoders that fill one memory block per call
//! - **`StripEncoder`**: Sequences pixel bits and the reset gap into one frame
//! - **`TxChannel`** / **`TxChannelProvider`**: Traits to implement for your pulse peripheral
//! - **`LedStrip`**: Owns pixel buffer, encoder and channel; the public strip device
//! - **`StripInterface`**: Backend-agnostic pixel/refresh/clear operations
//! - **`Colour`**: The six named palette colours
//!
//! Pixels are stored in wire order (G, R, B[, W]). Nothing reaches the hardware
//! until `refresh`, which blocks until the frame and its reset gap have been sent.

pub use palette::Srgb;

pub mod channel;
pub mod colour;
pub mod encoder;
pub mod error;
pub mod pixel;
pub mod strip;
pub mod strip_encoder;
pub mod symbol;
pub mod timing;

pub use channel::{
    ClockSource, DEFAULT_MEM_BLOCK_SYMBOLS, DEFAULT_TRANS_QUEUE_DEPTH, FrameStats, GpioNum,
    PinRegistry, Timeout, TransmitConfig, TxChannel, TxChannelConfig, TxChannelProvider,
    drive_encoder,
};
pub use colour::{Colour, PALETTE};
pub use encoder::{BytesEncoder, CopyEncoder, EncodeState, Encoded, Encoder};
pub use error::{ChannelOp, StripError};
pub use pixel::{PixelBuffer, PixelFormat};
pub use strip::{LedStrip, StripConfig, StripInterface};
pub use strip_encoder::{StripEncoder, StripEncoderState};
pub use symbol::{Level, Symbol, SymbolBuffer};
pub use timing::{DEFAULT_RESET_US, DEFAULT_RESOLUTION_HZ, LedTiming};
