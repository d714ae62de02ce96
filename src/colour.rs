//! Named colours for whole-strip fills.

use palette::Srgb;

/// The fixed set of named colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Colour {
    /// 255, 0, 0
    Red,
    /// 0, 255, 0
    Green,
    /// 0, 0, 255
    Blue,
    /// 255, 255, 0
    Yellow,
    /// 0, 255, 255
    Aqua,
    /// 255, 0, 255
    Magenta,
}

/// RGB values of each [`Colour`], indexed by discriminant.
pub const PALETTE: [Srgb<u8>; 6] = [
    Srgb::<u8>::new(255, 0, 0),
    Srgb::<u8>::new(0, 255, 0),
    Srgb::<u8>::new(0, 0, 255),
    Srgb::<u8>::new(255, 255, 0),
    Srgb::<u8>::new(0, 255, 255),
    Srgb::<u8>::new(255, 0, 255),
];

impl Colour {
    /// Every colour in palette order.
    pub const ALL: [Colour; 6] = [
        Colour::Red,
        Colour::Green,
        Colour::Blue,
        Colour::Yellow,
        Colour::Aqua,
        Colour::Magenta,
    ];

    /// Looks up the RGB value.
    #[inline]
    pub const fn rgb(self) -> Srgb<u8> {
        PALETTE[self as usize]
    }
}

impl From<Colour> for Srgb<u8> {
    fn from(colour: Colour) -> Self {
        colour.rgb()
    }
}
