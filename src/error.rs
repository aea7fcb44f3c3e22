//! Common error definitions.
//!
//! The arming sequence itself can't fail: its inputs are compile-time constants. These errors
//! come from the run-time (`try_*`) constructors, and from the low-power entry check.

/// Alias for Result<T, Error>.
pub type Result<T> = core::result::Result<T, Error>;

/// Collection of all errors that can occur.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Both comparator terminals were given the reference, or the same input channel.
    InvalidRouting,
    /// A reference ladder tap outside of 1..=32.
    TapOutOfRange(u8),
    /// A lower reference tap above the upper one.
    TapsInverted { lower: u8, upper: u8 },
    /// A GPIO pin number above 7.
    PinOutOfRange(u8),
    /// The PCM is in the middle of a power mode transition (`PMR_BUSY`), so a low-power
    /// mode can't be requested.
    PowerTransitionBusy,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidRouting => write!(f, "comparator terminals must use distinct sources"),
            Self::TapOutOfRange(tap) => write!(f, "reference tap {tap}/32 out of range"),
            Self::TapsInverted { lower, upper } => {
                write!(f, "lower reference tap {lower}/32 is above upper tap {upper}/32")
            }
            Self::PinOutOfRange(pin) => write!(f, "pin {pin} out of range"),
            Self::PowerTransitionBusy => write!(f, "power mode transition in progress"),
        }
    }
}

impl core::error::Error for Error {}
