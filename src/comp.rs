//! Comparator (COMP_E)
//!
//! The COMP_E module compares the analog voltages on its `V+` and `V-` terminals. Each
//! terminal is fed either from one of 16 external input channels (`CEx`), or from the
//! internal reference generator: a 32-tap resistor ladder across Vcc (or across a shared
//! reference voltage). The (optionally filtered and inverted) result drives the `COUT` pin
//! directly, so once configured, no software is involved.
//!
//! Setup order, as used by [`crate::sequence::arm`]:
//! 1. [`CompE::init`] with a [`CompConfig`]: input routing, filter, polarity and power mode.
//!    The module is left disabled.
//! 2. [`CompE::set_reference_voltage`] with a [`ReferenceDivider`]. This relies on the
//!    reference routing (`CERSEL`) written by `init`.
//! 3. [`CompE::disable_input_buffer`] for the analog input channel.
//! 4. [`CompE::enable`], then wait for the analog stage to settle before trusting `COUT`.
//!
//! The hardware doesn't check this order. Programming the reference before `init`, or
//! reading the output before it settles, silently gives a wrong or noisy result.
//!
//! Reference: MSP432P4xx Technical Reference Manual (SLAU356), chapter 22 "Comparator E".

use paste::paste;
use tock_registers::{
    interfaces::{ReadWriteable, Readable, Writeable},
    register_bitfields,
    registers::{ReadOnly, ReadWrite},
};

use crate::error::{Error, Result};

const COMP_E0_BASE: usize = 0x4000_3400;

/// Number of taps on the reference resistor ladder: tap `n` selects `n/32` of the ladder
/// voltage.
pub const LADDER_TAPS: u8 = 32;

register_bitfields![u16,
    pub CEXCTL0 [
        // channel input selected for the V+ terminal
        CEIPSEL OFFSET(0) NUMBITS(4) [],
        // channel input enable for the V+ terminal
        CEIPEN OFFSET(7) NUMBITS(1) [],
        // channel input selected for the V- terminal
        CEIMSEL OFFSET(8) NUMBITS(4) [],
        // channel input enable for the V- terminal
        CEIMEN OFFSET(15) NUMBITS(1) []
    ],
    pub CEXCTL1 [
        // comparator output value
        CEOUT OFFSET(0) NUMBITS(1) [],
        // output polarity
        CEOUTPOL OFFSET(1) NUMBITS(1) [],
        // output filter enable
        CEF OFFSET(2) NUMBITS(1) [],
        // interrupt edge select
        CEIES OFFSET(3) NUMBITS(1) [],
        // input short
        CESHORT OFFSET(4) NUMBITS(1) [],
        // exchange: swaps the inputs, and inverts the output
        CEEX OFFSET(5) NUMBITS(1) [],
        // filter delay
        CEFDLY OFFSET(6) NUMBITS(2) [],
        // power mode
        CEPWRMD OFFSET(8) NUMBITS(2) [
            HighSpeed = 0,
            Normal = 1,
            UltraLowPower = 2
        ],
        // comparator on
        CEON OFFSET(10) NUMBITS(1) [],
        // which reference tap is used when CEMRVS = 1
        CEMRVL OFFSET(11) NUMBITS(1) [],
        // 0: the comparator output selects between CEREF0 and CEREF1. 1: CEMRVL does.
        CEMRVS OFFSET(12) NUMBITS(1) []
    ],
    pub CEXCTL2 [
        // reference tap while COUT = 0
        CEREF0 OFFSET(0) NUMBITS(5) [],
        // 0: VREF is applied to the V+ terminal. 1: to the V- terminal.
        CERSEL OFFSET(5) NUMBITS(1) [],
        // reference source
        CERS OFFSET(6) NUMBITS(2) [
            Off = 0,
            Vcc = 1,
            SharedLadder = 2,
            SharedDirect = 3
        ],
        // reference tap while COUT = 1
        CEREF1 OFFSET(8) NUMBITS(5) [],
        // shared reference voltage level
        CEREFL OFFSET(13) NUMBITS(2) [],
        // reference accuracy: static or clocked
        CEREFACC OFFSET(15) NUMBITS(1) []
    ],
    pub CEXCTL3 [
        // port disable, one bit per input channel
        CEPD OFFSET(0) NUMBITS(16) []
    ],
    pub CEXINT [
        CEIFG OFFSET(0) NUMBITS(1) [],
        CEIIFG OFFSET(1) NUMBITS(1) [],
        CERDYIFG OFFSET(4) NUMBITS(1) [],
        CEIE OFFSET(8) NUMBITS(1) [],
        CEIIE OFFSET(9) NUMBITS(1) [],
        CERDYIE OFFSET(12) NUMBITS(1) []
    ]
];

/// COMP_E register block.
#[repr(C)]
pub struct CompERegisters {
    pub ctl0: ReadWrite<u16, CEXCTL0::Register>,
    pub ctl1: ReadWrite<u16, CEXCTL1::Register>,
    pub ctl2: ReadWrite<u16, CEXCTL2::Register>,
    pub ctl3: ReadWrite<u16, CEXCTL3::Register>,
    _reserved: [u16; 2],
    pub int: ReadWrite<u16, CEXINT::Register>,
    pub iv: ReadOnly<u16>,
}

// Generates the input channel enum, `C0` through `C15`.
macro_rules! make_channels {
    ($($n:literal),+ $(,)?) => {
        paste! {
            /// Comparator input channel (`CEx`). The pin each channel is on depends on the
            /// comparator instance; for COMP_E0, C0.2 is P7.7.
            #[derive(Clone, Copy, Debug, PartialEq, Eq)]
            #[cfg_attr(feature = "defmt", derive(defmt::Format))]
            #[repr(u8)]
            pub enum Channel {
                $(
                    [<C $n>] = $n,
                )+
            }

            impl Channel {
                /// All channels, in register order.
                pub const ALL: [Self; 16] = [$(Self::[<C $n>]),+];

                const fn from_bits(bits: u16) -> Self {
                    match bits & 0xf {
                        $(
                            $n => Self::[<C $n>],
                        )+
                        _ => unreachable!(),
                    }
                }
            }
        }
    };
}

make_channels!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);

impl Channel {
    /// Value for `CEIPSEL` / `CEIMSEL`.
    pub const fn bits(&self) -> u16 {
        *self as u16
    }

    /// This channel's bit in `CExCTL3`.
    pub const fn mask(&self) -> u16 {
        1 << *self as u16
    }
}

/// What feeds a comparator terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Terminal {
    /// The reference generator output, `VREF`. See [`ReferenceDivider`].
    Vref,
    /// An external input channel.
    Pin(Channel),
}

/// Output filter. When enabled, the comparator output must be stable for the filter delay
/// before it propagates to `COUT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterDelay {
    /// No filtering.
    Off,
    /// Filter on, `CEFDLY = 00`.
    Level1,
    /// Filter on, `CEFDLY = 01`.
    Level2,
    /// Filter on, `CEFDLY = 10`.
    Level3,
    /// Filter on, `CEFDLY = 11`. The longest delay.
    Level4,
}

impl FilterDelay {
    /// `CEF`, `CEFDLY`.
    const fn bits(&self) -> (bool, u16) {
        match self {
            Self::Off => (false, 0),
            Self::Level1 => (true, 0b00),
            Self::Level2 => (true, 0b01),
            Self::Level3 => (true, 0b10),
            Self::Level4 => (true, 0b11),
        }
    }

    const fn from_bits(cef: bool, fdly: u16) -> Self {
        if !cef {
            return Self::Off;
        }
        match fdly & 0b11 {
            0b00 => Self::Level1,
            0b01 => Self::Level2,
            0b10 => Self::Level3,
            _ => Self::Level4,
        }
    }

    /// Nominal filter delay, in ns. The datasheet gives typical values only; the real delay
    /// varies with supply voltage and temperature.
    pub const fn nominal_delay_ns(&self) -> u32 {
        match self {
            Self::Off => 0,
            Self::Level1 => 450,
            Self::Level2 => 900,
            Self::Level3 => 1_800,
            Self::Level4 => 3_600,
        }
    }
}

/// Comparator output polarity
///
/// When [OutputPolarity::NotInverted] is used, the comparator output is high (1) when the
/// `V+` terminal has a higher voltage than `V-`, and low (0) otherwise.
///
/// When [OutputPolarity::Inverted] is used, the comparator output is high (1) when `V+` has
/// the lower voltage, and low (0) otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputPolarity {
    NotInverted = 0,
    Inverted = 1,
}

/// Comparator power mode. Trades propagation delay against supply current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Lowest propagation delay.
    HighSpeed = 0,
    Normal = 1,
    /// Lowest supply current.
    UltraLowPower = 2,
}

const fn routing_valid(positive: Terminal, negative: Terminal) -> bool {
    match (positive, negative) {
        (Terminal::Vref, Terminal::Vref) => false,
        (Terminal::Pin(p), Terminal::Pin(n)) => p as u8 != n as u8,
        _ => true,
    }
}

/// Comparator configuration, applied by [`CompE::init`].
///
/// Every field must be given; there's no default. The reference can only be routed to one
/// terminal, and the two terminals can't share an input channel: [`CompConfig::new`] rejects
/// these at compile time when used in a `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompConfig {
    positive: Terminal,
    negative: Terminal,
    filter: FilterDelay,
    polarity: OutputPolarity,
    power: PowerMode,
}

impl CompConfig {
    pub const fn new(
        positive: Terminal,
        negative: Terminal,
        filter: FilterDelay,
        polarity: OutputPolarity,
        power: PowerMode,
    ) -> Self {
        assert!(
            routing_valid(positive, negative),
            "comparator terminals must use distinct sources"
        );

        Self {
            positive,
            negative,
            filter,
            polarity,
            power,
        }
    }

    /// As [`CompConfig::new`], but reports invalid routing as an error instead of panicking.
    pub fn try_new(
        positive: Terminal,
        negative: Terminal,
        filter: FilterDelay,
        polarity: OutputPolarity,
        power: PowerMode,
    ) -> Result<Self> {
        if !routing_valid(positive, negative) {
            return Err(Error::InvalidRouting);
        }
        Ok(Self::new(positive, negative, filter, polarity, power))
    }

    /// Source of the `V+` terminal.
    pub const fn positive(&self) -> Terminal {
        self.positive
    }

    /// Source of the `V-` terminal.
    pub const fn negative(&self) -> Terminal {
        self.negative
    }

    pub const fn filter(&self) -> FilterDelay {
        self.filter
    }

    pub const fn polarity(&self) -> OutputPolarity {
        self.polarity
    }

    pub const fn power(&self) -> PowerMode {
        self.power
    }
}

/// A reference ladder tap: `n` selects `n/32` of the ladder voltage, for `n` in 1..=32.
/// The register fields hold `n - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefTap(u8);

impl RefTap {
    pub const fn new(numerator: u8) -> Self {
        assert!(
            numerator >= 1 && numerator <= LADDER_TAPS,
            "reference taps are 1/32 through 32/32"
        );
        Self(numerator)
    }

    pub fn try_new(numerator: u8) -> Result<Self> {
        if numerator == 0 || numerator > LADDER_TAPS {
            return Err(Error::TapOutOfRange(numerator));
        }
        Ok(Self(numerator))
    }

    /// The `n` in `n/32`.
    pub const fn numerator(&self) -> u8 {
        self.0
    }

    /// Value for `CEREF0` / `CEREF1`.
    const fn field(&self) -> u16 {
        self.0 as u16 - 1
    }

    const fn from_field(field: u16) -> Self {
        Self((field & 0x1f) as u8 + 1)
    }
}

/// Voltage across the reference ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReferenceBase {
    /// Vcc, with the shared reference amplifier disabled.
    Vcc = 0,
    /// The shared 1.2V reference.
    Shared1V2 = 1,
    /// The shared 2.0V reference.
    Shared2V0 = 2,
    /// The shared 2.5V reference.
    Shared2V5 = 3,
}

impl ReferenceBase {
    /// Ladder voltage, in mV, given the supply voltage.
    pub const fn voltage_mv(&self, supply_mv: u32) -> u32 {
        match self {
            Self::Vcc => supply_mv,
            Self::Shared1V2 => 1_200,
            Self::Shared2V0 => 2_000,
            Self::Shared2V5 => 2_500,
        }
    }

    const fn from_bits(refl: u16) -> Self {
        match refl & 0b11 {
            0 => Self::Vcc,
            1 => Self::Shared1V2,
            2 => Self::Shared2V0,
            _ => Self::Shared2V5,
        }
    }
}

/// Whether the comparator has one trip point, or two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThresholdMode {
    /// Upper and lower taps are equal.
    Single,
    /// The output switches low above the upper tap, and back high below the lower tap.
    Hysteresis,
}

/// Reference generator settings, applied by [`CompE::set_reference_voltage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReferenceDivider {
    base: ReferenceBase,
    lower: RefTap,
    upper: RefTap,
}

impl ReferenceDivider {
    pub const fn new(base: ReferenceBase, lower: RefTap, upper: RefTap) -> Self {
        assert!(
            lower.0 <= upper.0,
            "the lower reference tap can't be above the upper one"
        );
        Self { base, lower, upper }
    }

    pub fn try_new(base: ReferenceBase, lower: RefTap, upper: RefTap) -> Result<Self> {
        if lower > upper {
            return Err(Error::TapsInverted {
                lower: lower.0,
                upper: upper.0,
            });
        }
        Ok(Self { base, lower, upper })
    }

    pub const fn base(&self) -> ReferenceBase {
        self.base
    }

    pub const fn lower(&self) -> RefTap {
        self.lower
    }

    pub const fn upper(&self) -> RefTap {
        self.upper
    }

    pub const fn mode(&self) -> ThresholdMode {
        if self.lower.0 == self.upper.0 {
            ThresholdMode::Single
        } else {
            ThresholdMode::Hysteresis
        }
    }

    /// Lower and upper trip points, in mV, given the supply voltage.
    pub const fn threshold_mv(&self, supply_mv: u32) -> (u32, u32) {
        let ladder = self.base.voltage_mv(supply_mv) as u64;
        (
            (ladder * self.lower.0 as u64 / LADDER_TAPS as u64) as u32,
            (ladder * self.upper.0 as u64 / LADDER_TAPS as u64) as u32,
        )
    }
}

/// Represents a COMP_E comparator instance.
pub struct CompE<'a> {
    regs: &'a CompERegisters,
}

// Creates the `new_compX` constructor for a comparator instance at a fixed base address.
macro_rules! make_comp {
    ($comp:ident, $base:expr) => {
        paste! {
            impl CompE<'static> {
                pub fn [<new_ $comp>]() -> Self {
                    Self {
                        regs: unsafe { &*($base as *const CompERegisters) },
                    }
                }
            }
        }
    };
}

make_comp!(comp_e0, COMP_E0_BASE);

impl<'a> CompE<'a> {
    /// Use an arbitrary register block.
    pub fn from_registers(regs: &'a CompERegisters) -> Self {
        Self { regs }
    }

    /// Apply a configuration: terminal routing, output filter, polarity and power mode.
    ///
    /// `CExCTL0` and `CExINT` are cleared, and `CExCTL1` is overwritten, which turns the
    /// comparator off. Channels used by either terminal get their input buffer disabled.
    /// Applying the same configuration twice gives the same register state.
    pub fn init(&self, cfg: &CompConfig) {
        let regs = self.regs;

        regs.ctl0.set(0);
        regs.int.set(0);

        match cfg.positive {
            Terminal::Pin(ch) => {
                regs.ctl0
                    .modify(CEXCTL0::CEIPEN::SET + CEXCTL0::CEIPSEL.val(ch.bits()));
                self.disable_input_buffer(ch);
            }
            Terminal::Vref => regs.ctl2.modify(CEXCTL2::CERSEL::CLEAR),
        }

        match cfg.negative {
            Terminal::Pin(ch) => {
                regs.ctl0
                    .modify(CEXCTL0::CEIMEN::SET + CEXCTL0::CEIMSEL.val(ch.bits()));
                self.disable_input_buffer(ch);
            }
            Terminal::Vref => regs.ctl2.modify(CEXCTL2::CERSEL::SET),
        }

        let (cef, fdly) = cfg.filter.bits();
        regs.ctl1.write(
            CEXCTL1::CEPWRMD.val(cfg.power as u16)
                + CEXCTL1::CEF.val(cef as u16)
                + CEXCTL1::CEFDLY.val(fdly)
                + CEXCTL1::CEOUTPOL.val(cfg.polarity as u16),
        );

        debug!(
            "COMP_E: V+ <- {}, V- <- {}, filter {}, {}",
            cfg.positive, cfg.negative, cfg.filter, cfg.polarity
        );
    }

    /// Read back the configuration from the registers. Returns `None` if they don't
    /// describe one, eg before `init`.
    pub fn config(&self) -> Option<CompConfig> {
        let regs = self.regs;
        let vref_on_negative = regs.ctl2.is_set(CEXCTL2::CERSEL);

        let positive = if regs.ctl0.is_set(CEXCTL0::CEIPEN) {
            Terminal::Pin(Channel::from_bits(regs.ctl0.read(CEXCTL0::CEIPSEL)))
        } else if !vref_on_negative {
            Terminal::Vref
        } else {
            return None;
        };

        let negative = if regs.ctl0.is_set(CEXCTL0::CEIMEN) {
            Terminal::Pin(Channel::from_bits(regs.ctl0.read(CEXCTL0::CEIMSEL)))
        } else if vref_on_negative {
            Terminal::Vref
        } else {
            return None;
        };

        let filter = FilterDelay::from_bits(
            regs.ctl1.is_set(CEXCTL1::CEF),
            regs.ctl1.read(CEXCTL1::CEFDLY),
        );

        let polarity = if regs.ctl1.is_set(CEXCTL1::CEOUTPOL) {
            OutputPolarity::Inverted
        } else {
            OutputPolarity::NotInverted
        };

        let power = match regs
            .ctl1
            .read_as_enum::<CEXCTL1::CEPWRMD::Value>(CEXCTL1::CEPWRMD)?
        {
            CEXCTL1::CEPWRMD::Value::HighSpeed => PowerMode::HighSpeed,
            CEXCTL1::CEPWRMD::Value::Normal => PowerMode::Normal,
            CEXCTL1::CEPWRMD::Value::UltraLowPower => PowerMode::UltraLowPower,
        };

        CompConfig::try_new(positive, negative, filter, polarity, power).ok()
    }

    /// Program the reference generator: ladder voltage and the upper and lower taps.
    ///
    /// Must run after [`CompE::init`], which selects the terminal `VREF` goes to; that
    /// selection is the only `CExCTL2` setting kept. The output state picks the active tap
    /// (`CEMRVS = 0`), so unequal taps give hysteresis.
    pub fn set_reference_voltage(&self, reference: &ReferenceDivider) {
        let regs = self.regs;

        regs.ctl1.modify(CEXCTL1::CEMRVS::CLEAR);

        let source = match reference.base {
            ReferenceBase::Vcc => CEXCTL2::CERS::Vcc,
            _ if reference.lower.0 == LADDER_TAPS => CEXCTL2::CERS::SharedDirect,
            _ => CEXCTL2::CERS::SharedLadder,
        };

        regs.ctl2.write(
            CEXCTL2::CERSEL.val(regs.ctl2.read(CEXCTL2::CERSEL))
                + source
                + CEXCTL2::CEREFL.val(reference.base as u16)
                + CEXCTL2::CEREF1.val(reference.upper.field())
                + CEXCTL2::CEREF0.val(reference.lower.field()),
        );

        debug!(
            "COMP_E: reference {}, taps {}/32 .. {}/32",
            reference.base,
            reference.lower.0,
            reference.upper.0
        );
    }

    /// Read back the reference settings. Returns `None` if the reference generator is off.
    pub fn reference(&self) -> Option<ReferenceDivider> {
        let ctl2 = &self.regs.ctl2;

        if ctl2.matches_all(CEXCTL2::CERS::Off) {
            return None;
        }

        ReferenceDivider::try_new(
            ReferenceBase::from_bits(ctl2.read(CEXCTL2::CEREFL)),
            RefTap::from_field(ctl2.read(CEXCTL2::CEREF0)),
            RefTap::from_field(ctl2.read(CEXCTL2::CEREF1)),
        )
        .ok()
    }

    /// Disable the digital input buffer of an input channel. Required for a pin carrying a
    /// continuous analog signal: a voltage near the digital threshold would otherwise make
    /// the buffer oscillate and draw current.
    pub fn disable_input_buffer(&self, channel: Channel) {
        let ctl3 = &self.regs.ctl3;
        ctl3.set(ctl3.get() | channel.mask());

        trace!("COMP_E: input buffer off, {}", channel);
    }

    pub fn input_buffer_disabled(&self, channel: Channel) -> bool {
        self.regs.ctl3.get() & channel.mask() != 0
    }

    /// Turn the comparator on. The output isn't valid until the analog stage settles.
    pub fn enable(&self) {
        self.regs.ctl1.modify(CEXCTL1::CEON::SET);
        info!("COMP_E: on");
    }

    pub fn is_enabled(&self) -> bool {
        self.regs.ctl1.is_set(CEXCTL1::CEON)
    }

    /// Gets the output level of the comparator, after filtering and polarity.
    pub fn output_level(&self) -> bool {
        self.regs.ctl1.is_set(CEXCTL1::CEOUT)
    }
}
