//! Board configuration. All settings are fixed at compile time.

use crate::{
    comp::{
        Channel, CompConfig, FilterDelay, OutputPolarity, PowerMode, RefTap, ReferenceBase,
        ReferenceDivider, Terminal,
    },
    gpio::{Function, PinId, Port},
    sequence::ComparatorSetup,
};

/// MCLK after reset: DCO at 3 MHz.
pub const MCLK_HZ: u32 = 3_000_000;

/// Comparator settle time after turning it on, µs.
pub const SETTLE_US: u32 = 1_000;

/// Vcc across the ladder, both taps at 16/32.
pub const VREF_HALF_VCC: ReferenceDivider =
    ReferenceDivider::new(ReferenceBase::Vcc, RefTap::new(16), RefTap::new(16));

/// Reference on V+, Vcompare on V-: COUT goes low once Vcompare rises above the reference.
pub const COMP_CONFIG: CompConfig = CompConfig::new(
    Terminal::Vref,
    Terminal::Pin(Channel::C2),
    FilterDelay::Level4,
    OutputPolarity::NotInverted,
    PowerMode::HighSpeed,
);

/// P7.1, primary function: C0OUT.
pub const COUT_PIN: PinId = PinId::new(Port::P7, 1);

/// P7.7, tertiary function: C0.2.
pub const VCOMPARE_PIN: PinId = PinId::new(Port::P7, 7);

/// COUT on P7.1, Vcompare on P7.7 (C0.2), compared against Vcc/2.
pub const SETUP: ComparatorSetup = ComparatorSetup::new(
    COUT_PIN,
    Function::Primary,
    VCOMPARE_PIN,
    Function::Tertiary,
    Channel::C2,
    COMP_CONFIG,
    VREF_HALF_VCC,
    SETTLE_US,
);
