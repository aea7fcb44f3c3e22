//! This module provides peripheral pin binding for the MSP432P4 GPIO ports: routing a pin to
//! one of its module functions (primary, secondary, tertiary) as an input or output.
//! Plain GPIO drive/read isn't needed here; the comparator drives its output pin in hardware.

use tock_registers::{
    interfaces::{Readable, Writeable},
    registers::{ReadOnly, ReadWrite},
};

use crate::{
    error::{Error, Result},
    traits::PinMux,
};

const PINS_PER_PORT: u8 = 8;

/// Bank base addresses: P1/P2, P3/P4, P5/P6, P7/P8, P9/P10 and PJ.
const GPIO_BANK_BASES: [usize; 6] = [
    0x4000_4C00,
    0x4000_4C20,
    0x4000_4C40,
    0x4000_4C60,
    0x4000_4C80,
    0x4000_4D20,
];

/// One 16-bit port bank (eg PA = P1 + P2). Each `[_; 2]` is indexed by byte lane: the odd
/// port is lane 0, the even port lane 1.
#[repr(C)]
pub struct GpioRegisters {
    pub input: [ReadOnly<u8>; 2],
    pub out: [ReadWrite<u8>; 2],
    pub dir: [ReadWrite<u8>; 2],
    pub ren: [ReadWrite<u8>; 2],
    pub ds: [ReadWrite<u8>; 2],
    pub sel0: [ReadWrite<u8>; 2],
    pub sel1: [ReadWrite<u8>; 2],
    pub iv1: ReadOnly<u16>,
    _reserved: [u8; 6],
    pub selc: [ReadWrite<u8>; 2],
    pub ies: [ReadWrite<u8>; 2],
    pub ie: [ReadWrite<u8>; 2],
    pub ifg: [ReadWrite<u8>; 2],
    pub iv2: ReadOnly<u16>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// GPIO port
pub enum Port {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
    P9,
    P10,
    PJ,
}

impl Port {
    /// Index into `GPIO_BANK_BASES`.
    const fn bank(&self) -> usize {
        match self {
            Self::P1 | Self::P2 => 0,
            Self::P3 | Self::P4 => 1,
            Self::P5 | Self::P6 => 2,
            Self::P7 | Self::P8 => 3,
            Self::P9 | Self::P10 => 4,
            Self::PJ => 5,
        }
    }

    /// Byte lane within the bank.
    const fn lane(&self) -> usize {
        match self {
            Self::P2 | Self::P4 | Self::P6 | Self::P8 | Self::P10 => 1,
            _ => 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A single pin, eg P7.1.
pub struct PinId {
    port: Port,
    pin: u8,
}

impl PinId {
    /// Create a pin identifier. Pin numbers are 0 through 7; in a `const` context an
    /// out-of-range pin fails the build.
    pub const fn new(port: Port, pin: u8) -> Self {
        assert!(pin < PINS_PER_PORT, "GPIO pin numbers are 0 through 7");
        Self { port, pin }
    }

    pub fn try_new(port: Port, pin: u8) -> Result<Self> {
        if pin >= PINS_PER_PORT {
            return Err(Error::PinOutOfRange(pin));
        }
        Ok(Self { port, pin })
    }

    pub const fn port(&self) -> Port {
        self.port
    }

    pub const fn pin(&self) -> u8 {
        self.pin
    }

    const fn mask(&self) -> u8 {
        1 << self.pin
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Module function selection. Values for `PxSEL1:PxSEL0`. Which peripheral signal each
/// function carries depends on the pin; see the device datasheet's pin function tables.
pub enum Function {
    /// Plain GPIO.
    Gpio,
    /// Primary module function. (P7.1: C0OUT)
    Primary,
    /// Secondary module function.
    Secondary,
    /// Tertiary module function. (P7.7: C0.2)
    Tertiary,
}

impl Function {
    const fn sel0(&self) -> bool {
        matches!(self, Self::Primary | Self::Tertiary)
    }

    const fn sel1(&self) -> bool {
        matches!(self, Self::Secondary | Self::Tertiary)
    }

    const fn from_sel(sel0: bool, sel1: bool) -> Self {
        match (sel1, sel0) {
            (false, false) => Self::Gpio,
            (false, true) => Self::Primary,
            (true, false) => Self::Secondary,
            (true, true) => Self::Tertiary,
        }
    }
}

fn set_bits(reg: &ReadWrite<u8>, mask: u8) {
    reg.set(reg.get() | mask);
}

fn clear_bits(reg: &ReadWrite<u8>, mask: u8) {
    reg.set(reg.get() & !mask);
}

/// The GPIO port banks.
pub struct Gpio<'a> {
    banks: [&'a GpioRegisters; 6],
}

impl Gpio<'static> {
    /// Access the device's port banks.
    pub fn new() -> Self {
        Self {
            banks: GPIO_BANK_BASES.map(|base| unsafe { &*(base as *const GpioRegisters) }),
        }
    }
}

impl<'a> Gpio<'a> {
    /// Use an arbitrary set of register blocks, in `P1/P2 .. P9/P10, PJ` order.
    pub fn from_registers(banks: [&'a GpioRegisters; 6]) -> Self {
        Self { banks }
    }

    fn regs(&self, port: Port) -> &GpioRegisters {
        self.banks[port.bank()]
    }

    /// The module function currently selected for a pin.
    pub fn function(&self, pin: PinId) -> Function {
        let regs = self.regs(pin.port);
        let lane = pin.port.lane();

        Function::from_sel(
            regs.sel0[lane].get() & pin.mask() != 0,
            regs.sel1[lane].get() & pin.mask() != 0,
        )
    }

    /// Is the pin's direction set to output?
    pub fn is_output(&self, pin: PinId) -> bool {
        let regs = self.regs(pin.port);
        regs.dir[pin.port.lane()].get() & pin.mask() != 0
    }

    /// Set direction, then `PxSEL0` and `PxSEL1`. The two select registers are written one
    /// after the other, so the pin passes through an intermediate function briefly.
    fn select(&self, pin: PinId, function: Function, output: bool) {
        let regs = self.regs(pin.port);
        let lane = pin.port.lane();
        let mask = pin.mask();

        if output {
            set_bits(&regs.dir[lane], mask);
        } else {
            clear_bits(&regs.dir[lane], mask);
        }

        if function.sel0() {
            set_bits(&regs.sel0[lane], mask);
        } else {
            clear_bits(&regs.sel0[lane], mask);
        }

        if function.sel1() {
            set_bits(&regs.sel1[lane], mask);
        } else {
            clear_bits(&regs.sel1[lane], mask);
        }
    }
}

impl PinMux for Gpio<'_> {
    fn set_as_peripheral_output(&mut self, pin: PinId, function: Function) {
        self.select(pin, function, true);
        debug!("GPIO: {} -> {}, output", pin, function);
    }

    fn set_as_peripheral_input(&mut self, pin: PinId, function: Function) {
        self.select(pin, function, false);
        debug!("GPIO: {} -> {}, input", pin, function);
    }
}
