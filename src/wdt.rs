//! Watchdog timer (WDT_A)
//!
//! The watchdog runs from reset. Firmware that doesn't service it must hold it before doing
//! anything else.

use tock_registers::{
    interfaces::{ReadWriteable, Readable},
    register_bitfields,
    registers::ReadWrite,
};

use crate::traits::HoldWatchdog;

const WDT_A_BASE: usize = 0x4000_4800;

/// Must be in the upper byte of every `WDTCTL` write; any other value triggers a reset.
const WDT_PASSWORD: u16 = 0x5a;

register_bitfields![u16,
    pub WDTCTL [
        // interval select
        WDTIS OFFSET(0) NUMBITS(3) [],
        // counter clear
        WDTCNTCL OFFSET(3) NUMBITS(1) [],
        // mode select: watchdog or interval timer
        WDTTMSEL OFFSET(4) NUMBITS(1) [],
        // clock source select
        WDTSSEL OFFSET(5) NUMBITS(2) [],
        WDTHOLD OFFSET(7) NUMBITS(1) [],
        // password. Reads as 0x69.
        WDTPW OFFSET(8) NUMBITS(8) []
    ]
];

#[repr(C)]
pub struct WdtRegisters {
    _reserved: [u16; 6],
    pub ctl: ReadWrite<u16, WDTCTL::Register>,
}

pub struct WdtA<'a> {
    regs: &'a WdtRegisters,
}

impl WdtA<'static> {
    pub fn new() -> Self {
        Self {
            regs: unsafe { &*(WDT_A_BASE as *const WdtRegisters) },
        }
    }
}

impl<'a> WdtA<'a> {
    pub fn from_registers(regs: &'a WdtRegisters) -> Self {
        Self { regs }
    }

    /// Is the watchdog counter stopped?
    pub fn is_held(&self) -> bool {
        self.regs.ctl.is_set(WDTCTL::WDTHOLD)
    }
}

impl HoldWatchdog for WdtA<'_> {
    /// Stop the counter. Interval, clock source and mode settings are kept.
    fn hold(&mut self) {
        self.regs
            .ctl
            .modify(WDTCTL::WDTPW.val(WDT_PASSWORD) + WDTCTL::WDTHOLD::SET);

        debug!("WDT_A: held");
    }
}
