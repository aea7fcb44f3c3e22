//! This module contains code used to place the MCU in low power modes, through the Power
//! Control Manager (PCM).
//! Reference: MSP432P4xx TRM, chapter 7: `Power Control Manager`.

use cfg_if::cfg_if;
use tock_registers::{
    interfaces::Readable,
    register_bitfields,
    registers::{ReadOnly, ReadWrite},
};

use crate::{
    error::{Error, Result},
    traits::Suspend,
};

const PCM_BASE: usize = 0x4001_0000;

register_bitfields![u32,
    pub PCMCTL0 [
        // active mode request
        AMR OFFSET(0) NUMBITS(4) [],
        // low power mode request
        LPMR OFFSET(4) NUMBITS(4) [],
        // current power mode
        CPM OFFSET(8) NUMBITS(6) [],
        PCMKEY OFFSET(16) NUMBITS(16) []
    ],
    pub PCMCTL1 [
        LOCKLPM5 OFFSET(0) NUMBITS(1) [],
        LOCKBKUP OFFSET(1) NUMBITS(1) [],
        FORCE_LPM_ENTRY OFFSET(2) NUMBITS(1) [],
        // a power mode transition is in progress
        PMR_BUSY OFFSET(8) NUMBITS(1) [],
        PCMKEY OFFSET(16) NUMBITS(16) []
    ]
];

#[repr(C)]
pub struct PcmRegisters {
    pub ctl0: ReadWrite<u32, PCMCTL0::Register>,
    pub ctl1: ReadWrite<u32, PCMCTL1::Register>,
    pub ie: ReadWrite<u32>,
    pub ifg: ReadOnly<u32>,
    pub clrifg: ReadWrite<u32>,
}

/// LPM0: the CPU stops, while clocks and peripherals (including the comparator) keep running.
/// Any enabled interrupt wakes it.
pub struct Lpm0<'a> {
    regs: &'a PcmRegisters,
}

impl Lpm0<'static> {
    pub fn new() -> Self {
        Self {
            regs: unsafe { &*(PCM_BASE as *const PcmRegisters) },
        }
    }
}

impl<'a> Lpm0<'a> {
    pub fn from_registers(regs: &'a PcmRegisters) -> Self {
        Self { regs }
    }

    /// Enter LPM0, returning after wake-up. Fails without sleeping if the PCM is still
    /// completing a previous power mode transition.
    pub fn goto_lpm0(&mut self) -> Result<()> {
        if self.regs.ctl1.is_set(PCMCTL1::PMR_BUSY) {
            return Err(Error::PowerTransitionBusy);
        }

        cfg_if! {
            if #[cfg(cortex_m_target)] {
                // SLEEPDEEP = 0 selects sleep (LPM0) rather than deep sleep on `wfi`.
                let mut scb = unsafe { cortex_m::Peripherals::steal().SCB };
                scb.clear_sleepdeep();
                cortex_m::asm::wfi();
            } else {
                core::hint::spin_loop();
            }
        }

        Ok(())
    }
}

impl Suspend for Lpm0<'_> {
    fn suspend(&mut self) {
        if let Err(e) = self.goto_lpm0() {
            warn!("LPM0 entry skipped: {}", e);
        }
    }
}
