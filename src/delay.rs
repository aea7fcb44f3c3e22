//! Blocking delays, by counting CPU cycles. Thin wrapper of `cortex_m::asm::delay`.

use cfg_if::cfg_if;
use embedded_hal::delay::DelayNs;

/// Busy-wait delay provider, calibrated to the MCLK frequency.
pub struct CycleDelay {
    mclk_hz: u32,
}

impl CycleDelay {
    pub const fn new(mclk_hz: u32) -> Self {
        Self { mclk_hz }
    }

    /// Number of MCLK cycles covering at least `ns`.
    pub const fn cycles_for_ns(&self, ns: u32) -> u32 {
        (self.mclk_hz as u64 * ns as u64).div_ceil(1_000_000_000) as u32
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = self.cycles_for_ns(ns);

        cfg_if! {
            if #[cfg(cortex_m_target)] {
                cortex_m::asm::delay(cycles);
            } else {
                for _ in 0..cycles {
                    core::hint::spin_loop();
                }
            }
        }
    }
}
