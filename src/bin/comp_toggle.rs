//! COMP_E0 compares Vcompare (P7.7, C0.2) against Vcc/2. C0OUT (P7.1) is high while
//! Vcompare is below Vcc/2, and low above it. The CPU sleeps in LPM0 throughout.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_probe as _;

use msp432_comp::{
    comp::CompE,
    config::{MCLK_HZ, SETUP},
    delay::CycleDelay,
    gpio::Gpio,
    low_power::Lpm0,
    sequence,
    wdt::WdtA,
};

#[entry]
fn main() -> ! {
    let mut wdt = WdtA::new();
    let mut gpio = Gpio::new();
    let comp = CompE::new_comp_e0();
    let mut delay = CycleDelay::new(MCLK_HZ);

    sequence::arm(&SETUP, &mut wdt, &mut gpio, &comp, &mut delay);

    defmt::println!("Vcompare vs Vcc/2: COUT = {}", comp.output_level());

    sequence::idle(&mut Lpm0::new())
}

// same panicking *behavior* as `panic-probe` but doesn't print a panic message
// this prevents the panic message being printed *twice* when `defmt::panic` is invoked
#[defmt::panic_handler]
fn panic() -> ! {
    cortex_m::asm::udf()
}
