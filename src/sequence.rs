//! The comparator arming sequence, and the idle loop that follows it.
//!
//! After [`arm`] returns, the comparator drives its output pin in hardware; the CPU has
//! nothing left to do, so [`idle`] parks it in a low power mode for good.

use embedded_hal::delay::DelayNs;

use crate::{
    comp::{Channel, CompConfig, CompE, ReferenceDivider, Terminal},
    gpio::{Function, PinId},
    traits::{HoldWatchdog, PinMux, Suspend},
};

/// Everything the arming sequence needs, fixed at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComparatorSetup {
    output_pin: PinId,
    output_function: Function,
    input_pin: PinId,
    input_function: Function,
    input_channel: Channel,
    config: CompConfig,
    reference: ReferenceDivider,
    settle_us: u32,
}

const fn is_channel(terminal: Terminal, channel: Channel) -> bool {
    matches!(terminal, Terminal::Pin(c) if c as u8 == channel as u8)
}

const fn routes_channel(config: &CompConfig, channel: Channel) -> bool {
    is_channel(config.positive(), channel) || is_channel(config.negative(), channel)
}

impl ComparatorSetup {
    /// `input_channel` is the channel carried by `input_pin`; `config` must route it to one of
    /// the terminals.
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        output_pin: PinId,
        output_function: Function,
        input_pin: PinId,
        input_function: Function,
        input_channel: Channel,
        config: CompConfig,
        reference: ReferenceDivider,
        settle_us: u32,
    ) -> Self {
        assert!(
            routes_channel(&config, input_channel),
            "the input channel isn't routed to a comparator terminal"
        );

        Self {
            output_pin,
            output_function,
            input_pin,
            input_function,
            input_channel,
            config,
            reference,
            settle_us,
        }
    }

    pub const fn output_pin(&self) -> PinId {
        self.output_pin
    }

    pub const fn input_pin(&self) -> PinId {
        self.input_pin
    }

    pub const fn input_channel(&self) -> Channel {
        self.input_channel
    }

    pub const fn config(&self) -> &CompConfig {
        &self.config
    }

    pub const fn reference(&self) -> &ReferenceDivider {
        &self.reference
    }

    /// Time allowed for the comparator's analog stage to settle after it's turned on, in µs.
    pub const fn settle_us(&self) -> u32 {
        self.settle_us
    }
}

/// Hold the watchdog, bind the pins, then configure, enable and settle the comparator.
///
/// On return the comparator is on, and its output is valid.
pub fn arm(
    setup: &ComparatorSetup,
    wdt: &mut impl HoldWatchdog,
    pins: &mut impl PinMux,
    comp: &CompE,
    delay: &mut impl DelayNs,
) {
    wdt.hold();

    pins.set_as_peripheral_output(setup.output_pin, setup.output_function);
    pins.set_as_peripheral_input(setup.input_pin, setup.input_function);

    comp.init(&setup.config);
    comp.set_reference_voltage(&setup.reference);
    comp.disable_input_buffer(setup.input_channel);

    comp.enable();
    delay.delay_us(setup.settle_us);

    info!("Comparator armed");
}

/// Suspend the CPU, forever. Wake-ups (from whatever the platform has enabled) just lead
/// back to the next suspend.
pub fn idle(suspend: &mut impl Suspend) -> ! {
    loop {
        suspend.suspend();
    }
}
