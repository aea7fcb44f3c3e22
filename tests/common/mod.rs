//! Shared host-side fixtures: zero-initialised register blocks standing in for the device,
//! recording mocks for the platform services, and a behavioural model of the comparator's
//! analog stage.

#![allow(dead_code)]

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use msp432_comp::{
    comp::{Channel, CompE, CompERegisters, CEXCTL1, Terminal},
    gpio::{Function, GpioRegisters, PinId},
    traits::{HoldWatchdog, PinMux, Suspend},
    wdt::WdtRegisters,
};
use tock_registers::interfaces::{ReadWriteable, Readable};

/// Nominal supply used by the analog model, mV.
pub const SUPPLY_MV: u32 = 3_300;

/// Register blocks for every peripheral the arming sequence touches, all reset to zero.
pub struct Bench {
    pub comp: CompERegisters,
    pub wdt: WdtRegisters,
    pub gpio: [GpioRegisters; 6],
}

impl Bench {
    pub fn new() -> Self {
        unsafe { core::mem::zeroed() }
    }
}

/// The comparator registers the configuration lives in: CTL0 through CTL3, and INT.
pub fn comp_snapshot(regs: &CompERegisters) -> [u16; 5] {
    [
        regs.ctl0.get(),
        regs.ctl1.get(),
        regs.ctl2.get(),
        regs.ctl3.get(),
        regs.int.get(),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    WatchdogHeld,
    Output(PinId, Function),
    Input(PinId, Function),
    Delay { ns: u32 },
}

/// Shared, ordered record of the calls the mocks receive, each with the comparator registers
/// at the time of the call.
#[derive(Default)]
pub struct Log(RefCell<Vec<(Event, [u16; 5])>>);

impl Log {
    pub fn push(&self, event: Event, comp: &CompERegisters) {
        self.0.borrow_mut().push((event, comp_snapshot(comp)));
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().iter().map(|(event, _)| *event).collect()
    }

    pub fn entries(&self) -> Vec<(Event, [u16; 5])> {
        self.0.borrow().clone()
    }
}

pub struct MockWatchdog<'a> {
    pub comp: &'a CompERegisters,
    pub log: &'a Log,
}

impl HoldWatchdog for MockWatchdog<'_> {
    fn hold(&mut self) {
        self.log.push(Event::WatchdogHeld, self.comp);
    }
}

pub struct MockPins<'a> {
    pub comp: &'a CompERegisters,
    pub log: &'a Log,
}

impl PinMux for MockPins<'_> {
    fn set_as_peripheral_output(&mut self, pin: PinId, function: Function) {
        self.log.push(Event::Output(pin, function), self.comp);
    }

    fn set_as_peripheral_input(&mut self, pin: PinId, function: Function) {
        self.log.push(Event::Input(pin, function), self.comp);
    }
}

/// Records each delay, along with the comparator registers at the time it ran.
pub struct MockDelay<'a> {
    pub comp: &'a CompERegisters,
    pub log: Option<&'a Log>,
    pub calls: Vec<(u32, [u16; 5])>,
}

impl<'a> MockDelay<'a> {
    pub fn new(comp: &'a CompERegisters) -> Self {
        Self {
            comp,
            log: None,
            calls: Vec::new(),
        }
    }

    pub fn logged(comp: &'a CompERegisters, log: &'a Log) -> Self {
        Self {
            comp,
            log: Some(log),
            calls: Vec::new(),
        }
    }

    /// Total time delayed, ns.
    pub fn total_ns(&self) -> u64 {
        self.calls.iter().map(|(ns, _)| u64::from(*ns)).sum()
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push((ns, comp_snapshot(self.comp)));
        if let Some(log) = self.log {
            log.push(Event::Delay { ns }, self.comp);
        }
    }
}

/// Counts suspends, and checks the comparator registers haven't changed since it was
/// created. Panics after `limit` calls, which is the only way out of the idle loop.
pub struct MockSuspend<'a> {
    comp: &'a CompERegisters,
    expected: [u16; 5],
    pub calls: u32,
    limit: u32,
}

impl<'a> MockSuspend<'a> {
    pub fn new(comp: &'a CompERegisters, limit: u32) -> Self {
        Self {
            comp,
            expected: comp_snapshot(comp),
            calls: 0,
            limit,
        }
    }
}

impl Suspend for MockSuspend<'_> {
    fn suspend(&mut self) {
        assert_eq!(
            comp_snapshot(self.comp),
            self.expected,
            "comparator registers changed while idle"
        );

        self.calls += 1;
        if self.calls == self.limit {
            panic!("suspend limit reached");
        }
    }
}

/// Behavioural model of the comparator's analog stage. Evaluates the configured terminals
/// and reference, and writes the result to `CEOUT` the way the hardware would.
pub struct AnalogModel<'a> {
    regs: &'a CompERegisters,
    pub supply_mv: u32,
    /// Voltage on each input channel, mV.
    pub inputs_mv: [u32; 16],
}

impl<'a> AnalogModel<'a> {
    pub fn new(regs: &'a CompERegisters) -> Self {
        Self {
            regs,
            supply_mv: SUPPLY_MV,
            inputs_mv: [0; 16],
        }
    }

    fn terminal_mv(&self, terminal: Terminal, vref_mv: u32) -> u32 {
        match terminal {
            Terminal::Vref => vref_mv,
            Terminal::Pin(ch) => self.inputs_mv[ch as usize],
        }
    }

    /// Hold `channel` at `mv` for `ns`, then update `CEOUT`. A change that's stable for less
    /// than the filter delay doesn't reach the output.
    pub fn drive(&mut self, channel: Channel, mv: u32, ns: u32) {
        self.inputs_mv[channel as usize] = mv;

        let comp = CompE::from_registers(self.regs);
        if !comp.is_enabled() {
            return;
        }
        let (Some(cfg), Some(reference)) = (comp.config(), comp.reference()) else {
            return;
        };

        // The output state selects the active tap: CEREF1 while high, CEREF0 while low.
        let (lower_mv, upper_mv) = reference.threshold_mv(self.supply_mv);
        let vref_mv = if comp.output_level() { upper_mv } else { lower_mv };

        let plus = self.terminal_mv(cfg.positive(), vref_mv);
        let minus = self.terminal_mv(cfg.negative(), vref_mv);

        let mut level = plus > minus;
        if cfg.polarity() == msp432_comp::comp::OutputPolarity::Inverted {
            level = !level;
        }

        if level == comp.output_level() || ns < cfg.filter().nominal_delay_ns() {
            return;
        }

        if level {
            self.regs.ctl1.modify(CEXCTL1::CEOUT::SET);
        } else {
            self.regs.ctl1.modify(CEXCTL1::CEOUT::CLEAR);
        }
    }
}
