// Traits for the platform services the arming sequence relies on. The MSP432 implementations
// live in `gpio`, `wdt` and `low_power`; tests substitute their own.

use crate::gpio::{Function, PinId};

/// Pin multiplexing: assign a pin to a peripheral module function.
pub trait PinMux {
    /// Route `pin` to `function`, as an output. Used for peripheral-driven pins, eg COUT.
    fn set_as_peripheral_output(&mut self, pin: PinId, function: Function);

    /// Route `pin` to `function`, as an input. Used for analog inputs, eg C0.x.
    fn set_as_peripheral_input(&mut self, pin: PinId, function: Function);
}

/// Stops the watchdog timer from resetting the system.
pub trait HoldWatchdog {
    fn hold(&mut self);
}

/// Suspends the CPU until the next enabled interrupt or event. This may return immediately,
/// eg if a wake event is already pending.
pub trait Suspend {
    fn suspend(&mut self);
}
