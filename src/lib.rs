//! Comparator firmware support for the MSP432P401: COMP_E0 compares an analog input on C0.2
//! (P7.7) against Vcc/2 and drives the result onto C0OUT (P7.1), while the CPU sleeps in LPM0.
//!
//! Register blocks are accessed through `tock-registers`. Each driver can also be built on
//! an arbitrary register block (`from_registers`), so everything other than the sleep and
//! delay instructions runs on a host.
//!
//! Logging uses `defmt`, with the `defmt` feature.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod macros;

pub mod comp;
pub mod config;
pub mod delay;
pub mod error;
pub mod gpio;
pub mod low_power;
pub mod sequence;
pub mod traits;
pub mod wdt;

pub use error::{Error, Result};
