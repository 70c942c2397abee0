// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Peripheral implementations for the TI Hercules TMS570 family.
//!
//! The crate covers the pieces needed to bring the chip out of reset: the
//! reset-cause dispatcher and `_c_int00` entry point, the Real-Time Interrupt
//! (RTI) timer, the digital (windowed) watchdog that lives inside the RTI
//! block, and the parts of the system and error signaling modules the
//! startup sequence reads.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod esm;
pub mod interrupt_service;
pub mod interrupts;
pub mod rti;
pub mod startup;
pub mod sys;

#[cfg(test)]
mod emu;

/// Register types used by the peripheral overlays.
///
/// On hardware these are the memory-mapped register types from the kernel.
/// Unit tests swap in emulated registers whose accesses are routed to
/// device models, so write-one-to-clear flags and key sequences behave as
/// they do on silicon.
mod registers {
    #[cfg(test)]
    pub(crate) use crate::emu::{ReadOnly, ReadWrite};
    #[cfg(not(test))]
    pub(crate) use kernel::utilities::registers::{ReadOnly, ReadWrite};
}
