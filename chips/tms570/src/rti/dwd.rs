// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Digital windowed watchdog (DWD / DWWD).
//!
//! Once enabled the watchdog cannot be disabled again until the next system
//! reset. It is serviced by writing the two-word key sequence; any other
//! value latches a key violation. With a window smaller than 100% a service
//! is only valid during the last part of the expiration period, and the
//! configured reaction (reset or NMI) is taken on a violation.

use kernel::config::CONFIG;
use kernel::debug;
use kernel::hil;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{FieldValue, LocalRegisterCopy};
use kernel::utilities::StaticRef;

use super::{RtiRegisters, DWDCTRL, WDKEY, WDSTATUS, WWDRXNCTRL, WWDSIZECTRL};

/// Written to `WDSTATUS` to clear every latched flag.
const STATUS_CLEAR_ALL: u32 = 0xFF;

/// What the watchdog does on a window or key violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    Reset,
    Nmi,
}

impl From<Reaction> for FieldValue<u32, WWDRXNCTRL::Register> {
    fn from(reaction: Reaction) -> Self {
        match reaction {
            Reaction::Reset => WWDRXNCTRL::WWDRXN::Reset,
            Reaction::Nmi => WWDRXNCTRL::WWDRXN::Nmi,
        }
    }
}

/// Share of the expiration period, at its end, during which a service is
/// accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowSize {
    Size100Percent,
    Size50Percent,
    Size25Percent,
    Size12_5Percent,
    Size6_25Percent,
    Size3_125Percent,
}

impl From<WindowSize> for FieldValue<u32, WWDSIZECTRL::Register> {
    fn from(size: WindowSize) -> Self {
        match size {
            WindowSize::Size100Percent => WWDSIZECTRL::WWDSIZE::Size100Percent,
            WindowSize::Size50Percent => WWDSIZECTRL::WWDSIZE::Size50Percent,
            WindowSize::Size25Percent => WWDSIZECTRL::WWDSIZE::Size25Percent,
            WindowSize::Size12_5Percent => WWDSIZECTRL::WWDSIZE::Size12_5Percent,
            WindowSize::Size6_25Percent => WWDSIZECTRL::WWDSIZE::Size6_25Percent,
            WindowSize::Size3_125Percent => WWDSIZECTRL::WWDSIZE::Size3_125Percent,
        }
    }
}

/// The most significant latched watchdog violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    NoViolation,
    KeySequence,
    StartTimeWindow,
    EndTimeWindow,
    TimeWindow,
}

impl Violation {
    /// Key sequence first, then start-time, end-time, and generic time
    /// window violations.
    pub fn from_status(status: LocalRegisterCopy<u32, WDSTATUS::Register>) -> Violation {
        if status.is_set(WDSTATUS::KEY_ST) {
            Violation::KeySequence
        } else if status.is_set(WDSTATUS::START_TIME_VIOL) {
            Violation::StartTimeWindow
        } else if status.is_set(WDSTATUS::END_TIME_VIOL) {
            Violation::EndTimeWindow
        } else if status.is_set(WDSTATUS::TIME_WINDOW_VIOL) {
            Violation::TimeWindow
        } else {
            Violation::NoViolation
        }
    }
}

pub struct Dwd {
    registers: StaticRef<RtiRegisters>,
}

impl Dwd {
    pub const fn new(base: StaticRef<RtiRegisters>) -> Dwd {
        Dwd { registers: base }
    }

    /// Clears the status flags and sets the expiration period.
    ///
    /// The watchdog keeps running whatever window and reaction it has.
    pub fn init(&self, preload: u16) {
        self.registers.wdstatus.set(STATUS_CLEAR_ALL);
        self.set_preload(preload);
    }

    pub fn init_windowed(&self, reaction: Reaction, preload: u16, window: WindowSize) {
        let regs = self.registers;
        regs.wdstatus.set(STATUS_CLEAR_ALL);
        regs.wwdsizectrl.write(window.into());
        self.set_preload(preload);
        regs.wwdrxnctrl.write(reaction.into());
    }

    /// Arms the watchdog. There is no way back short of a system reset.
    pub fn enable(&self) {
        self.registers.dwdctrl.write(DWDCTRL::DWDCTRL::Enable);
    }

    pub fn is_enabled(&self) -> bool {
        self.registers.dwdctrl.matches_all(DWDCTRL::DWDCTRL::Enable)
    }

    /// Expiration period is `(preload + 1) * 2^13` RTICLK cycles. Only the
    /// low 12 bits are used, and the hardware ignores the write while the
    /// watchdog is enabled.
    pub fn set_preload(&self, preload: u16) {
        self.registers.dwdprld.set(u32::from(preload));
    }

    pub fn service(&self) {
        self.registers.wdkey.write(WDKEY::WDKEY::Prime);
        self.registers.wdkey.write(WDKEY::WDKEY::Service);
    }

    /// Forces a watchdog system reset.
    pub fn generate_system_reset(&self) {
        self.registers.wdkey.write(WDKEY::WDKEY::Prime);
        self.registers.wdkey.write(WDKEY::WDKEY::Reset);
    }

    pub fn key_sequence_correct(&self) -> bool {
        !self.registers.wdstatus.is_set(WDSTATUS::KEY_ST)
    }

    /// Whether the watchdog generated the last reset.
    pub fn reset_generated(&self) -> bool {
        self.registers.wdstatus.is_set(WDSTATUS::DWD_ST)
    }

    pub fn down_counter(&self) -> u32 {
        self.registers.dwdcntr.get()
    }

    pub fn violation_status(&self) -> Violation {
        let violation = Violation::from_status(self.registers.wdstatus.extract());
        if CONFIG.debug_rti && violation != Violation::NoViolation {
            debug!("dwd: latched {:?}", violation);
        }
        violation
    }

    /// Whether any status flag is latched, including a watchdog reset.
    pub fn has_latched_status(&self) -> bool {
        self.registers.wdstatus.get() != 0
    }

    pub fn clear_flags(&self) {
        self.registers.wdstatus.set(STATUS_CLEAR_ALL);
    }
}

impl hil::watchdog::WatchDog for Dwd {
    fn setup(&self) {
        self.enable();
    }

    fn tickle(&self) {
        self.service();
    }

    // The armed watchdog cannot be stopped.
    fn suspend(&self) {}
}
