// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! System module, primary frame (SYS1).
//!
//! Only the reset source status and the RAM auto-initialization registers
//! are described; the rest of the frame is configured by the clock and pin
//! setup that runs later in startup.

use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{
    register_bitfields, register_structs, FieldValue, LocalRegisterCopy,
};
use kernel::utilities::StaticRef;

use crate::registers::ReadWrite;

register_structs! {
    pub SystemRegisters {
        (0x00 => _reserved0),
        /// Memory hardware initialization global control
        (0x5C => minitgcr: ReadWrite<u32, MINITGCR::Register>),
        /// Memory self-test / initialization enable, one bit per RAM
        (0x60 => msiena: ReadWrite<u32>),
        /// Memory self-test failure status
        (0x64 => mstfail: ReadWrite<u32>),
        /// MSTC global status
        (0x68 => mstcgstat: ReadWrite<u32, MSTCGSTAT::Register>),
        /// Memory hardware initialization status
        (0x6C => ministat: ReadWrite<u32>),
        (0x70 => _reserved1),
        /// System exception status, write one to clear
        (0xE4 => sysesr: ReadWrite<u32, SYSESR::Register>),
        (0xE8 => @END),
    }
}

register_bitfields![u32,
    MINITGCR [
        MINITGCR OFFSET(0) NUMBITS(4) [
            Enable = 0xA,
            Disable = 0x5
        ]
    ],
    MSTCGSTAT [
        MSTDONE OFFSET(0) NUMBITS(1) [],
        /// Hardware memory initialization complete
        MINIDONE OFFSET(8) NUMBITS(1) []
    ],
    pub SYSESR [
        /// External reset
        EXTRST OFFSET(3) NUMBITS(1) [],
        /// Software reset
        SWRST OFFSET(4) NUMBITS(1) [],
        /// CPU reset
        CPURST OFFSET(5) NUMBITS(1) [],
        /// Watchdog or debugger (ICEPICK) reset
        WDRST OFFSET(13) NUMBITS(1) [],
        /// Oscillator failure or PLL slip
        OSCRST OFFSET(14) NUMBITS(1) [],
        /// Power-on reset
        PORST OFFSET(15) NUMBITS(1) []
    ]
];

pub const SYS1_BASE: StaticRef<SystemRegisters> =
    unsafe { StaticRef::new(0xFFFF_FF00 as *const SystemRegisters) };

/// Every reset source flag, as cleared after a power-on reset.
pub const RESET_STATUS_ALL: u32 = 0xFFFF;

/// `MSIENA` bit selecting the CPU data RAM.
pub const CPU_RAM: u32 = 1 << 0;

pub struct SystemModule {
    registers: StaticRef<SystemRegisters>,
}

impl SystemModule {
    pub const fn new(base: StaticRef<SystemRegisters>) -> SystemModule {
        SystemModule { registers: base }
    }

    pub fn reset_status(&self) -> LocalRegisterCopy<u32, SYSESR::Register> {
        self.registers.sysesr.extract()
    }

    /// Clears the given reset source flags.
    pub fn clear_reset_status(&self, flags: FieldValue<u32, SYSESR::Register>) {
        self.registers.sysesr.write(flags);
    }

    pub fn clear_all_reset_status(&self) {
        self.registers.sysesr.set(RESET_STATUS_ALL);
    }

    /// Runs the hardware auto-initialization of the RAMs in `ram_mask` and
    /// blocks until it completes.
    ///
    /// The selected RAMs are zeroed, so none of them may hold the caller's
    /// stack. CPU RAM is initialized by `_c_int00` instead.
    pub fn memory_init(&self, ram_mask: u32) {
        let regs = self.registers;
        regs.minitgcr.write(MINITGCR::MINITGCR::Enable);
        regs.msiena.set(ram_mask);
        while !regs.mstcgstat.is_set(MSTCGSTAT::MINIDONE) {}
        regs.minitgcr.write(MINITGCR::MINITGCR::Disable);
    }
}
