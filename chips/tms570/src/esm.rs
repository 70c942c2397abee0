// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Error Signaling Module (ESM).

use kernel::utilities::registers::interfaces::Readable;
use kernel::utilities::registers::register_structs;
use kernel::utilities::StaticRef;

use crate::registers::{ReadOnly, ReadWrite};

register_structs! {
    pub EsmRegisters {
        /// Group 1 error pin action enable set
        (0x00 => eepapr1: ReadWrite<u32>),
        /// Group 1 error pin action enable clear
        (0x04 => depapr1: ReadWrite<u32>),
        /// Group 1 interrupt enable set
        (0x08 => iesr1: ReadWrite<u32>),
        /// Group 1 interrupt enable clear
        (0x0C => iecr1: ReadWrite<u32>),
        /// Group 1 interrupt level set
        (0x10 => ilsr1: ReadWrite<u32>),
        /// Group 1 interrupt level clear
        (0x14 => ilcr1: ReadWrite<u32>),
        /// Status of groups 1, 2 and 3, write one to clear
        (0x18 => sr1: [ReadWrite<u32>; 3]),
        /// Error pin status
        (0x24 => epsr: ReadOnly<u32>),
        (0x28 => @END),
    }
}

pub const ESM_BASE: StaticRef<EsmRegisters> =
    unsafe { StaticRef::new(0xFFFF_F500 as *const EsmRegisters) };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EsmGroup {
    Group1 = 0,
    Group2 = 1,
    /// Errors from the CPU and RAM/flash interfaces that are latched before
    /// software runs.
    Group3 = 2,
}

pub struct Esm {
    registers: StaticRef<EsmRegisters>,
}

impl Esm {
    pub const fn new(base: StaticRef<EsmRegisters>) -> Esm {
        Esm { registers: base }
    }

    pub fn status(&self, group: EsmGroup) -> u32 {
        self.registers.sr1[group as usize].get()
    }

    /// Whether any group 3 error is latched.
    pub fn group3_error(&self) -> bool {
        self.status(EsmGroup::Group3) != 0
    }
}
