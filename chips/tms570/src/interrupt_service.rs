// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

use kernel::platform::chip::InterruptService;

use crate::esm::{self, Esm};
use crate::interrupts;
use crate::rti::{self, dwd::Dwd, Rti};
use crate::startup::ResetHandler;
use crate::sys::{self, SystemModule};

pub struct Tms570DefaultPeripherals<'a> {
    pub rti: Rti<'a>,
    pub dwd: Dwd,
    pub esm: Esm,
    pub system: SystemModule,
}

impl<'a> Tms570DefaultPeripherals<'a> {
    pub const fn new() -> Self {
        Self {
            rti: Rti::new(rti::RTI_BASE),
            dwd: Dwd::new(rti::RTI_BASE),
            esm: Esm::new(esm::ESM_BASE),
            system: SystemModule::new(sys::SYS1_BASE),
        }
    }

    pub fn reset_handler(&self) -> ResetHandler<'_> {
        ResetHandler::new(&self.system, &self.esm, &self.dwd)
    }
}

impl InterruptService for Tms570DefaultPeripherals<'_> {
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool {
        match interrupt {
            interrupts::RTI_COMPARE0..=interrupts::RTI_TIMEBASE => {
                self.rti.handle_interrupt();
                true
            }
            _ => false,
        }
    }
}
