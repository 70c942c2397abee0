// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Reset entry point and reset-cause dispatch.
//!
//! `_c_int00` is the first Rust code to run after a reset. It reads the
//! system exception status once, classifies why the chip reset, does the
//! minimum bring-up that cause needs, checks that no group 3 error was
//! latched during boot, and then initializes clocks.
//!
//! Auto-initializing CPU RAM zeroes the stack, so it cannot run below a Rust
//! frame. `_c_int00` is therefore written in assembly: it keeps its return
//! address in `r11`, calls the Rust dispatch, and once that has returned runs
//! the RAM auto-initialization and enables RAM ECC without touching the stack.
//!
//! Two conditions are fatal: the PLLs not locking after [`PLL_RETRIES`]
//! attempts, and a latched group 3 error. Both end in [`fail_safe`], which
//! never returns.

use kernel::config::CONFIG;
use kernel::debug;
use kernel::utilities::cells::OptionalCell;
use kernel::utilities::registers::LocalRegisterCopy;
use kernel::ErrorCode;

use crate::esm::Esm;
use crate::rti::dwd::{Dwd, Violation};
use crate::sys::{SystemModule, SYSESR};

/// Attempts the PLL errata routine gets to lock both PLLs.
pub const PLL_RETRIES: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetCause {
    PowerOn,
    OscillatorFailure,
    /// Watchdog violation or a system reset requested by the debugger.
    Watchdog,
    Cpu,
    Software,
    External,
}

impl ResetCause {
    /// The hardware can latch several sources at once; the first one set in
    /// the order power-on, oscillator, watchdog, CPU, software wins, and
    /// anything else is an external reset.
    pub fn classify(status: LocalRegisterCopy<u32, SYSESR::Register>) -> ResetCause {
        if status.is_set(SYSESR::PORST) {
            ResetCause::PowerOn
        } else if status.is_set(SYSESR::OSCRST) {
            ResetCause::OscillatorFailure
        } else if status.is_set(SYSESR::WDRST) {
            ResetCause::Watchdog
        } else if status.is_set(SYSESR::CPURST) {
            ResetCause::Cpu
        } else if status.is_set(SYSESR::SWRST) {
            ResetCause::Software
        } else {
            ResetCause::External
        }
    }
}

/// Unrecoverable startup conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailSafe {
    /// The PLLs did not lock; the clock cannot be trusted.
    PllLockFailure,
    /// A group 3 ESM error was latched during boot.
    StartupIntegrityFault,
}

/// Hardware bring-up steps the reset handler sequences.
pub trait BringUp {
    fn enable_event_bus_export(&self);
    fn apply_core_errata(&self);
    /// Runs the PLL lock routine with up to `retries` attempts.
    fn lock_plls(&self, retries: u32) -> Result<(), ErrorCode>;
    /// Clocks, flash wait states and pin multiplexing.
    fn system_init(&self);
}

/// Extension points for the non-fatal reset causes.
///
/// Every hook defaults to doing nothing. Hooks run after the cause's own
/// status flag handling and before the integrity check.
pub trait ResetClient {
    fn oscillator_failure(&self) {}
    /// A real watchdog violation, as opposed to a debugger reset.
    fn watchdog_violation(&self, _violation: Violation) {}
    fn debugger_reset(&self) {}
    fn cpu_reset(&self) {}
    fn software_reset(&self) {}
    fn external_reset(&self) {}
}

pub struct ResetHandler<'a> {
    system: &'a SystemModule,
    esm: &'a Esm,
    dwd: &'a Dwd,
    client: OptionalCell<&'a dyn ResetClient>,
}

impl<'a> ResetHandler<'a> {
    pub fn new(system: &'a SystemModule, esm: &'a Esm, dwd: &'a Dwd) -> ResetHandler<'a> {
        ResetHandler {
            system,
            esm,
            dwd,
            client: OptionalCell::empty(),
        }
    }

    pub fn set_client(&self, client: &'a dyn ResetClient) {
        self.client.set(client);
    }

    fn notify(&self, f: impl FnOnce(&dyn ResetClient)) {
        self.client.map(f);
    }

    /// Runs the reset dispatch and bring-up up to clock initialization.
    /// Returns the classified cause, or the fail-safe condition the caller
    /// must not continue past.
    ///
    /// CPU RAM is left alone; the caller initializes it once no frame on the
    /// stack is live anymore.
    pub fn handle<B: BringUp>(&self, bring_up: &B) -> Result<ResetCause, FailSafe> {
        bring_up.enable_event_bus_export();
        bring_up.apply_core_errata();

        let cause = ResetCause::classify(self.system.reset_status());
        if CONFIG.debug_startup {
            debug!("startup: reset cause {:?}", cause);
        }

        match cause {
            ResetCause::PowerOn => {
                if bring_up.lock_plls(PLL_RETRIES).is_err() {
                    return Err(FailSafe::PllLockFailure);
                }
                self.system.clear_all_reset_status();
            }
            ResetCause::OscillatorFailure => {
                self.notify(|client| client.oscillator_failure());
            }
            ResetCause::Watchdog => {
                if self.dwd.has_latched_status() {
                    let violation = self.dwd.violation_status();
                    self.system.clear_reset_status(SYSESR::WDRST::SET);
                    self.notify(|client| client.watchdog_violation(violation));
                } else {
                    self.system.clear_reset_status(SYSESR::WDRST::SET);
                    self.notify(|client| client.debugger_reset());
                }
            }
            ResetCause::Cpu => {
                self.system.clear_reset_status(SYSESR::CPURST::SET);
                self.notify(|client| client.cpu_reset());
            }
            ResetCause::Software => {
                self.notify(|client| client.software_reset());
            }
            ResetCause::External => {
                self.notify(|client| client.external_reset());
            }
        }

        if self.esm.group3_error() {
            return Err(FailSafe::StartupIntegrityFault);
        }

        bring_up.system_init();

        Ok(cause)
    }
}

/// Terminal state for unrecoverable startup conditions.
pub fn fail_safe(reason: FailSafe) -> ! {
    if CONFIG.debug_startup {
        debug!("startup: fail-safe, {:?}", reason);
    }
    cortexr4::support::halt()
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
#[allow(non_snake_case)]
extern "C" {
    /// Vendor PLL lock workaround. Returns 0 once both PLLs locked.
    fn _errata_SSWF021_45_both_plls(count: u32) -> u32;
    /// Vendor clock, flash and pin multiplexing setup.
    fn systemInit();
}

/// The on-chip implementation of [`BringUp`].
pub struct Tms570BringUp;

impl BringUp for Tms570BringUp {
    fn enable_event_bus_export(&self) {
        unsafe { cortexr4::cp15::enable_event_bus_export() }
    }

    fn apply_core_errata(&self) {
        unsafe {
            cortexr4::cp15::errata_66();
            cortexr4::cp15::errata_57();
        }
    }

    #[cfg(all(target_arch = "arm", target_os = "none"))]
    fn lock_plls(&self, retries: u32) -> Result<(), ErrorCode> {
        if unsafe { _errata_SSWF021_45_both_plls(retries) } == 0 {
            Ok(())
        } else {
            Err(ErrorCode::FAIL)
        }
    }

    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    fn lock_plls(&self, _retries: u32) -> Result<(), ErrorCode> {
        unimplemented!()
    }

    #[cfg(all(target_arch = "arm", target_os = "none"))]
    fn system_init(&self) {
        unsafe { systemInit() }
    }

    #[cfg(not(all(target_arch = "arm", target_os = "none")))]
    fn system_init(&self) {
        unimplemented!()
    }
}

/// Everything `_c_int00` does while the stack is still usable. Never returns
/// on a fail-safe condition.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[no_mangle]
unsafe extern "C" fn tms570_reset_dispatch() {
    let peripherals = crate::interrupt_service::Tms570DefaultPeripherals::new();
    let handler = peripherals.reset_handler();
    if let Err(reason) = handler.handle(&Tms570BringUp) {
        fail_safe(reason);
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
extern "C" {
    /// Reset entry, called from the reset vector with a valid stack. Returns
    /// to its caller with CPU RAM zeroed and RAM ECC checking enabled.
    pub fn _c_int00();
}

// SYS1 MINITGCR = 0xFFFFFF5C, MSIENA = 0xFFFFFF60, MSTCGSTAT = 0xFFFFFF68.
// Only r0-r3, r11 and lr are used past the dispatch call: the stack is
// zeroed by the RAM initialization and must not be read again.
#[cfg(all(target_arch = "arm", target_os = "none"))]
core::arch::global_asm!(
    "
    .section .text._c_int00, \"ax\"
    .global _c_int00
    .type _c_int00, %function
    .arm
  _c_int00:
    mov r11, lr                       // r11 is callee-saved across the dispatch

    bl tms570_reset_dispatch

    ldr r0, =0xFFFFFF5C               // r0 = &MINITGCR
    mov r1, #0xA
    str r1, [r0]                      // MINITGCR = enable
    mov r1, #1                        // CPU_RAM
    str r1, [r0, #4]                  // MSIENA = CPU_RAM
  100: // wait_minidone
    ldr r2, [r0, #0xC]                // r2 = MSTCGSTAT
    tst r2, #0x100                    // MINIDONE
    beq 100b
    mov r1, #0x5
    str r1, [r0]                      // MINITGCR = disable

    bl cortexr4_enable_ram_ecc

    bx r11
    "
);
