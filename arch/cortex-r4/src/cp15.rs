// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! CP15 system-control sequences used while bringing up the core.
//!
//! Each routine is a read-modify-write of one CP15 register, run once from the
//! reset handler in privileged mode. Enabling RAM ECC happens after CPU RAM
//! has been auto-initialized, when the stack no longer holds anything, so
//! that one is an assembly leaf which uses no stack at all.

/// PMCR.X: export PMU events, which carries the ECC error events for flash
/// and TCM accesses out to the ESM.
pub const PMCR_EXPORT_EVENTS: u32 = 1 << 4;

/// ACTLR.B1TCMPCEN | ACTLR.B0TCMPCEN: ECC checking on both data TCM ports.
pub const ACTLR_TCM_ECC: u32 = 0b11 << 26;

/// ACTLR bit set by the Cortex-R4 erratum 66 workaround.
pub const ACTLR_ERRATUM_66: u32 = 1 << 7;

/// Secondary auxiliary control bit set by the Cortex-R4 erratum 57
/// workaround.
pub const SACTLR_ERRATUM_57: u32 = 1 << 16;

#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
mod imp {
    use core::arch::asm;

    pub(super) unsafe fn pmcr_set(bits: u32) {
        let mut value: u32;
        asm!("mrc p15, 0, {0}, c9, c12, 0", out(reg) value, options(nomem, nostack));
        value |= bits;
        asm!("mcr p15, 0, {0}, c9, c12, 0", in(reg) value, options(nomem, nostack));
    }

    pub(super) unsafe fn actlr_set(bits: u32) {
        let mut value: u32;
        asm!("mrc p15, 0, {0}, c1, c0, 1", out(reg) value, options(nomem, nostack));
        value |= bits;
        asm!("mcr p15, 0, {0}, c1, c0, 1", in(reg) value, options(nomem, nostack));
    }

    pub(super) unsafe fn sactlr_set(bits: u32) {
        let mut value: u32;
        asm!("mrc p15, 0, {0}, c15, c0, 0", out(reg) value, options(nomem, nostack));
        value |= bits;
        asm!("mcr p15, 0, {0}, c15, c0, 0", in(reg) value, options(nomem, nostack));
    }
}

// Mock implementations for host builds.
#[cfg(not(any(doc, all(target_arch = "arm", target_os = "none"))))]
mod imp {
    pub(super) unsafe fn pmcr_set(_bits: u32) {
        unimplemented!()
    }

    pub(super) unsafe fn actlr_set(_bits: u32) {
        unimplemented!()
    }

    pub(super) unsafe fn sactlr_set(_bits: u32) {
        unimplemented!()
    }
}

/// Let the CPU signal single- and double-bit ECC errors it detects on flash
/// and data RAM accesses.
pub unsafe fn enable_event_bus_export() {
    imp::pmcr_set(PMCR_EXPORT_EVENTS);
}

#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
extern "C" {
    /// Enable ECC checking for B0TCM and B1TCM accesses.
    ///
    /// RAM must already have been auto-initialized, otherwise the first read
    /// of uninitialized ECC bits faults. Clobbers r0 only and never touches
    /// the stack, so it can be called from code that has none.
    pub fn cortexr4_enable_ram_ecc();
}

// ACTLR_TCM_ECC is 0x0C000000.
#[cfg(any(doc, all(target_arch = "arm", target_os = "none")))]
core::arch::global_asm!(
    "
    .section .text.cortexr4_enable_ram_ecc, \"ax\"
    .global cortexr4_enable_ram_ecc
    .type cortexr4_enable_ram_ecc, %function
    .arm
  cortexr4_enable_ram_ecc:
    mrc p15, 0, r0, c1, c0, 1         // r0 = ACTLR
    orr r0, r0, #0x0C000000           // B1TCMPCEN | B0TCMPCEN
    dmb
    mcr p15, 0, r0, c1, c0, 1         // ACTLR = r0
    isb
    bx lr
    "
);

/// Workaround for Cortex-R4 erratum 57.
pub unsafe fn errata_57() {
    imp::sactlr_set(SACTLR_ERRATUM_57);
}

/// Workaround for Cortex-R4 erratum 66.
pub unsafe fn errata_66() {
    imp::actlr_set(ACTLR_ERRATUM_66);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_bits_match_the_core_manual() {
        // The ECC leaf spells this value out as an immediate.
        assert_eq!(ACTLR_TCM_ECC, 0x0C00_0000);
        assert_eq!(ACTLR_ERRATUM_66, 0x80);
        assert_eq!(SACTLR_ERRATUM_57, 0x1_0000);
        assert_eq!(PMCR_EXPORT_EVENTS, 0x10);
    }
}
