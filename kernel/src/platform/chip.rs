// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interfaces for implementing microcontrollers.

/// Generic operations that clarify how peripheral interrupts are routed to
/// the drivers that handle them.
pub trait InterruptService {
    /// Service an interrupt, if supported by this chip. If this interrupt
    /// number is not supported, return false.
    ///
    /// # Safety
    ///
    /// Must only be called from the interrupt dispatch path, with the
    /// interrupt source pending.
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool;
}
