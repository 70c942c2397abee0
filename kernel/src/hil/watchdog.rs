// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Interface for a hardware watchdog.

/// A hardware watchdog that resets the system unless it is serviced in time.
///
/// Implementations that cannot be disarmed once started make `suspend` a
/// no-op; callers must keep tickling such a watchdog.
pub trait WatchDog {
    /// Arm the watchdog. Called once the system is configured.
    fn setup(&self) {}

    /// Service the watchdog to let the hardware know the system is still
    /// executing.
    fn tickle(&self) {}

    /// Stop the watchdog, if the hardware allows it, before the system sleeps.
    fn suspend(&self) {}

    /// Restart the watchdog after `suspend`.
    fn resume(&self) {
        self.tickle();
    }
}
