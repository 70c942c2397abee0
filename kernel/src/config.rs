// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Data structure for storing compile-time configuration options.
//!
//! Configuration lives in a typed `const` object rather than in scattered
//! `#[cfg(feature = ...)]` blocks. Every code path guarded by a configuration
//! flag is still type-checked when the flag is off, and the compiler folds the
//! constant so a disabled path costs nothing in the final image.
//!
//! This file is the only place in the workspace where Cargo features are
//! consulted.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, enable the matching Cargo feature of the
/// `kernel` crate from the crate that links the final image.
pub struct Config {
    /// Whether the reset dispatcher reports the classified reset cause and
    /// any fail-safe entry on the debug output.
    ///
    /// During `_c_int00` no console exists yet, so this only has an effect
    /// when the reset handler is run again later (for example from a test
    /// image) after a debug writer has been registered.
    pub debug_startup: bool,

    /// Whether the RTI and digital watchdog drivers report refused counter
    /// resets and latched watchdog violations on the debug output.
    pub debug_rti: bool,
}

/// The unique instance of `Config` where compile-time configuration options
/// are defined.
pub const CONFIG: Config = Config {
    debug_startup: cfg!(feature = "debug_startup"),
    debug_rti: cfg!(feature = "debug_rti"),
};
