// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Core support shared by the Hercules chip and architecture crates.
//!
//! The kernel crate holds the pieces every driver leans on: the `StaticRef`
//! handle for memory-mapped register blocks, a re-export of the Tock register
//! interface, the `ErrorCode` type, the `debug!` output path, compile-time
//! configuration, and the Hardware Interface Layer (HIL) traits the chip
//! drivers implement.

#![warn(unreachable_pub)]
#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod debug;
pub mod hil;
pub mod platform;
pub mod utilities;

mod errorcode;

pub use crate::errorcode::ErrorCode;
