// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Generic support for Cortex-R4 platforms.
//!
//! Everything here touches core state through CP15 or raw instructions and is
//! only meaningful on the target. Host builds get mock versions so that chip
//! crates can be unit tested; the mocks are never expected to run.

#![no_std]

pub mod cp15;
pub mod support;
