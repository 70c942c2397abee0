// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! VIM channel numbers.

pub const RTI_COMPARE0: u32 = 2;
pub const RTI_COMPARE1: u32 = 3;
pub const RTI_COMPARE2: u32 = 4;
pub const RTI_COMPARE3: u32 = 5;
pub const RTI_OVERFLOW0: u32 = 6;
pub const RTI_OVERFLOW1: u32 = 7;
pub const RTI_TIMEBASE: u32 = 8;
