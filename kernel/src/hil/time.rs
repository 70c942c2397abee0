// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Hardware agnostic interfaces for counter-like resources.

use crate::ErrorCode;

/// Trait to represent clock frequency in Hz
///
/// This trait is used as an associated type for `Time` so clients can portably
/// convert native ticks to real-time values.
pub trait Frequency {
    /// Returns frequency in Hz.
    fn frequency() -> u32;
}

/// 1MHz `Frequency`
#[derive(Debug)]
pub struct Freq1MHz;
impl Frequency for Freq1MHz {
    fn frequency() -> u32 {
        1_000_000
    }
}

/// 10KHz `Frequency`
#[derive(Debug)]
pub struct Freq10KHz;
impl Frequency for Freq10KHz {
    fn frequency() -> u32 {
        10_000
    }
}

/// 1KHz `Frequency`
#[derive(Debug)]
pub struct Freq1KHz;
impl Frequency for Freq1KHz {
    fn frequency() -> u32 {
        1_000
    }
}

/// A wrapping 32-bit clock.
pub trait Time {
    type Frequency: Frequency;

    /// Returns the current time in hardware clock units.
    fn now(&self) -> u32;

    /// Converts a number of ticks to milliseconds, rounding down.
    fn ticks_to_ms(ticks: u32) -> u32 {
        ((u64::from(ticks) * 1_000) / u64::from(Self::Frequency::frequency())) as u32
    }

    /// Converts milliseconds to ticks, saturating at `u32::MAX`.
    fn ms_to_ticks(ms: u32) -> u32 {
        let ticks = (u64::from(ms) * u64::from(Self::Frequency::frequency())) / 1_000;
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}

/// A `Time` source that can be started, stopped and cleared.
pub trait Counter: Time {
    /// Start counting. Starting a running counter has no effect.
    fn start(&self) -> Result<(), ErrorCode>;

    /// Stop counting. Stopping a stopped counter has no effect.
    fn stop(&self) -> Result<(), ErrorCode>;

    /// Reset the count to zero.
    ///
    /// Returns `Err(ErrorCode::BUSY)` if the counter is running; stop it first.
    fn reset(&self) -> Result<(), ErrorCode>;

    /// Whether the counter is currently running.
    fn is_running(&self) -> bool;
}
