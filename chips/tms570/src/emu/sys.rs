// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Models of the system module (SYS1) and the error signaling module.

use std::vec::Vec;

use super::MmioDevice;

const MINITGCR: usize = 0x5C;
const MSIENA: usize = 0x60;
const MSTCGSTAT: usize = 0x68;
const SYSESR: usize = 0xE4;
const SYS_END: usize = 0xE8;

const MINITGCR_ENABLE: u32 = 0xA;
const MINIDONE: u32 = 1 << 8;

pub(crate) struct SysDevice {
    words: [u32; SYS_END / 4],
    pub(crate) writes: Vec<(usize, u32)>,
}

impl SysDevice {
    /// A system module that came out of a reset with `sysesr` latched.
    pub(crate) fn with_reset_status(sysesr: u32) -> Self {
        let mut device = SysDevice {
            words: [0; SYS_END / 4],
            writes: Vec::new(),
        };
        device.words[SYSESR / 4] = sysesr;
        device
    }

    pub(crate) fn sysesr(&self) -> u32 {
        self.words[SYSESR / 4]
    }

    pub(crate) fn msiena(&self) -> u32 {
        self.words[MSIENA / 4]
    }

    pub(crate) fn minitgcr(&self) -> u32 {
        self.words[MINITGCR / 4]
    }
}

impl MmioDevice for SysDevice {
    fn mmio_read(&mut self, offset: usize) -> u32 {
        self.words[offset / 4]
    }

    fn mmio_write(&mut self, offset: usize, value: u32) {
        self.writes.push((offset, value));
        let index = offset / 4;
        match offset {
            SYSESR | MSTCGSTAT => self.words[index] &= !value,
            MSIENA => {
                self.words[index] = value;
                if self.words[MINITGCR / 4] == MINITGCR_ENABLE {
                    self.words[MSTCGSTAT / 4] |= MINIDONE;
                }
            }
            _ => self.words[index] = value,
        }
    }
}

const SR1: usize = 0x18;
const ESM_END: usize = 0x28;

pub(crate) struct EsmDevice {
    words: [u32; ESM_END / 4],
}

impl EsmDevice {
    pub(crate) fn new() -> Self {
        EsmDevice {
            words: [0; ESM_END / 4],
        }
    }

    /// Latches error channels of `group` (0-based) as if signalled.
    pub(crate) fn raise(&mut self, group: usize, channels: u32) {
        self.words[SR1 / 4 + group] |= channels;
    }

    pub(crate) fn status(&self, group: usize) -> u32 {
        self.words[SR1 / 4 + group]
    }
}

impl MmioDevice for EsmDevice {
    fn mmio_read(&mut self, offset: usize) -> u32 {
        self.words[offset / 4]
    }

    fn mmio_write(&mut self, offset: usize, value: u32) {
        let index = offset / 4;
        match offset {
            0x18..=0x20 => self.words[index] &= !value,
            _ => self.words[index] = value,
        }
    }
}
