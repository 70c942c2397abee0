// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Behavioural model of the RTI block and its digital watchdog.
//!
//! One call to [`RtiDevice::advance`] is one increment of every running free
//! running counter; the prescaler stage is not modelled. The watchdog down
//! counter is decremented once per tick while armed.

use std::vec::Vec;

use super::MmioDevice;

const GCTRL: usize = 0x00;
const COMPCTRL: usize = 0x0C;
const COUNTER_BASE: usize = 0x10;
const COUNTER_STRIDE: usize = 0x20;
const COMPARE_BASE: usize = 0x50;
const COMPARE_STRIDE: usize = 0x08;
const SETINTENA: usize = 0x80;
const CLEARINTENA: usize = 0x84;
const INTFLAG: usize = 0x88;
const DWDCTRL: usize = 0x90;
const DWDPRLD: usize = 0x94;
const WDSTATUS: usize = 0x98;
const WDKEY: usize = 0x9C;
const DWDCNTR: usize = 0xA0;
const WWDSIZECTRL: usize = 0xA8;
const END: usize = 0xC0;

const DWD_ENABLE: u32 = 0xA985_59DA;
const DWD_DISABLED: u32 = 0x5312_ACED;

const KEY_PRIME: u32 = 0xE51A;
const KEY_SERVICE: u32 = 0xA35C;
const KEY_RESET: u32 = 0x2345;

const ST_DWD: u32 = 1 << 1;
const ST_KEY: u32 = 1 << 2;
const ST_START_TIME: u32 = 1 << 3;
const ST_END_TIME: u32 = 1 << 4;
const ST_TIME_WINDOW: u32 = 1 << 5;

pub(crate) struct RtiDevice {
    words: [u32; END / 4],
    intena: u32,
    intflag: u32,
    dwd_armed: bool,
    dwd_preload: u32,
    dwd_counter: u32,
    wdstatus: u32,
    key_primed: bool,
    /// Set once the down counter reached zero while armed.
    pub(crate) expired: bool,
    /// Every register write in order, as `(offset, value)`.
    pub(crate) writes: Vec<(usize, u32)>,
}

impl RtiDevice {
    pub(crate) fn new() -> Self {
        RtiDevice {
            words: [0; END / 4],
            intena: 0,
            intflag: 0,
            dwd_armed: false,
            dwd_preload: 0xFFF,
            dwd_counter: reload_value(0xFFF),
            wdstatus: 0,
            key_primed: false,
            expired: false,
            writes: Vec::new(),
        }
    }

    fn word(&self, offset: usize) -> u32 {
        self.words[offset / 4]
    }

    fn word_mut(&mut self, offset: usize) -> &mut u32 {
        &mut self.words[offset / 4]
    }

    pub(crate) fn frc(&self, block: usize) -> u32 {
        self.word(COUNTER_BASE + block * COUNTER_STRIDE)
    }

    pub(crate) fn set_frc(&mut self, block: usize, value: u32) {
        *self.word_mut(COUNTER_BASE + block * COUNTER_STRIDE) = value;
    }

    pub(crate) fn uc(&self, block: usize) -> u32 {
        self.word(COUNTER_BASE + block * COUNTER_STRIDE + 0x04)
    }

    pub(crate) fn cpuc(&self, block: usize) -> u32 {
        self.word(COUNTER_BASE + block * COUNTER_STRIDE + 0x08)
    }

    pub(crate) fn comp(&self, compare: usize) -> u32 {
        self.word(COMPARE_BASE + compare * COMPARE_STRIDE)
    }

    pub(crate) fn set_comp(&mut self, compare: usize, value: u32) {
        *self.word_mut(COMPARE_BASE + compare * COMPARE_STRIDE) = value;
    }

    pub(crate) fn udcp(&self, compare: usize) -> u32 {
        self.word(COMPARE_BASE + compare * COMPARE_STRIDE + 0x04)
    }

    pub(crate) fn gctrl(&self) -> u32 {
        self.word(GCTRL)
    }

    pub(crate) fn intena(&self) -> u32 {
        self.intena
    }

    pub(crate) fn intflag(&self) -> u32 {
        self.intflag
    }

    /// Latches interrupt flags as if the hardware events had occurred.
    pub(crate) fn raise(&mut self, flags: u32) {
        self.intflag |= flags;
    }

    pub(crate) fn wdstatus(&self) -> u32 {
        self.wdstatus
    }

    /// Latches watchdog status bits as if left over from before a reset.
    pub(crate) fn latch_status(&mut self, bits: u32) {
        self.wdstatus |= bits;
    }

    pub(crate) fn dwd_armed(&self) -> bool {
        self.dwd_armed
    }

    pub(crate) fn dwd_counter(&self) -> u32 {
        self.dwd_counter
    }

    /// Runs the model for `ticks` counter increments.
    pub(crate) fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    fn tick(&mut self) {
        let gctrl = self.gctrl();
        let compctrl = self.word(COMPCTRL);
        for block in 0..2 {
            if gctrl & (1 << block) == 0 {
                continue;
            }
            let frc = self.frc(block).wrapping_add(1);
            self.set_frc(block, frc);
            if frc == 0 {
                self.intflag |= 1 << (17 + block);
            }
            for compare in 0..4 {
                let source = ((compctrl >> (compare * 4)) & 1) as usize;
                if source == block && self.comp(compare) == frc {
                    self.intflag |= 1 << compare;
                    let next = self.comp(compare).wrapping_add(self.udcp(compare));
                    self.set_comp(compare, next);
                }
            }
        }

        if self.dwd_armed && !self.expired {
            self.dwd_counter = self.dwd_counter.saturating_sub(1);
            if self.dwd_counter == 0 {
                self.wdstatus |= ST_END_TIME | ST_TIME_WINDOW;
                self.expired = true;
            }
        }
    }

    /// Down counter value at or below which a service is accepted.
    fn window_open_below(&self) -> u32 {
        let full = reload_value(self.dwd_preload) + 1;
        match self.word(WWDSIZECTRL) {
            0x0000_0050 => full / 2,
            0x0000_0500 => full / 4,
            0x0000_5000 => full / 8,
            0x0005_0000 => full / 16,
            0x0050_0000 => full / 32,
            _ => full,
        }
    }

    fn key_write(&mut self, key: u32) {
        match (key, self.key_primed) {
            (KEY_PRIME, _) => {
                self.key_primed = true;
                return;
            }
            (KEY_SERVICE, true) => {
                if self.dwd_armed && self.dwd_counter > self.window_open_below() {
                    self.wdstatus |= ST_START_TIME | ST_TIME_WINDOW;
                } else {
                    self.dwd_counter = reload_value(self.dwd_preload);
                }
            }
            (KEY_RESET, true) => self.wdstatus |= ST_DWD,
            _ => self.wdstatus |= ST_KEY,
        }
        self.key_primed = false;
    }
}

fn reload_value(preload: u32) -> u32 {
    ((preload & 0xFFF) << 13) | 0x1FFF
}

impl MmioDevice for RtiDevice {
    fn mmio_read(&mut self, offset: usize) -> u32 {
        match offset {
            SETINTENA | CLEARINTENA => self.intena,
            INTFLAG => self.intflag,
            DWDCTRL if self.dwd_armed => DWD_ENABLE,
            DWDCTRL => DWD_DISABLED,
            DWDPRLD => self.dwd_preload,
            WDSTATUS => self.wdstatus,
            DWDCNTR => self.dwd_counter,
            _ => self.word(offset),
        }
    }

    fn mmio_write(&mut self, offset: usize, value: u32) {
        self.writes.push((offset, value));
        match offset {
            SETINTENA => self.intena |= value,
            CLEARINTENA => self.intena &= !value,
            INTFLAG => self.intflag &= !value,
            DWDCTRL => {
                if value == DWD_ENABLE && !self.dwd_armed {
                    self.dwd_armed = true;
                    self.dwd_counter = reload_value(self.dwd_preload);
                }
            }
            DWDPRLD => {
                // Only writable while the watchdog is disabled.
                if !self.dwd_armed {
                    self.dwd_preload = value & 0xFFF;
                    self.dwd_counter = reload_value(self.dwd_preload);
                }
            }
            WDSTATUS => self.wdstatus &= !value,
            WDKEY => self.key_write(value & 0xFFFF),
            DWDCNTR => {}
            _ => *self.word_mut(offset) = value,
        }
    }
}
