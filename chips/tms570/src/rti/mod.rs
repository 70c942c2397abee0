// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! Real-Time Interrupt (RTI) module.
//!
//! The RTI has two counter blocks. Each block is a prescaling up counter
//! (`UC`, reloaded from `CPUC`) feeding a 32-bit free running counter
//! (`FRC`). Four compare channels can each be bound to either block; when a
//! channel's `COMP` value is reached it raises its notification and `COMP`
//! advances by the channel's update value `UDCP`, which is therefore the
//! channel's period.
//!
//! The same peripheral also hosts the digital windowed watchdog, see
//! [`dwd`].
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let rti = &peripherals.rti;
//! rti.init();
//! rti.set_client(&my_client);
//! rti.enable_notification(Notification::COMPARE0);
//! rti.start_counter(CounterBlock::Block0);
//! ```

use core::ops::BitOr;

use kernel::config::CONFIG;
use kernel::debug;
use kernel::hil::time::{self, Freq10KHz};
use kernel::utilities::cells::OptionalCell;
use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, Field};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use crate::registers::{ReadOnly, ReadWrite};

pub mod dwd;

register_structs! {
    /// One counter block.
    pub CounterRegisters {
        /// Free running counter
        (0x00 => frc: ReadWrite<u32>),
        /// Up counter (prescaler)
        (0x04 => uc: ReadWrite<u32>),
        /// Compare up counter, the prescaler reload value
        (0x08 => cpuc: ReadWrite<u32>),
        (0x0C => _reserved0),
        /// Capture free running counter
        (0x10 => cafrc: ReadOnly<u32>),
        /// Capture up counter
        (0x14 => cauc: ReadOnly<u32>),
        (0x18 => _reserved1),
        (0x20 => @END),
    },

    /// One compare channel.
    pub CompareRegisters {
        /// Compare value
        (0x00 => comp: ReadWrite<u32>),
        /// Update compare, added to `comp` on every match
        (0x04 => udcp: ReadWrite<u32>),
        (0x08 => @END),
    },

    pub RtiRegisters {
        /// Global control
        (0x00 => gctrl: ReadWrite<u32, GCTRL::Register>),
        /// Timebase control
        (0x04 => tbctrl: ReadWrite<u32, TBCTRL::Register>),
        /// Capture control
        (0x08 => capctrl: ReadWrite<u32, CAPCTRL::Register>),
        /// Compare control, binds each compare channel to a counter block
        (0x0C => compctrl: ReadWrite<u32, COMPCTRL::Register>),
        (0x10 => cnt: [CounterRegisters; 2]),
        (0x50 => cmp: [CompareRegisters; 4]),
        /// Timebase low compare
        (0x70 => tblcomp: ReadWrite<u32>),
        /// Timebase high compare
        (0x74 => tbhcomp: ReadWrite<u32>),
        (0x78 => _reserved0),
        /// Set interrupt enable
        (0x80 => setintena: ReadWrite<u32, INT::Register>),
        /// Clear interrupt enable
        (0x84 => clearintena: ReadWrite<u32, INT::Register>),
        /// Interrupt flags, write one to clear
        (0x88 => intflag: ReadWrite<u32, INT::Register>),
        (0x8C => _reserved1),
        /// Digital watchdog control
        (0x90 => dwdctrl: ReadWrite<u32, DWDCTRL::Register>),
        /// Digital watchdog preload
        (0x94 => dwdprld: ReadWrite<u32, DWDPRLD::Register>),
        /// Watchdog status, write one to clear
        (0x98 => wdstatus: ReadWrite<u32, WDSTATUS::Register>),
        /// Watchdog key
        (0x9C => wdkey: ReadWrite<u32, WDKEY::Register>),
        /// Digital watchdog down counter
        (0xA0 => dwdcntr: ReadOnly<u32, DWDCNTR::Register>),
        /// Windowed watchdog reaction control
        (0xA4 => wwdrxnctrl: ReadWrite<u32, WWDRXNCTRL::Register>),
        /// Windowed watchdog window size control
        (0xA8 => wwdsizectrl: ReadWrite<u32, WWDSIZECTRL::Register>),
        /// Compare interrupt clear enable
        (0xAC => intclrenable: ReadWrite<u32>),
        /// Compare interrupt clear values
        (0xB0 => compclr: [ReadWrite<u32>; 4]),
        (0xC0 => @END),
    }
}

register_bitfields![u32,
    GCTRL [
        /// Counter block 0 enable
        CNT0EN OFFSET(0) NUMBITS(1) [],
        /// Counter block 1 enable
        CNT1EN OFFSET(1) NUMBITS(1) [],
        /// Keep counting while the CPU is halted by the debugger
        COS OFFSET(15) NUMBITS(1) [],
        /// Network time unit source for counter block 0
        NTUSEL OFFSET(16) NUMBITS(4) []
    ],
    TBCTRL [
        /// Timebase source for counter block 0
        TBEXT OFFSET(0) NUMBITS(1) [
            UpCounter = 0,
            External = 1
        ],
        /// Keep incrementing on a failing external clock
        INC OFFSET(1) NUMBITS(1) []
    ],
    CAPCTRL [
        CAPCNTR0 OFFSET(0) NUMBITS(1) [],
        CAPCNTR1 OFFSET(1) NUMBITS(1) []
    ],
    COMPCTRL [
        COMPSEL0 OFFSET(0) NUMBITS(1) [],
        COMPSEL1 OFFSET(4) NUMBITS(1) [],
        COMPSEL2 OFFSET(8) NUMBITS(1) [],
        COMPSEL3 OFFSET(12) NUMBITS(1) []
    ],
    INT [
        INT0 OFFSET(0) NUMBITS(1) [],
        INT1 OFFSET(1) NUMBITS(1) [],
        INT2 OFFSET(2) NUMBITS(1) [],
        INT3 OFFSET(3) NUMBITS(1) [],
        DMA0 OFFSET(8) NUMBITS(1) [],
        DMA1 OFFSET(9) NUMBITS(1) [],
        DMA2 OFFSET(10) NUMBITS(1) [],
        DMA3 OFFSET(11) NUMBITS(1) [],
        TBINT OFFSET(16) NUMBITS(1) [],
        OVL0INT OFFSET(17) NUMBITS(1) [],
        OVL1INT OFFSET(18) NUMBITS(1) []
    ],
    DWDCTRL [
        DWDCTRL OFFSET(0) NUMBITS(32) [
            Enable = 0xA985_59DA,
            Disabled = 0x5312_ACED
        ]
    ],
    DWDPRLD [
        DWDPRLD OFFSET(0) NUMBITS(12) []
    ],
    pub WDSTATUS [
        /// The watchdog generated the last reset
        DWD_ST OFFSET(1) NUMBITS(1) [],
        /// Wrong key or key order written
        KEY_ST OFFSET(2) NUMBITS(1) [],
        /// Serviced before the window opened
        START_TIME_VIOL OFFSET(3) NUMBITS(1) [],
        /// Not serviced before the counter expired
        END_TIME_VIOL OFFSET(4) NUMBITS(1) [],
        /// Any window violation
        TIME_WINDOW_VIOL OFFSET(5) NUMBITS(1) []
    ],
    WDKEY [
        WDKEY OFFSET(0) NUMBITS(16) [
            Prime = 0xE51A,
            Service = 0xA35C,
            Reset = 0x2345
        ]
    ],
    DWDCNTR [
        DWDCNTR OFFSET(0) NUMBITS(25) []
    ],
    WWDRXNCTRL [
        WWDRXN OFFSET(0) NUMBITS(4) [
            Reset = 0x5,
            Nmi = 0xA
        ]
    ],
    WWDSIZECTRL [
        WWDSIZE OFFSET(0) NUMBITS(32) [
            Size100Percent = 0x0000_0005,
            Size50Percent = 0x0000_0050,
            Size25Percent = 0x0000_0500,
            Size12_5Percent = 0x0000_5000,
            Size6_25Percent = 0x0005_0000,
            Size3_125Percent = 0x0050_0000
        ]
    ]
];

pub const RTI_BASE: StaticRef<RtiRegisters> =
    unsafe { StaticRef::new(0xFFFF_FC00 as *const RtiRegisters) };

/// RTICLK feeding the prescalers.
pub const RTI_CLOCK_HZ: u32 = 110_000_000;

/// Every notification source, as written to `INTFLAG` by [`Rti::init`].
const INTFLAG_ALL: u32 = 0x0007_000F;
/// Every interrupt and DMA request source, as written to `CLEARINTENA` by
/// [`Rti::init`].
const INTENA_ALL: u32 = 0x0007_0F0F;

/// Power-on configuration of the RTI, applied by [`Rti::init`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RtiConfig {
    pub gctrl: u32,
    pub tbctrl: u32,
    pub capctrl: u32,
    pub compctrl: u32,
    /// `CPUC` of each counter block. The tick rate is
    /// `RTI_CLOCK_HZ / (prescale + 1)`.
    pub prescale: [u32; 2],
    /// Initial `COMP` of each compare channel.
    pub compare: [u32; 4],
    /// `UDCP` of each compare channel.
    pub update_compare: [u32; 4],
}

/// 10 kHz on both counter blocks; compares 0 and 1 on block 0, compares 2
/// and 3 on block 1.
pub const DEFAULT_CONFIG: RtiConfig = RtiConfig {
    gctrl: 0,
    tbctrl: 0,
    capctrl: 0,
    compctrl: 0x0000_1100,
    prescale: [10999, 10999],
    compare: [10000, 50000, 80000, 100000],
    update_compare: [10000, 50000, 80000, 100000],
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterBlock {
    Block0 = 0,
    Block1 = 1,
}

impl CounterBlock {
    fn enable_field(self) -> Field<u32, GCTRL::Register> {
        match self {
            CounterBlock::Block0 => GCTRL::CNT0EN,
            CounterBlock::Block1 => GCTRL::CNT1EN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compare {
    Compare0 = 0,
    Compare1 = 1,
    Compare2 = 2,
    Compare3 = 3,
}

impl Compare {
    fn source_field(self) -> Field<u32, COMPCTRL::Register> {
        match self {
            Compare::Compare0 => COMPCTRL::COMPSEL0,
            Compare::Compare1 => COMPCTRL::COMPSEL1,
            Compare::Compare2 => COMPCTRL::COMPSEL2,
            Compare::Compare3 => COMPCTRL::COMPSEL3,
        }
    }
}

/// A set of RTI notification sources.
///
/// Bits outside the seven sources (compare 0..3, timebase, overflow of
/// either counter block) are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notification(u32);

impl Notification {
    pub const COMPARE0: Notification = Notification(1 << 0);
    pub const COMPARE1: Notification = Notification(1 << 1);
    pub const COMPARE2: Notification = Notification(1 << 2);
    pub const COMPARE3: Notification = Notification(1 << 3);
    pub const TIMEBASE: Notification = Notification(1 << 16);
    /// Free running counter 0 overflow.
    pub const COUNTER0: Notification = Notification(1 << 17);
    /// Free running counter 1 overflow.
    pub const COUNTER1: Notification = Notification(1 << 18);
    pub const ALL: Notification = Notification(INTFLAG_ALL);

    const SOURCES: [Notification; 7] = [
        Notification::COMPARE0,
        Notification::COMPARE1,
        Notification::COMPARE2,
        Notification::COMPARE3,
        Notification::TIMEBASE,
        Notification::COUNTER0,
        Notification::COUNTER1,
    ];

    pub const fn empty() -> Notification {
        Notification(0)
    }

    pub const fn from_bits_truncate(bits: u32) -> Notification {
        Notification(bits & INTFLAG_ALL)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Notification) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Notification {
    type Output = Notification;

    fn bitor(self, rhs: Notification) -> Notification {
        Notification(self.0 | rhs.0)
    }
}

/// Whether [`Rti::config_registers`] reports the values `init` programs or
/// what the registers hold now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigValueType {
    InitialValue,
    CurrentValue,
}

/// Snapshot of the RTI configuration registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RtiConfigRegisters {
    pub gctrl: u32,
    pub tbctrl: u32,
    pub capctrl: u32,
    pub compctrl: u32,
    pub udcp0: u32,
    pub udcp1: u32,
    pub udcp2: u32,
    pub udcp3: u32,
}

pub trait RtiClient {
    /// Called once per source that was pending and enabled when the RTI
    /// interrupt was serviced. The flag is already acknowledged.
    fn notification(&self, source: Notification);
}

pub struct Rti<'a> {
    registers: StaticRef<RtiRegisters>,
    client: OptionalCell<&'a dyn RtiClient>,
}

impl<'a> Rti<'a> {
    pub const fn new(base: StaticRef<RtiRegisters>) -> Rti<'a> {
        Rti {
            registers: base,
            client: OptionalCell::empty(),
        }
    }

    pub fn set_client(&self, client: &'a dyn RtiClient) {
        self.client.set(client);
    }

    /// Programs [`DEFAULT_CONFIG`].
    ///
    /// Both counter blocks are left stopped and zeroed, every notification
    /// flag is cleared and every interrupt and DMA request source is
    /// disabled.
    pub fn init(&self) {
        let regs = self.registers;
        let config = &DEFAULT_CONFIG;

        regs.gctrl.set(config.gctrl);
        regs.tbctrl.set(config.tbctrl);
        regs.capctrl.set(config.capctrl);
        regs.compctrl.set(config.compctrl);

        for (counter, prescale) in regs.cnt.iter().zip(config.prescale) {
            counter.uc.set(0);
            counter.frc.set(0);
            counter.cpuc.set(prescale);
        }

        for (i, compare) in regs.cmp.iter().enumerate() {
            compare.comp.set(config.compare[i]);
            compare.udcp.set(config.update_compare[i]);
        }

        regs.intflag.set(INTFLAG_ALL);
        regs.clearintena.set(INTENA_ALL);
    }

    pub fn start_counter(&self, block: CounterBlock) {
        self.registers.gctrl.modify(block.enable_field().val(1));
    }

    pub fn stop_counter(&self, block: CounterBlock) {
        self.registers.gctrl.modify(block.enable_field().val(0));
    }

    pub fn is_counter_running(&self, block: CounterBlock) -> bool {
        self.registers.gctrl.is_set(block.enable_field())
    }

    /// Zeroes the up counter and free running counter of a stopped block.
    ///
    /// Returns `BUSY`, without touching the counters, if the block is
    /// running.
    pub fn reset_counter(&self, block: CounterBlock) -> Result<(), ErrorCode> {
        if self.is_counter_running(block) {
            if CONFIG.debug_rti {
                debug!("rti: counter {:?} is running, not resetting", block);
            }
            return Err(ErrorCode::BUSY);
        }
        let counter = &self.registers.cnt[block as usize];
        counter.uc.set(0);
        counter.frc.set(0);
        Ok(())
    }

    /// Current free running counter value of `block`.
    pub fn counter_value(&self, block: CounterBlock) -> u32 {
        self.registers.cnt[block as usize].frc.get()
    }

    /// Sets the period of `compare`, in ticks of its counter block.
    ///
    /// Takes effect after the next match; the pending `COMP` value is left
    /// alone.
    pub fn set_period(&self, compare: Compare, period: u32) {
        self.registers.cmp[compare as usize].udcp.set(period);
    }

    pub fn get_period(&self, compare: Compare) -> u32 {
        self.registers.cmp[compare as usize].udcp.get()
    }

    /// Ticks elapsed since the last match of `compare`.
    ///
    /// `COMP` has already advanced by `UDCP` at that match, so the previous
    /// match happened at `COMP - UDCP`. Every step is modulo 2^32.
    pub fn get_current_tick(&self, compare: Compare) -> u32 {
        let regs = self.registers;
        let block = if regs.compctrl.is_set(compare.source_field()) {
            CounterBlock::Block1
        } else {
            CounterBlock::Block0
        };
        let frc = regs.cnt[block as usize].frc.get();
        let channel = &regs.cmp[compare as usize];
        let last_match = channel.comp.get().wrapping_sub(channel.udcp.get());
        frc.wrapping_sub(last_match)
    }

    /// Clears any stale flag of `sources`, then enables their interrupts.
    pub fn enable_notification(&self, sources: Notification) {
        self.registers.intflag.set(sources.bits());
        self.registers.setintena.set(sources.bits());
    }

    pub fn disable_notification(&self, sources: Notification) {
        self.registers.clearintena.set(sources.bits());
    }

    pub fn enabled_notifications(&self) -> Notification {
        Notification::from_bits_truncate(self.registers.setintena.get())
    }

    pub fn pending_notifications(&self) -> Notification {
        Notification::from_bits_truncate(self.registers.intflag.get())
    }

    pub fn config_registers(&self, kind: ConfigValueType) -> RtiConfigRegisters {
        match kind {
            ConfigValueType::InitialValue => RtiConfigRegisters {
                gctrl: DEFAULT_CONFIG.gctrl,
                tbctrl: DEFAULT_CONFIG.tbctrl,
                capctrl: DEFAULT_CONFIG.capctrl,
                compctrl: DEFAULT_CONFIG.compctrl,
                udcp0: DEFAULT_CONFIG.update_compare[0],
                udcp1: DEFAULT_CONFIG.update_compare[1],
                udcp2: DEFAULT_CONFIG.update_compare[2],
                udcp3: DEFAULT_CONFIG.update_compare[3],
            },
            ConfigValueType::CurrentValue => {
                let regs = self.registers;
                RtiConfigRegisters {
                    gctrl: regs.gctrl.get(),
                    tbctrl: regs.tbctrl.get(),
                    capctrl: regs.capctrl.get(),
                    compctrl: regs.compctrl.get(),
                    udcp0: regs.cmp[0].udcp.get(),
                    udcp1: regs.cmp[1].udcp.get(),
                    udcp2: regs.cmp[2].udcp.get(),
                    udcp3: regs.cmp[3].udcp.get(),
                }
            }
        }
    }

    /// Acknowledges every pending, enabled source and reports each to the
    /// client.
    pub fn handle_interrupt(&self) {
        let regs = self.registers;
        let fired = Notification::from_bits_truncate(regs.intflag.get() & regs.setintena.get());
        if fired.is_empty() {
            return;
        }
        regs.intflag.set(fired.bits());

        self.client.map(|client| {
            for source in Notification::SOURCES {
                if fired.contains(source) {
                    client.notification(source);
                }
            }
        });
    }

    pub fn counter<'r>(&'r self, block: CounterBlock) -> RtiCounter<'r, 'a> {
        RtiCounter { rti: self, block }
    }
}

/// One RTI counter block as a kernel time source.
///
/// Ticks at [`Freq10KHz`], the rate [`DEFAULT_CONFIG`] programs.
pub struct RtiCounter<'r, 'a> {
    rti: &'r Rti<'a>,
    block: CounterBlock,
}

impl time::Time for RtiCounter<'_, '_> {
    type Frequency = Freq10KHz;

    fn now(&self) -> u32 {
        self.rti.counter_value(self.block)
    }
}

impl time::Counter for RtiCounter<'_, '_> {
    fn start(&self) -> Result<(), ErrorCode> {
        self.rti.start_counter(self.block);
        Ok(())
    }

    fn stop(&self) -> Result<(), ErrorCode> {
        self.rti.stop_counter(self.block);
        Ok(())
    }

    fn reset(&self) -> Result<(), ErrorCode> {
        self.rti.reset_counter(self.block)
    }

    fn is_running(&self) -> bool {
        self.rti.is_counter_running(self.block)
    }
}
