// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2022.

//! MMIO emulation for unit tests.
//!
//! Register overlays are backed by leaked, zeroed blocks of host memory.
//! The emulated register types never touch that memory: every access is
//! routed by address to the device model mapped over the block. Models are
//! kept in a per-thread table, so tests running in parallel do not see each
//! other's devices.

use core::cell::{RefCell, UnsafeCell};
use core::marker::PhantomData;
use core::mem::{size_of, MaybeUninit};

use std::boxed::Box;
use std::rc::Rc;
use std::vec::Vec;

use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::{RegisterLongName, UIntLike};
use kernel::utilities::StaticRef;

mod rti;
mod sys;

pub(crate) use self::rti::RtiDevice;
pub(crate) use self::sys::{EsmDevice, SysDevice};

/// A peripheral that reacts to 32-bit register accesses.
pub(crate) trait MmioDevice {
    /// Returns the value read at `offset` from the start of the device.
    fn mmio_read(&mut self, offset: usize) -> u32;
    /// Applies a write of `value` at `offset` from the start of the device.
    fn mmio_write(&mut self, offset: usize, value: u32);
}

struct MmioRegion {
    base: usize,
    size: usize,
    device: Rc<RefCell<dyn MmioDevice>>,
}

std::thread_local! {
    static REGIONS: RefCell<Vec<MmioRegion>> = const { RefCell::new(Vec::new()) };
}

/// Maps `device` over a fresh register block and returns the overlay for it.
pub(crate) fn attach<R: 'static, D: MmioDevice + 'static>(
    device: &Rc<RefCell<D>>,
) -> StaticRef<R> {
    let block: &'static MaybeUninit<R> = Box::leak(Box::new(MaybeUninit::zeroed()));
    let device: Rc<RefCell<dyn MmioDevice>> = device.clone();
    REGIONS.with(|regions| {
        regions.borrow_mut().push(MmioRegion {
            base: block.as_ptr() as usize,
            size: size_of::<R>(),
            device,
        })
    });
    unsafe { StaticRef::new(block.as_ptr()) }
}

fn route(address: usize) -> (usize, Rc<RefCell<dyn MmioDevice>>) {
    REGIONS.with(|regions| {
        regions
            .borrow()
            .iter()
            .find(|region| address >= region.base && address < region.base + region.size)
            .map(|region| (address - region.base, region.device.clone()))
            .unwrap_or_else(|| panic!("no emulated device at {:#x}", address))
    })
}

fn bus_read(address: usize) -> u32 {
    let (offset, device) = route(address);
    let mut device = device.borrow_mut();
    device.mmio_read(offset)
}

fn bus_write(address: usize, value: u32) {
    let (offset, device) = route(address);
    device.borrow_mut().mmio_write(offset, value);
}

/// Emulated read-write register.
#[repr(transparent)]
pub(crate) struct ReadWrite<T: UIntLike = u32, R: RegisterLongName = ()> {
    value: UnsafeCell<T>,
    associated_register: PhantomData<R>,
}

impl<R: RegisterLongName> Readable for ReadWrite<u32, R> {
    type T = u32;
    type R = R;

    fn get(&self) -> u32 {
        bus_read(self.value.get() as usize)
    }
}

impl<R: RegisterLongName> Writeable for ReadWrite<u32, R> {
    type T = u32;
    type R = R;

    fn set(&self, value: u32) {
        bus_write(self.value.get() as usize, value)
    }
}

/// Emulated read-only register.
#[repr(transparent)]
pub(crate) struct ReadOnly<T: UIntLike = u32, R: RegisterLongName = ()> {
    value: UnsafeCell<T>,
    associated_register: PhantomData<R>,
}

impl<R: RegisterLongName> Readable for ReadOnly<u32, R> {
    type T = u32;
    type R = R;

    fn get(&self) -> u32 {
        bus_read(self.value.get() as usize)
    }
}
